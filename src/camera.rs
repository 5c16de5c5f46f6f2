//! Player camera rig
//!
//! The rig lives on the player's vehicle and offers a chase view, recomputed from the
//! vehicle pose every tick, and a cockpit view fixed in the vehicle's local frame.

use bevy::prelude::*;

use crate::physics::PhysicsBody;

/// Which view the rig presents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum CameraMode {
    #[default]
    Chase,
    Cockpit,
}

/// A camera placement: where it sits and what it looks at
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CameraView {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraView {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.target, Vec3::Y)
    }
}

#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct CameraRig {
    pub mode: CameraMode,
    /// Chase camera offset in the vehicle frame
    pub chase_offset: Vec3,
    /// Cockpit eye point in the vehicle frame
    pub cockpit_offset: Vec3,
    /// Cockpit look point in the vehicle frame
    pub cockpit_target: Vec3,
    /// Last chase placement
    chase: CameraView,
}

impl Default for CameraRig {
    fn default() -> Self {
        let chase_offset = Vec3::new(0.0, 5.0, -10.0);
        Self {
            mode: CameraMode::Chase,
            chase_offset,
            cockpit_offset: Vec3::new(0.0, 1.5, 0.0),
            cockpit_target: Vec3::new(0.0, 1.5, 10.0),
            chase: CameraView {
                position: chase_offset,
                target: Vec3::ZERO,
            },
        }
    }
}

impl CameraRig {
    /// Toggle between chase and cockpit
    pub fn switch(&mut self) {
        self.mode = match self.mode {
            CameraMode::Chase => CameraMode::Cockpit,
            CameraMode::Cockpit => CameraMode::Chase,
        };
    }

    /// Recompute the chase placement from the vehicle pose.
    ///
    /// Only does work in chase mode; the cockpit view is derived from the body frame
    /// whenever it is read.
    pub fn follow(&mut self, body: &PhysicsBody) {
        if self.mode == CameraMode::Chase {
            self.chase = CameraView {
                position: body.position + body.orientation * self.chase_offset,
                target: body.position,
            };
        }
    }

    /// The placement of the active camera
    pub fn current(&self, body: &PhysicsBody) -> CameraView {
        match self.mode {
            CameraMode::Chase => self.chase,
            CameraMode::Cockpit => CameraView {
                position: body.position + body.orientation * self.cockpit_offset,
                target: body.position + body.orientation * self.cockpit_target,
            },
        }
    }
}

/// Recompute every rig from its vehicle
pub fn follow_vehicles(mut rigs: Query<(&mut CameraRig, &PhysicsBody)>) {
    for (mut rig, body) in rigs.iter_mut() {
        rig.follow(body);
    }
}

/// Place the 3D camera at the player's active view
pub fn apply_active_camera(
    rigs: Query<(&CameraRig, &PhysicsBody)>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
) {
    let Ok((rig, body)) = rigs.single() else {
        return;
    };
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };

    *camera = rig.current(body).transform();
}

//! Minimal rigid-body stepping
//!
//! Vehicles own a [`PhysicsBody`]; the [`PhysicsWorld`] advances all of them once per
//! frame with a fixed timestep before any controller runs. There is no general
//! collision handling: bodies rest on the track plane and stop at the outer barriers.

use bevy::prelude::*;

use crate::profile::VehicleProfile;
use crate::track::Track;

/// Rigid body state of one vehicle
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    /// Half size of the collision box
    pub half_extents: Vec3,
    /// Fraction of linear velocity lost per second
    pub linear_damping: f32,
    /// Fraction of angular velocity lost per second
    pub angular_damping: f32,
}

impl PhysicsBody {
    /// A body at rest sized and weighted after a vehicle profile
    pub fn for_profile(profile: &VehicleProfile, position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: profile.mass,
            half_extents: profile.dimensions.half_extents(),
            linear_damping: 0.5,
            angular_damping: 0.5,
        }
    }

    /// Current speed
    pub fn speed(&self) -> f32 {
        self.linear_velocity.length()
    }

    /// Render pose of the body
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.orientation)
    }
}

/// Global physics parameters
#[derive(Resource, Debug, Clone)]
pub struct PhysicsWorld {
    pub gravity: Vec3,
    /// Timestep used for every step, independent of the frame time
    pub fixed_dt: f32,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.82, 0.0),
            fixed_dt: 1.0 / 60.0,
        }
    }
}

impl PhysicsWorld {
    /// Advance one body by `fixed_dt`
    pub fn step_body(&self, body: &mut PhysicsBody, track: &Track) {
        let dt = self.fixed_dt;

        body.linear_velocity += self.gravity * dt;
        body.linear_velocity *= (1.0 - body.linear_damping).powf(dt);
        body.angular_velocity *= (1.0 - body.angular_damping).powf(dt);

        body.position += body.linear_velocity * dt;
        body.orientation =
            (Quat::from_scaled_axis(body.angular_velocity * dt) * body.orientation).normalize();

        // Ground contact
        let clearance = body.half_extents.y;
        let height = track.height_at(body.position);
        if height < clearance {
            body.position += track.normal * (clearance - height);
            let into_ground = body.linear_velocity.dot(track.normal);
            if into_ground < 0.0 {
                body.linear_velocity -= track.normal * into_ground;
            }
        }

        let half_width = body.half_extents.x;
        track.confine(&mut body.position, &mut body.linear_velocity, half_width);
    }
}

/// Step every body once
pub fn step_physics(
    world: Res<PhysicsWorld>,
    track: Res<Track>,
    mut bodies: Query<&mut PhysicsBody>,
) {
    for mut body in bodies.iter_mut() {
        world.step_body(&mut body, &track);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::VehicleClass;

    fn sports_body(position: Vec3) -> PhysicsBody {
        PhysicsBody::for_profile(VehicleClass::Sports.profile(), position)
    }

    #[test]
    fn body_settles_on_the_ground() {
        let world = PhysicsWorld::default();
        let track = Track::default();
        let mut body = sports_body(Vec3::new(0.0, 3.0, 0.0));

        for _ in 0..240 {
            world.step_body(&mut body, &track);
        }

        assert!((body.position.y - 0.5).abs() < 1e-4, "{:?}", body.position);
        assert!(body.linear_velocity.y.abs() < 1e-4);
    }

    #[test]
    fn damping_slows_a_sliding_body() {
        let world = PhysicsWorld::default();
        let track = Track::default();
        let mut body = sports_body(Vec3::new(0.0, 0.5, 0.0));
        body.linear_velocity = Vec3::new(0.0, 0.0, 10.0);

        world.step_body(&mut body, &track);

        assert!(body.linear_velocity.z < 10.0);
        assert!(body.linear_velocity.z > 9.0);
        assert!(body.position.z > 0.0);
    }

    #[test]
    fn yaw_rate_turns_the_body_about_the_vertical_axis() {
        let world = PhysicsWorld::default();
        let track = Track::default();
        let mut body = sports_body(Vec3::new(0.0, 0.5, 0.0));
        body.angular_velocity = Vec3::new(0.0, 1.0, 0.0);

        world.step_body(&mut body, &track);

        let forward = body.orientation * Vec3::Z;
        assert!(forward.x > 0.0);
        assert!(forward.y.abs() < 1e-6);
        assert!((body.orientation.length() - 1.0).abs() < 1e-5);
    }
}

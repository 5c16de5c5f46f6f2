//! Control input snapshots and the keyboard input source
//!
//! Both the player and the AI drivers produce the same [`ControlInput`] structure.
//! The controller only ever reads it.

use bevy::prelude::*;

use crate::camera::CameraRig;
use crate::controller::{self, VehicleState};
use crate::physics::PhysicsBody;
use crate::SimulationSet;

/// Requested actions for one tick. Anything not requested is `false`.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component)]
pub struct ControlInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub brake: bool,
    pub nitro: bool,
}

impl ControlInput {
    /// Input with only `forward` set
    pub fn forward() -> Self {
        Self {
            forward: true,
            ..default()
        }
    }

    /// Whether the throttle is engaged in either direction
    pub fn throttle(&self) -> bool {
        self.forward || self.backward
    }
}

/// Who produces the [`ControlInput`] of a vehicle
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component)]
pub enum Driver {
    /// Keyboard driven
    Player,
    /// Driven by the [`AiPolicy`](crate::ai::AiPolicy)
    Ai,
    /// Not driven at all; only visuals follow the body
    #[default]
    Parked,
}

impl Driver {
    /// Whether control integration runs for this vehicle
    pub fn is_driven(self) -> bool {
        !matches!(self, Driver::Parked)
    }
}

/// Plugin wiring the keyboard to the player's vehicle
pub struct PlayerInputPlugin;

impl Plugin for PlayerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (read_player_keyboard, handle_player_actions).in_set(SimulationSet::Input),
        );
    }
}

fn pressed_any(keyboard: &ButtonInput<KeyCode>, keys: &[KeyCode]) -> bool {
    keys.iter().any(|key| keyboard.pressed(*key))
}

/// Sample the keyboard into the player's control input
fn read_player_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&Driver, &mut ControlInput)>,
) {
    let input = ControlInput {
        forward: pressed_any(&keyboard, &[KeyCode::ArrowUp, KeyCode::KeyW]),
        backward: pressed_any(&keyboard, &[KeyCode::ArrowDown, KeyCode::KeyS]),
        left: pressed_any(&keyboard, &[KeyCode::ArrowLeft, KeyCode::KeyA]),
        right: pressed_any(&keyboard, &[KeyCode::ArrowRight, KeyCode::KeyD]),
        brake: keyboard.pressed(KeyCode::Space),
        nitro: pressed_any(&keyboard, &[KeyCode::ShiftLeft, KeyCode::ShiftRight]),
    };

    for (driver, mut control) in query.iter_mut() {
        if *driver == Driver::Player {
            *control = input;
        }
    }
}

/// Camera switching (C) and respawn (R)
fn handle_player_actions(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&Driver, &mut VehicleState, &mut PhysicsBody, Option<&mut CameraRig>)>,
) {
    let switch = keyboard.just_pressed(KeyCode::KeyC);
    let reset = keyboard.just_pressed(KeyCode::KeyR);
    if !switch && !reset {
        return;
    }

    for (driver, mut state, mut body, rig) in query.iter_mut() {
        if *driver != Driver::Player {
            continue;
        }
        if switch {
            if let Some(mut rig) = rig {
                rig.switch();
                info!("Camera mode: {:?}", rig.mode);
            }
        }
        if reset {
            controller::reset(&mut state, &mut body);
            info!("Player vehicle reset to the start line");
        }
    }
}

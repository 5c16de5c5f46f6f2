//! # NitroRace
//!
//! Arcade racing with nitro boosts: a player car and AI opponents on a ring track.
//!
//! Every frame the physics world is stepped once with a fixed timestep, then each
//! driven vehicle runs [`controller::update`] with the frame's delta time, and finally
//! wheel visuals, camera rigs, render poses and the [`hud::RaceReadout`] are derived
//! from the new state. These phases are the [`SimulationSet`]s, chained in order.
//!
//! [`VehicleSimPlugin`] contains only the simulation and runs headless. The rendering,
//! keyboard and HUD plugins are added by the game binary.

use bevy::prelude::*;

pub mod ai;
pub mod camera;
pub mod car;
pub mod controller;
pub mod hud;
pub mod input;
pub mod physics;
pub mod profile;
pub mod settings;
pub mod track;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::ai::{AiPolicy, DriverPolicy, WeavingPolicy};
    pub use crate::camera::{CameraMode, CameraRig, CameraView};
    pub use crate::car::{vehicle, Vehicle};
    pub use crate::controller::{NitroState, VehicleState, WheelVisualState};
    pub use crate::hud::{RaceClock, RaceReadout};
    pub use crate::input::{ControlInput, Driver};
    pub use crate::physics::{PhysicsBody, PhysicsWorld};
    pub use crate::profile::{VehicleClass, VehicleProfile};
    pub use crate::settings::RaceSettings;
    pub use crate::track::Track;
    pub use crate::{SimulationSet, VehicleSimPlugin};
}

/// Per-frame phases of the simulation, run in declaration order
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Player and AI input is sampled
    Input,
    /// The physics world is stepped once
    Physics,
    /// Controllers update every driven vehicle
    Control,
    /// Visual and readout state is derived
    Present,
}

/// Headless vehicle simulation.
///
/// Reads [`settings::RaceSettings`] if it was inserted before the plugin is added,
/// otherwise uses the defaults.
pub struct VehicleSimPlugin;

impl Plugin for VehicleSimPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<settings::RaceSettings>()
            .cloned()
            .unwrap_or_default();

        app.register_type::<car::Vehicle>();
        app.register_type::<input::ControlInput>();
        app.register_type::<input::Driver>();
        app.register_type::<controller::VehicleState>();
        app.register_type::<controller::WheelVisualState>();
        app.register_type::<physics::PhysicsBody>();
        app.register_type::<camera::CameraRig>();

        app.insert_resource(physics::PhysicsWorld {
            gravity: Vec3::new(0.0, -settings.gravity, 0.0),
            fixed_dt: settings.fixed_dt(),
        })
        .insert_resource(ai::AiPolicy::new(ai::WeavingPolicy::seeded(settings.ai_seed)))
        .insert_resource(settings)
        .init_resource::<track::Track>()
        .init_resource::<hud::RaceReadout>()
        .init_resource::<hud::RaceClock>();

        app.configure_sets(
            Update,
            (
                SimulationSet::Input,
                SimulationSet::Physics,
                SimulationSet::Control,
                SimulationSet::Present,
            )
                .chain(),
        );

        app.add_systems(Update, ai::drive_ai_vehicles.in_set(SimulationSet::Input))
            .add_systems(Update, physics::step_physics.in_set(SimulationSet::Physics))
            .add_systems(Update, car::drive_vehicles.in_set(SimulationSet::Control))
            .add_systems(
                Update,
                (
                    car::animate_wheels,
                    camera::follow_vehicles,
                    car::sync_render_pose,
                    hud::publish_readout,
                )
                    .chain()
                    .in_set(SimulationSet::Present),
            );
    }
}

//! AI drivers
//!
//! AI vehicles are driven through the same [`ControlInput`] as the player. The input
//! comes from a [`DriverPolicy`] that depends only on simulation time and its own
//! seeded random source, so races replay identically for the same seed.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::input::{ControlInput, Driver};

/// Produces control input for AI vehicles
pub trait DriverPolicy: Send + Sync + 'static {
    /// Input for the next vehicle at the given simulation time
    fn next_input(&mut self, elapsed_secs: f32) -> ControlInput;
}

/// Always on the throttle, weaving left and right on a slow sine, with random
/// bursts of nitro
pub struct WeavingPolicy {
    rng: StdRng,
    /// Radians of the weave per simulated second
    pub weave_rate: f32,
    /// Steer once the weave passes this magnitude
    pub steer_threshold: f32,
    /// Probability of requesting nitro on a given tick
    pub nitro_chance: f64,
}

impl WeavingPolicy {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            weave_rate: 1.0,
            steer_threshold: 0.7,
            nitro_chance: 0.1,
        }
    }
}

impl DriverPolicy for WeavingPolicy {
    fn next_input(&mut self, elapsed_secs: f32) -> ControlInput {
        let weave = (elapsed_secs * self.weave_rate).sin();
        ControlInput {
            forward: true,
            left: weave > self.steer_threshold,
            right: weave < -self.steer_threshold,
            brake: false,
            nitro: self.rng.gen_bool(self.nitro_chance),
            ..default()
        }
    }
}

/// The policy shared by every AI vehicle
#[derive(Resource)]
pub struct AiPolicy(pub Box<dyn DriverPolicy>);

impl AiPolicy {
    pub fn new(policy: impl DriverPolicy) -> Self {
        Self(Box::new(policy))
    }
}

impl Default for AiPolicy {
    fn default() -> Self {
        Self::new(WeavingPolicy::seeded(0))
    }
}

/// Fill in control input for every AI vehicle
pub fn drive_ai_vehicles(
    time: Res<Time>,
    mut policy: ResMut<AiPolicy>,
    mut query: Query<(&Driver, &mut ControlInput)>,
) {
    let elapsed = time.elapsed_secs();
    for (driver, mut input) in query.iter_mut() {
        if *driver == Driver::Ai {
            *input = policy.0.next_input(elapsed);
        }
    }
}

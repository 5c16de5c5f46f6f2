//! Per-tick vehicle control
//!
//! [`update`] turns a [`ControlInput`] and the post-step body state into new velocity,
//! yaw rate, steering angle and nitro level. All quantities saturate instead of
//! failing: nitro stays in `[0, 100]`, steering within `±MAX_STEERING_ANGLE`, and
//! velocity never exceeds the class top speed times the nitro multiplier.
//!
//! Acceleration is added once per tick without scaling by `dt`, so top speed is
//! reached in a fixed number of ticks regardless of frame time. Nitro on the other
//! hand drains and recharges per second.

use std::f32::consts::FRAC_PI_3;

use bevy::prelude::*;

use crate::input::ControlInput;
use crate::physics::PhysicsBody;
use crate::profile::VehicleProfile;

/// Largest steering angle in either direction, in radians
pub const MAX_STEERING_ANGLE: f32 = FRAC_PI_3;
/// Full nitro tank
pub const NITRO_CAPACITY: f32 = 100.0;
/// Nitro drained per second while boosting
pub const NITRO_DEPLETION_RATE: f32 = 30.0;
/// Nitro regained per second while not boosting
pub const NITRO_RECHARGE_RATE: f32 = 10.0;

const REVERSE_STRENGTH: f32 = 0.5;
const STEERING_RETURN: f32 = 0.9;
const YAW_RATE_GAIN: f32 = 5.0;
const BRAKE_FACTOR: f32 = 0.95;
const COAST_FACTOR: f32 = 0.99;
const WHEEL_SPIN_GAIN: f32 = 0.3;

/// Where the start line spawn puts a vehicle
pub const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Mutable per-vehicle control state
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct VehicleState {
    /// Positive steers left
    pub steering_angle: f32,
    pub nitro_amount: f32,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            steering_angle: 0.0,
            nitro_amount: NITRO_CAPACITY,
        }
    }
}

/// Whether nitro boosts the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NitroState {
    Idle,
    Active,
}

impl NitroState {
    /// Advance the nitro tank by `dt` and report the resulting state.
    ///
    /// Nitro is active while requested with fuel left after this tick's drain or
    /// recharge, so a tank that just refilled from empty boosts immediately.
    pub fn step(state: &mut VehicleState, requested: bool, dt: f32) -> Self {
        if requested && state.nitro_amount > 0.0 {
            state.nitro_amount = (state.nitro_amount - NITRO_DEPLETION_RATE * dt).max(0.0);
        } else {
            state.nitro_amount =
                (state.nitro_amount + NITRO_RECHARGE_RATE * dt).min(NITRO_CAPACITY);
        }

        if requested && state.nitro_amount > 0.0 {
            NitroState::Active
        } else {
            NitroState::Idle
        }
    }

    pub fn speed_multiplier(self, profile: &VehicleProfile) -> f32 {
        match self {
            NitroState::Active => profile.nitro_boost_factor,
            NitroState::Idle => 1.0,
        }
    }
}

/// Body-aligned driving directions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl DriveBasis {
    pub fn from_orientation(orientation: Quat) -> Self {
        Self {
            forward: orientation * Vec3::Z,
            right: orientation * Vec3::X,
        }
    }
}

/// Render-only wheel angles
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct WheelVisualState {
    /// Yaw of the front wheels
    pub front_yaw: f32,
    /// Accumulated rolling angle of all wheels
    pub spin: f32,
}

impl WheelVisualState {
    /// Follow the steering angle and roll with the current speed
    pub fn follow(&mut self, state: &VehicleState, body: &PhysicsBody) {
        self.front_yaw = state.steering_angle;
        self.spin = (self.spin + body.speed() * WHEEL_SPIN_GAIN) % std::f32::consts::TAU;
    }
}

/// Normalized speed used to soften steering at speed, in `[0.5, 1]`
pub fn speed_factor(profile: &VehicleProfile, speed: f32) -> f32 {
    (speed / (profile.max_speed * 0.5)).clamp(0.5, 1.0)
}

/// Run control integration for one tick.
///
/// Returns the nitro state the tick ran with.
pub fn update(
    profile: &VehicleProfile,
    body: &mut PhysicsBody,
    state: &mut VehicleState,
    input: &ControlInput,
    dt: f32,
) -> NitroState {
    let nitro = NitroState::step(state, input.nitro, dt);
    let multiplier = nitro.speed_multiplier(profile);
    let basis = DriveBasis::from_orientation(body.orientation);

    let acceleration = if input.forward {
        basis.forward * profile.acceleration * multiplier
    } else if input.backward {
        basis.forward * -profile.acceleration * multiplier * REVERSE_STRENGTH
    } else {
        Vec3::ZERO
    };
    body.linear_velocity += acceleration;

    let speed_factor = speed_factor(profile, body.speed());
    let power_steering = profile.power_steering_gain * (2.0 - speed_factor);
    let steer_step = profile.turn_rate * power_steering;

    state.steering_angle = if input.left {
        (state.steering_angle + steer_step).min(MAX_STEERING_ANGLE)
    } else if input.right {
        (state.steering_angle - steer_step).max(-MAX_STEERING_ANGLE)
    } else {
        state.steering_angle * STEERING_RETURN
    };

    body.angular_velocity.y = state.steering_angle * YAW_RATE_GAIN * speed_factor;

    let limit = profile.max_speed * multiplier;
    let speed_sq = body.linear_velocity.length_squared();
    if speed_sq > limit * limit {
        body.linear_velocity = body.linear_velocity / speed_sq.sqrt() * limit;
    }

    if input.brake {
        body.linear_velocity *= BRAKE_FACTOR;
    }
    if !input.throttle() {
        body.linear_velocity *= COAST_FACTOR;
    }

    nitro
}

/// Put a vehicle back on the start line with a full tank
pub fn reset(state: &mut VehicleState, body: &mut PhysicsBody) {
    *state = VehicleState::default();
    body.position = SPAWN_POSITION;
    body.orientation = Quat::from_axis_angle(Vec3::Y, 0.0);
    body.linear_velocity = Vec3::ZERO;
    body.angular_velocity = Vec3::ZERO;
}

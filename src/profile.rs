//! Per-class vehicle tuning
//!
//! Every vehicle class maps to one immutable [`VehicleProfile`] held in a static table.

use bevy::prelude::*;

/// The vehicle classes available in a race
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum VehicleClass {
    #[default]
    Sports,
    Suv,
    Muscle,
    Supercar,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 4] = [
        VehicleClass::Sports,
        VehicleClass::Suv,
        VehicleClass::Muscle,
        VehicleClass::Supercar,
    ];

    /// Resolve a class by name. Unrecognized names fall back to [`VehicleClass::Sports`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "sports" => VehicleClass::Sports,
            "suv" => VehicleClass::Suv,
            "muscle" => VehicleClass::Muscle,
            "supercar" => VehicleClass::Supercar,
            other => {
                warn!("Unknown vehicle class '{}', using sports profile", other);
                VehicleClass::Sports
            }
        }
    }

    /// The tuning constants for this class
    pub fn profile(self) -> &'static VehicleProfile {
        match self {
            VehicleClass::Sports => &PROFILES[0],
            VehicleClass::Suv => &PROFILES[1],
            VehicleClass::Muscle => &PROFILES[2],
            VehicleClass::Supercar => &PROFILES[3],
        }
    }
}

/// Body size of a vehicle, in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub length: f32,
}

impl Dimensions {
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.length) * 0.5
    }
}

/// Immutable handling constants shared by every vehicle of a class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleProfile {
    /// Top speed without nitro
    pub max_speed: f32,
    /// Velocity added per tick while accelerating
    pub acceleration: f32,
    /// Steering angle change per tick, before power steering
    pub turn_rate: f32,
    /// Base gain of the speed-dependent power steering
    pub power_steering_gain: f32,
    /// Speed multiplier while nitro is active
    pub nitro_boost_factor: f32,
    pub dimensions: Dimensions,
    pub mass: f32,
}

const NITRO_BOOST: f32 = 1.5;

static PROFILES: [VehicleProfile; 4] = [
    // Sports
    VehicleProfile {
        max_speed: 50.0,
        acceleration: 0.5,
        turn_rate: 0.03,
        power_steering_gain: 1.2,
        nitro_boost_factor: NITRO_BOOST,
        dimensions: Dimensions {
            width: 2.0,
            height: 1.0,
            length: 4.0,
        },
        mass: 1000.0,
    },
    // Suv
    VehicleProfile {
        max_speed: 40.0,
        acceleration: 0.3,
        turn_rate: 0.025,
        power_steering_gain: 0.8,
        nitro_boost_factor: NITRO_BOOST,
        dimensions: Dimensions {
            width: 2.2,
            height: 1.8,
            length: 4.5,
        },
        mass: 2000.0,
    },
    // Muscle
    VehicleProfile {
        max_speed: 45.0,
        acceleration: 0.6,
        turn_rate: 0.028,
        power_steering_gain: 1.0,
        nitro_boost_factor: NITRO_BOOST,
        dimensions: Dimensions {
            width: 2.4,
            height: 1.3,
            length: 4.2,
        },
        mass: 1500.0,
    },
    // Supercar
    VehicleProfile {
        max_speed: 60.0,
        acceleration: 0.7,
        turn_rate: 0.035,
        power_steering_gain: 1.5,
        nitro_boost_factor: NITRO_BOOST,
        dimensions: Dimensions {
            width: 2.0,
            height: 1.0,
            length: 4.5,
        },
        mass: 800.0,
    },
];

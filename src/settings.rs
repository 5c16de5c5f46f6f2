//! Race settings
//!
//! Read once at startup from an optional `race.yaml` next to the executable's working
//! directory. Missing keys take the defaults below.

use bevy::prelude::*;
use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::profile::VehicleClass;

const SETTINGS_FILE: &str = "race";

#[derive(Resource, Deserialize, Debug, Clone, PartialEq)]
pub struct RaceSettings {
    /// Class name of the player's vehicle
    pub player_class: String,
    /// Number of AI opponents
    pub ai_count: usize,
    /// Seed for AI decisions and spawn scatter
    pub ai_seed: u64,
    /// Physics steps per second
    pub physics_hz: f32,
    /// Downward gravity acceleration
    pub gravity: f32,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            player_class: "supercar".into(),
            ai_count: 4,
            ai_seed: 7,
            physics_hz: 60.0,
            gravity: 9.82,
        }
    }
}

impl RaceSettings {
    /// Load `race.yaml` on top of the defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(File::with_name(SETTINGS_FILE).required(false))
    }

    fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = RaceSettings::default();
        let config = Config::builder()
            .set_default("player_class", defaults.player_class)?
            .set_default("ai_count", defaults.ai_count as i64)?
            .set_default("ai_seed", defaults.ai_seed as i64)?
            .set_default("physics_hz", defaults.physics_hz as f64)?
            .set_default("gravity", defaults.gravity as f64)?
            .add_source(source)
            .build()?;

        config.try_deserialize()
    }

    /// Load the settings, falling back to defaults when the file is unreadable
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(settings) => settings,
            Err(err) => {
                warn!("Could not read race settings ({}), using defaults", err);
                Self::default()
            }
        }
    }

    pub fn player_class(&self) -> VehicleClass {
        VehicleClass::from_name(&self.player_class)
    }

    /// Fixed physics timestep; non-positive rates fall back to 60 Hz
    pub fn fixed_dt(&self) -> f32 {
        if self.physics_hz > 0.0 {
            1.0 / self.physics_hz
        } else {
            1.0 / 60.0
        }
    }
}

//! Simulation tuning
//!
//! Every field has a default from `consts`; a JSON document may override any
//! subset of them.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::sim::Color;

/// What to do with a spawn whose disc would poke past a border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpawnPolicy {
    /// Drop the request
    #[default]
    Reject,
    /// Slide the center inside the surface
    Clamp,
}

impl SpawnPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnPolicy::Reject => "Reject",
            SpawnPolicy::Clamp => "Clamp",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reject" => Some(SpawnPolicy::Reject),
            "clamp" => Some(SpawnPolicy::Clamp),
            _ => None,
        }
    }
}

/// Physics and spawn configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Dynamics ===
    pub gravity: f32,
    /// Bounce damping, 0 = dead stop, 1 = perfectly elastic
    pub friction: f32,
    pub mass: f32,
    pub initial_velocity: Vec2,

    // === Spawning ===
    pub radius_min: i32,
    pub radius_max: i32,
    pub palette: Vec<Color>,
    pub spawn_policy: SpawnPolicy,

    // === Lifecycle ===
    pub restart_delay_ms: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: consts::GRAVITY,
            friction: consts::FRICTION,
            mass: consts::MASS,
            initial_velocity: Vec2::new(consts::SPAWN_VELOCITY.0, consts::SPAWN_VELOCITY.1),

            radius_min: consts::RADIUS_MIN,
            radius_max: consts::RADIUS_MAX,
            palette: consts::PALETTE.iter().map(|&c| Color::from(c)).collect(),
            spawn_policy: SpawnPolicy::Reject,

            restart_delay_ms: consts::RESTART_DELAY_MS,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON override document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject values the physics cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.radius_min < 1 || self.radius_min > self.radius_max {
            return Err(ConfigError::InvalidRadiusRange {
                min: self.radius_min,
                max: self.radius_max,
            });
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(ConfigError::FrictionOutOfRange(self.friction));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFiniteGravity(self.gravity));
        }
        Ok(())
    }

    /// Read overrides from the `#sim-config` element, if any (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("sim-config"))
            .and_then(|el| el.text_content());

        if let Some(json) = text {
            match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded simulation config from #sim-config");
                    return config;
                }
                Err(e) => log::warn!("Ignoring #sim-config: {e}"),
            }
        }

        log::info!("Using default simulation config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

/// Why a config document was refused
#[derive(Debug)]
pub enum ConfigError {
    /// Not valid JSON, or a field had the wrong type
    Parse(serde_json::Error),
    EmptyPalette,
    InvalidRadiusRange { min: i32, max: i32 },
    FrictionOutOfRange(f32),
    NonFiniteGravity(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "config is not valid JSON: {e}"),
            ConfigError::EmptyPalette => write!(f, "palette must contain at least one color"),
            ConfigError::InvalidRadiusRange { min, max } => write!(
                f,
                "radius range [{min}, {max}] is invalid (need 1 <= min <= max)"
            ),
            ConfigError::FrictionOutOfRange(v) => {
                write!(f, "friction {v} is outside [0, 1]")
            }
            ConfigError::NonFiniteGravity(v) => write!(f, "gravity {v} is not finite"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

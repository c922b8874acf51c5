//! Unified configuration for the collision core
//!
//! All tunables of the collision pass live in one serializable struct:
//! grid granularity, world bounds, the sweep-mode switch, the detection
//! cone's ray density, and the out-of-bounds margin. Values load from TOML
//! with sensible defaults matching a 640x360 pixel game world.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// A field holds a value the collision core cannot operate with
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables for the collision and motion core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionConfig {
    /// Spatial hash cell size in world units
    pub cell_size: u32,

    /// World width covered by the spatial hash
    pub world_width: u32,

    /// World height covered by the spatial hash
    pub world_height: u32,

    /// Per-axis span (world units per frame) above which the sweep test
    /// switches from the unit stepper to the coarse high-speed stepper
    pub high_speed_threshold: f32,

    /// Angular step (radians) between consecutive rays of a detection cone
    pub detection_angle_step: f32,

    /// Margin outside the world rect before an entity counts as out of bounds
    pub bounds_margin: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cell_size: 32,
            world_width: 640,
            world_height: 360,
            high_speed_threshold: 64.0,
            detection_angle_step: std::f32::consts::PI / 36.0,
            bounds_margin: 100.0,
        }
    }
}

impl CollisionConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check that the grid described by this config is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::Invalid("cell_size must be non-zero".into()));
        }
        if self.world_width == 0 || self.world_height == 0 {
            return Err(ConfigError::Invalid(
                "world dimensions must be non-zero".into(),
            ));
        }
        if self.detection_angle_step <= 0.0 {
            return Err(ConfigError::Invalid(
                "detection_angle_step must be positive".into(),
            ));
        }
        Ok(())
    }
}

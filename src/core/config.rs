//! Game configuration with documented constants
//!
//! Everything the core needs that is not part of the static data tables:
//! grid bounds, layout scale, and sight range.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{CoreError, Result};
use crate::map::constants::{
    DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, MAX_SIGHT_RADIUS, SIGHT_RADIUS, TILE_SIZE,
};

/// Configuration for a single game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of tile columns
    pub width: u32,

    /// Number of tile rows
    pub height: u32,

    /// Hex circumradius in plane units
    ///
    /// Only the layout transform reads this. Distances, the neighbor
    /// threshold and the pathfinding heuristic all scale with it, so the
    /// grid topology is independent of the chosen value.
    pub tile_size: f64,

    /// How many hex rings a privileged unit or claim reveals
    pub sight_radius: u32,

    /// Seed for map generation
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
            tile_size: TILE_SIZE,
            sight_radius: SIGHT_RADIUS,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::InvalidConfig(format!(
                "map must have at least one tile, got {}x{}",
                self.width, self.height
            )));
        }

        // Offset coordinates are stored as i32
        if self.width > i32::MAX as u32 || self.height > i32::MAX as u32 {
            return Err(CoreError::InvalidConfig("map dimensions exceed i32 range".into()));
        }

        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "tile_size must be positive and finite, got {}",
                self.tile_size
            )));
        }

        if self.sight_radius > MAX_SIGHT_RADIUS {
            return Err(CoreError::InvalidConfig(format!(
                "sight_radius must be at most {}, got {}",
                MAX_SIGHT_RADIUS, self.sight_radius
            )));
        }

        Ok(())
    }

    /// Parse a config from a TOML string and validate it
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_width_rejected() {
        let config = GameConfig::default().with_size(0, 10);
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_bad_tile_size_rejected() {
        let config = GameConfig {
            tile_size: -1.0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sight_radius_bounded() {
        let err = GameConfig::parse_toml("sight_radius = 4000000000\n").unwrap_err();
        assert!(err.is_config_error());

        let edge = format!("sight_radius = {}\n", MAX_SIGHT_RADIUS);
        assert_eq!(GameConfig::parse_toml(&edge).unwrap().sight_radius, MAX_SIGHT_RADIUS);
    }

    #[test]
    fn test_parse_partial_toml_uses_defaults() {
        let config = GameConfig::parse_toml("width = 12\nheight = 8\nseed = 99\n").unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.height, 8);
        assert_eq!(config.seed, 99);
        assert_eq!(config.sight_radius, SIGHT_RADIUS);
        assert_eq!(config.tile_size, TILE_SIZE);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = GameConfig::parse_toml("width = \"wide\"").unwrap_err();
        assert!(matches!(err, CoreError::TomlError(_)));
    }
}

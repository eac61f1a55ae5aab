//! Terrain types and tile modifiers
//!
//! Weights and colors live in the static data tables; this module only
//! names the terrain kinds and carries resolved modifier data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary terrain type of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    #[default]
    Water,
    Land,
    Rock,
    Snow,
    DarkLand,
    Sand,
}

impl TileType {
    /// Key used in the static data tables
    pub fn key(&self) -> &'static str {
        match self {
            TileType::Water => "water",
            TileType::Land => "land",
            TileType::Rock => "rock",
            TileType::Snow => "snow",
            TileType::DarkLand => "dark_land",
            TileType::Sand => "sand",
        }
    }

    pub fn all() -> [TileType; 6] {
        [
            TileType::Water,
            TileType::Land,
            TileType::Rock,
            TileType::Snow,
            TileType::DarkLand,
            TileType::Sand,
        ]
    }

    /// Units can found settlements and spawn here
    pub fn is_land(&self) -> bool {
        !matches!(self, TileType::Water)
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Static per-terrain data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainData {
    pub weight: f64,
    pub color: String,
}

/// A named overlay on a tile (forest, hills, ...) resolved from the tables
///
/// Only the image key is kept; loading the image belongs to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub weight: f64,
    pub image: String,
}

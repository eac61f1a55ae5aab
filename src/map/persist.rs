//! Saving and restoring the map
//!
//! Only terrain, modifier and the display flag are stored per tile. Plane
//! positions are recomputed from map coordinates on load, so a save stays
//! valid if the layout scale changes.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::config::GameConfig;
use crate::core::error::{CoreError, Result};
use crate::data::StaticData;
use crate::map::grid::HexGrid;
use crate::map::terrain::TileType;
use crate::map::tile::SerializedTile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<SerializedTile>,
}

impl HexGrid {
    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            width: self.width(),
            height: self.height(),
            tiles: self.tiles().map(|t| t.serialize()).collect(),
        }
    }

    /// Rebuild a grid from a snapshot
    ///
    /// `config` supplies layout and sight settings; its bounds are replaced
    /// by the snapshot's.
    pub fn restore(snapshot: &MapSnapshot, config: &GameConfig, data: Arc<StaticData>) -> Result<Self> {
        let config = config.clone().with_size(snapshot.width, snapshot.height);
        let mut grid = HexGrid::new(&config, Arc::clone(&data), TileType::Water)?;
        for saved in &snapshot.tiles {
            let tile = grid
                .get_mut(saved.map_pos)
                .ok_or(CoreError::OutOfBounds(saved.map_pos))?;
            tile.load_data(saved, &data)?;
        }
        Ok(grid)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: &Path, config: &GameConfig, data: Arc<StaticData>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: MapSnapshot = serde_json::from_str(&content)?;
        Self::restore(&snapshot, config, data)
    }
}

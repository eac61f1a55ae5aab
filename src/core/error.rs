use thiserror::Error;

use crate::core::types::{EntityId, FactionId};
use crate::map::hex::MapCoord;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown terrain type: {0}")]
    UnknownTerrain(String),

    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),

    #[error("Unknown unit template: {0}")]
    UnknownUnitTemplate(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Tile out of bounds: {0}")]
    OutOfBounds(MapCoord),

    #[error("Tile {coord} already occupied by entity {occupant}")]
    TileOccupied { coord: MapCoord, occupant: EntityId },

    #[error("Tile {coord} already claimed by settlement {owner}")]
    TileClaimed { coord: MapCoord, owner: EntityId },

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Faction not found: {0}")]
    FactionNotFound(FactionId),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl CoreError {
    /// Configuration errors are never retried; callers should abort
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CoreError::UnknownTerrain(_)
                | CoreError::UnknownModifier(_)
                | CoreError::UnknownUnitTemplate(_)
                | CoreError::InvalidConfig(_)
                | CoreError::TomlError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

//! World map - hex grid, adjacency, pathfinding and fog of war
//!
//! The grid is the substrate every other subsystem queries:
//! - Tiles are addressed by offset coordinates and laid out on a plane
//! - Neighbor rings come from a rectangular scan plus a geometric cut
//! - A* runs over the 1-ring graph with tile weights as entry costs
//! - Visibility is tracked for one privileged observer only

pub mod adjacency;
pub mod borders;
pub mod constants;
pub mod generate;
pub mod grid;
pub mod hex;
pub mod pathfinding;
pub mod persist;
pub mod terrain;
pub mod tile;
pub mod visibility;

// Re-exports for convenient access
pub use adjacency::NamedNeighbors;
pub use borders::{tile_border, Border};
pub use constants::*;
pub use generate::generate;
pub use grid::HexGrid;
pub use hex::{AxialCoord, HexDirection, HexLayout, MapCoord, PlanePos};
pub use pathfinding::{find_path, find_path_filtered, path_cost, PathError};
pub use persist::MapSnapshot;
pub use terrain::{Modifier, TerrainData, TileType};
pub use tile::{Claim, Selection, SerializedTile, Tile};
pub use visibility::{appearance, TileAppearance};

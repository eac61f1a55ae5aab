//! Hex Dominion - turn-based strategy core on a hexagonal map

pub mod core;
pub mod data;
pub mod entity;
pub mod map;
pub mod turn;
pub mod world;

//! Map constants - all tunable values in one place

// Layout scale (hex circumradius in plane units)
pub const TILE_SIZE: f64 = 75.0;

// Default map bounds (tiles)
pub const DEFAULT_MAP_WIDTH: u32 = 50;
pub const DEFAULT_MAP_HEIGHT: u32 = 50;

// Vision (hex rings revealed around an observed tile)
pub const SIGHT_RADIUS: u32 = 3;
pub const MAX_SIGHT_RADIUS: u32 = 32;

// Settlements claim this many rings of territory when founded
pub const SETTLEMENT_CLAIM_RADIUS: u32 = 1;

// Generation
pub const GENERATION_SMOOTHING_PASSES: u32 = 2;
pub const MODIFIER_CHANCE: f64 = 0.15;

//! Seeded random map generation
//!
//! Rolls terrain per tile, smooths it towards the neighborhood majority and
//! scatters modifiers over land. Same seed, same map.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::data::StaticData;
use crate::map::constants::{GENERATION_SMOOTHING_PASSES, MODIFIER_CHANCE};
use crate::map::grid::HexGrid;
use crate::map::hex::MapCoord;
use crate::map::terrain::TileType;

/// Relative frequency of each terrain in the initial roll
const TERRAIN_WEIGHTS: [(TileType, u32); 6] = [
    (TileType::Water, 30),
    (TileType::Land, 35),
    (TileType::DarkLand, 12),
    (TileType::Sand, 10),
    (TileType::Rock, 8),
    (TileType::Snow, 5),
];

fn roll_terrain<R: Rng>(rng: &mut R) -> TileType {
    let total: u32 = TERRAIN_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut pick = rng.gen_range(0..total);
    for (tile_type, weight) in TERRAIN_WEIGHTS {
        if pick < weight {
            return tile_type;
        }
        pick -= weight;
    }
    TileType::Land
}

/// Most common terrain around a tile (ties go to the tile's own terrain)
fn majority(grid: &HexGrid, coord: MapCoord) -> Option<TileType> {
    let own = grid.get(coord)?.tile_type();
    let mut counts = [0usize; 6];
    for n in grid.neighbors(coord, 1) {
        if let Some(tile) = grid.get(n) {
            counts[tile.tile_type() as usize] += 1;
        }
    }
    let best = TileType::all()
        .into_iter()
        .max_by_key(|t| (counts[*t as usize], *t == own))?;
    Some(if counts[best as usize] > counts[own as usize] + 1 {
        best
    } else {
        own
    })
}

/// Generate a map from the config's seed
pub fn generate(config: &GameConfig, data: Arc<StaticData>) -> Result<HexGrid> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut grid = HexGrid::new(config, data, TileType::Water)?;

    let coords: Vec<MapCoord> = grid.coords().collect();
    for &coord in &coords {
        grid.set_terrain(coord, roll_terrain(&mut rng))?;
    }

    for _ in 0..GENERATION_SMOOTHING_PASSES {
        let smoothed: Vec<(MapCoord, TileType)> = coords
            .iter()
            .filter_map(|&c| majority(&grid, c).map(|t| (c, t)))
            .collect();
        for (coord, tile_type) in smoothed {
            grid.set_terrain(coord, tile_type)?;
        }
    }

    let modifiers: Vec<String> = grid.data().modifier_names().map(str::to_string).collect();
    if !modifiers.is_empty() {
        for &coord in &coords {
            let land = grid.get(coord).map_or(false, |t| t.tile_type().is_land());
            if land && rng.gen_bool(MODIFIER_CHANCE) {
                if let Some(name) = modifiers.choose(&mut rng) {
                    grid.set_modifier(coord, Some(name))?;
                }
            }
        }
    }

    info!(
        width = config.width,
        height = config.height,
        seed = config.seed,
        land = grid.tiles().filter(|t| t.tile_type().is_land()).count(),
        "generated map"
    );
    Ok(grid)
}

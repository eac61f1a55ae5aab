//! A* pathfinding over the world map
//!
//! Entering a tile costs that tile's weight. The heuristic is the plane
//! distance to the goal converted to hex steps and scaled by the cheapest
//! tile on the map, which keeps it admissible for any table weights.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::map::grid::HexGrid;
use crate::map::hex::MapCoord;
use crate::map::tile::Tile;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    #[error("No path from {start} to {goal}")]
    NoPath { start: MapCoord, goal: MapCoord },
}

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    coord: MapCoord,
    f_cost: OrderedFloat<f64>,
    /// Discovery order, earlier wins ties
    seq: u64,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the cheapest path from `start` to `goal`
///
/// The path excludes `start` and ends with `goal`; `start == goal` yields an
/// empty path.
pub fn find_path(grid: &HexGrid, start: MapCoord, goal: MapCoord) -> Result<Vec<MapCoord>, PathError> {
    find_path_filtered(grid, start, goal, |_| true)
}

/// Like `find_path`, but tiles failing `passable` are never entered
///
/// The goal itself must also be passable.
pub fn find_path_filtered<F>(
    grid: &HexGrid,
    start: MapCoord,
    goal: MapCoord,
    passable: F,
) -> Result<Vec<MapCoord>, PathError>
where
    F: Fn(&Tile) -> bool,
{
    let no_path = PathError::NoPath { start, goal };
    if !grid.contains(start) {
        return Err(no_path);
    }
    match grid.get(goal) {
        Some(tile) if start == goal || passable(tile) => {}
        _ => return Err(no_path),
    }
    if start == goal {
        return Ok(Vec::new());
    }

    let step_length = grid.layout().step_length();
    let min_weight = grid.min_weight().max(0.0);
    let heuristic = |coord: MapCoord| grid.dist(coord, goal) / step_length * min_weight;

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<MapCoord, MapCoord> = AHashMap::new();
    let mut g_scores: AHashMap<MapCoord, f64> = AHashMap::new();
    let mut closed: AHashSet<MapCoord> = AHashSet::new();
    let mut seq = 0u64;

    g_scores.insert(start, 0.0);
    open_set.push(PathNode {
        coord: start,
        f_cost: OrderedFloat(heuristic(start)),
        seq,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return Ok(reconstruct_path(&came_from, start, goal));
        }
        // Stale heap entries for already expanded tiles
        if !closed.insert(current.coord) {
            continue;
        }

        let current_g = g_scores.get(&current.coord).copied().unwrap_or(f64::INFINITY);

        for neighbor in grid.neighbors(current.coord, 1) {
            if closed.contains(&neighbor) {
                continue;
            }
            let Some(tile) = grid.get(neighbor) else {
                continue;
            };
            if !passable(tile) {
                continue;
            }

            let tentative_g = current_g + tile.weight();
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(f64::INFINITY);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);
                seq += 1;
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: OrderedFloat(tentative_g + heuristic(neighbor)),
                    seq,
                });
            }
        }
    }

    Err(no_path)
}

/// Reconstruct path from came_from map, dropping `start`
fn reconstruct_path(
    came_from: &AHashMap<MapCoord, MapCoord>,
    start: MapCoord,
    mut current: MapCoord,
) -> Vec<MapCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Calculate path cost (sum of the weights of entered tiles)
pub fn path_cost(grid: &HexGrid, path: &[MapCoord]) -> f64 {
    path.iter()
        .filter_map(|coord| grid.get(*coord))
        .map(Tile::weight)
        .sum()
}

//! Neighbor lookup on the offset grid
//!
//! Offset coordinates make the rectangular neighborhood of a tile a poor
//! match for true hex rings, so lookup is two-staged: a coarse rectangular
//! scan followed by a distance cut derived from the layout geometry.

use std::collections::BTreeMap;

use crate::map::grid::HexGrid;
use crate::map::hex::{HexDirection, MapCoord};

/// 1-ring neighbors of a tile keyed by direction (edge tiles have fewer)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedNeighbors {
    by_direction: BTreeMap<HexDirection, MapCoord>,
}

impl NamedNeighbors {
    pub fn get(&self, direction: HexDirection) -> Option<MapCoord> {
        self.by_direction.get(&direction).copied()
    }

    pub fn len(&self) -> usize {
        self.by_direction.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_direction.is_empty()
    }

    /// Neighbors in clockwise order from North
    pub fn iter(&self) -> impl Iterator<Item = (HexDirection, MapCoord)> + '_ {
        self.by_direction.iter().map(|(d, c)| (*d, *c))
    }
}

impl HexGrid {
    /// Tiles within `radius` hex steps of `center`, excluding `center`
    ///
    /// Out-of-bounds coordinates are silently skipped. Order is the
    /// row-major scan order. The scan window is clipped to the grid, so a
    /// radius larger than the map costs no more than a full-map pass.
    pub fn neighbors(&self, center: MapCoord, radius: u32) -> Vec<MapCoord> {
        let Some(origin) = self.get(center).map(|t| t.pos()) else {
            return Vec::new();
        };
        let r = i64::from(radius);
        let (col, row) = (i64::from(center.col), i64::from(center.row));
        let cols = (col - r).max(0)..=(col + r).min(i64::from(self.width()) - 1);
        let rows = (row - r).max(0)..=(row + r).min(i64::from(self.height()) - 1);
        let cutoff = self.layout().ring_cutoff(radius);

        let mut result = Vec::new();
        for y in rows {
            for x in cols.clone() {
                // Both bounds were clipped to the grid, which fits in i32
                let coord = MapCoord::new(x as i32, y as i32);
                if coord == center {
                    continue;
                }
                let Some(tile) = self.get(coord) else {
                    continue;
                };
                let within = match cutoff {
                    Some(limit) => origin.distance(&tile.pos()) <= limit,
                    // Rings overlap in the plane this far out
                    None => center.hex_distance(&coord) <= radius,
                };
                if within {
                    result.push(coord);
                }
            }
        }
        result
    }

    /// Classify the 1-ring of `center` into the six hex directions
    pub fn named_neighbors(&self, center: MapCoord) -> NamedNeighbors {
        let mut named = NamedNeighbors::default();
        let Some(origin) = self.get(center).map(|t| t.pos()) else {
            return named;
        };
        for coord in self.neighbors(center, 1) {
            let pos = self.layout().to_plane(coord);
            if let Some(direction) = HexDirection::from_delta(pos.x - origin.x, pos.y - origin.y) {
                named.by_direction.insert(direction, coord);
            }
        }
        named
    }

    /// Are two tiles 1-ring neighbors?
    pub fn are_adjacent(&self, a: MapCoord, b: MapCoord) -> bool {
        self.contains(a) && self.contains(b) && a.hex_distance(&b) == 1
    }
}

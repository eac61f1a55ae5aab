//! Hex coordinate system for the world map
//!
//! Tiles are addressed by offset coordinates (column, row) in an "odd-q"
//! layout: flat-top hexes, odd columns pushed down by half a tile. Axial
//! coordinates (q, r) are derived from them for exact hex distance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Offset map coordinate of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct MapCoord {
    pub col: i32,
    pub row: i32,
}

impl MapCoord {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn is_odd_column(&self) -> bool {
        self.col & 1 == 1
    }

    /// Convert to axial coordinates
    pub fn to_axial(&self) -> AxialCoord {
        let q = self.col;
        let r = self.row - (self.col - (self.col & 1)) / 2;
        AxialCoord::new(q, r)
    }

    /// Hex steps between two tiles
    pub fn hex_distance(&self, other: &MapCoord) -> u32 {
        self.to_axial().distance(&other.to_axial())
    }
}

impl fmt::Display for MapCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Axial hex coordinate, used as the exact geometric reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Manhattan distance in hex space
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    pub fn to_offset(&self) -> MapCoord {
        let col = self.q;
        let row = self.r + (self.q - (self.q & 1)) / 2;
        MapCoord::new(col, row)
    }
}

/// Continuous plane position of a tile center (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanePos {
    pub x: f64,
    pub y: f64,
}

impl PlanePos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &PlanePos) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Flat-top hex layout with a given circumradius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    pub size: f64,
}

impl HexLayout {
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    /// Horizontal distance between adjacent columns
    pub fn column_spacing(&self) -> f64 {
        1.5 * self.size
    }

    /// Full tile height; also the vertical distance between rows
    pub fn tile_height(&self) -> f64 {
        3f64.sqrt() * self.size
    }

    /// Plane distance between the centers of two 1-ring neighbors
    ///
    /// All six neighbors sit at the same distance in this layout.
    pub fn step_length(&self) -> f64 {
        self.tile_height()
    }

    /// Map coordinate to plane position
    pub fn to_plane(&self, coord: MapCoord) -> PlanePos {
        let x = coord.col as f64 * self.column_spacing();
        let mut y = coord.row as f64 * self.tile_height();
        if coord.is_odd_column() {
            y += self.tile_height() / 2.0;
        }
        PlanePos::new(x, y)
    }

    /// Euclidean cut-off separating ring `radius` from ring `radius + 1`
    ///
    /// The plane distance of axial offset (q, r) is
    /// `step_length * sqrt(q² + qr + r²)`. On ring k that norm ranges from
    /// `min_ring_norm(k)` up to `k²`. A threshold exists only while the
    /// outermost tile of ring `radius` is closer than the innermost tile of
    /// ring `radius + 1`; returns `None` otherwise, including when the norms
    /// do not fit in a `u64`.
    pub fn ring_cutoff(&self, radius: u32) -> Option<f64> {
        if radius == 0 {
            return Some(self.step_length() / 2.0);
        }
        let k = radius as u64;
        let outer = k.checked_mul(k)?;
        let inner_next = min_ring_norm(k + 1)?;
        if inner_next <= outer {
            return None;
        }
        let mid = ((outer as f64).sqrt() + (inner_next as f64).sqrt()) / 2.0;
        Some(mid * self.step_length())
    }
}

/// Smallest `q² + qr + r²` over the hexes exactly `k` steps away
fn min_ring_norm(k: u64) -> Option<u64> {
    let triple = k.checked_mul(k)?.checked_mul(3)?;
    if k % 2 == 0 {
        Some(triple / 4)
    } else {
        Some(triple.checked_add(1)? / 4)
    }
}

/// The six neighbor directions of a flat-top hex
///
/// North and South are the two straight (same column) neighbors, the other
/// four sit in the adjacent columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl HexDirection {
    /// Classify a plane-position delta from a tile to one of its neighbors
    ///
    /// Returns `None` for a zero delta or a purely horizontal one, which
    /// cannot occur between 1-ring neighbors in this layout.
    pub fn from_delta(dx: f64, dy: f64) -> Option<Self> {
        if dx > 0.0 && dy < 0.0 {
            Some(HexDirection::NorthEast)
        } else if dx > 0.0 && dy > 0.0 {
            Some(HexDirection::SouthEast)
        } else if dx < 0.0 && dy < 0.0 {
            Some(HexDirection::NorthWest)
        } else if dx < 0.0 && dy > 0.0 {
            Some(HexDirection::SouthWest)
        } else if dy < 0.0 {
            Some(HexDirection::North)
        } else if dy > 0.0 {
            Some(HexDirection::South)
        } else {
            None
        }
    }

    /// Get opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            HexDirection::North => HexDirection::South,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::SouthEast => HexDirection::NorthWest,
            HexDirection::South => HexDirection::North,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::NorthWest => HexDirection::SouthEast,
        }
    }

    /// All directions, clockwise from North
    pub fn all() -> [HexDirection; 6] {
        [
            HexDirection::North,
            HexDirection::NorthEast,
            HexDirection::SouthEast,
            HexDirection::South,
            HexDirection::SouthWest,
            HexDirection::NorthWest,
        ]
    }
}

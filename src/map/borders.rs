//! Territory and selection borders
//!
//! A bordered region is either a selection highlight or a faction's claimed
//! territory. Only the outline of the region is drawn: an edge is skipped
//! when the neighbor across it continues the same region.

use serde::{Deserialize, Serialize};

use crate::core::types::{Color, FactionId};
use crate::map::grid::HexGrid;
use crate::map::hex::{HexDirection, MapCoord};
use crate::map::tile::Tile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    pub color: Color,
    /// Edges that get a line, clockwise from North
    pub edges: Vec<HexDirection>,
}

/// Does `neighbor` continue the region `tile` belongs to?
fn continues_region(tile: &Tile, neighbor: Option<&Tile>) -> bool {
    let Some(neighbor) = neighbor else {
        return false;
    };
    match (&tile.selection, &neighbor.selection) {
        (Some(a), Some(b)) => return a.color == b.color,
        (_, Some(_)) => return false,
        _ => {}
    }
    match (tile.owner(), neighbor.owner()) {
        (Some(a), Some(b)) => a.faction == b.faction,
        _ => false,
    }
}

/// Border to draw around `coord`, if any
///
/// Selected tiles are outlined in the selection color. Claimed tiles are
/// outlined in their faction's color when they belong to the observer or
/// their settlement has been discovered.
pub fn tile_border<F>(grid: &HexGrid, coord: MapCoord, observer: FactionId, faction_color: F) -> Option<Border>
where
    F: Fn(FactionId) -> Option<Color>,
{
    let tile = grid.get(coord)?;
    let color = match (&tile.selection, tile.owner()) {
        (Some(selection), _) => selection.color.clone(),
        (None, Some(claim)) if claim.faction == observer || tile.show_static_feature() => {
            faction_color(claim.faction)?
        }
        _ => return None,
    };

    let named = grid.named_neighbors(coord);
    let edges = HexDirection::all()
        .into_iter()
        .filter(|dir| {
            let neighbor = named.get(*dir).and_then(|c| grid.get(c));
            !continues_region(tile, neighbor)
        })
        .collect();

    Some(Border { color, edges })
}

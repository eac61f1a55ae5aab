//! Fog of war from the point of view of the privileged observer
//!
//! Each tile keeps a live `currently_visible` flag and a sticky `ever_seen`
//! flag. Only the observer faction's units and claims ever reveal tiles.

use serde::{Deserialize, Serialize};

use crate::map::grid::HexGrid;
use crate::map::hex::MapCoord;
use crate::map::tile::Tile;

/// What the renderer may draw for a tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileAppearance {
    /// Terrain color, `None` means draw unexplored (black)
    pub terrain_color: Option<String>,
    /// Image key of the modifier overlay to draw
    pub modifier_image: Option<String>,
    pub draw_settlement: bool,
    pub draw_occupant: bool,
}

/// Fog-of-war render policy for one tile
pub fn appearance(tile: &Tile) -> TileAppearance {
    let seen = tile.ever_seen();
    TileAppearance {
        terrain_color: seen.then(|| tile.color().to_string()),
        modifier_image: tile
            .modifier()
            .filter(|_| seen && tile.display_modifier)
            .map(|m| m.image.clone()),
        draw_settlement: tile.settlement().is_some() && tile.show_static_feature(),
        draw_occupant: tile.occupant().is_some() && tile.is_currently_visible(),
    }
}

impl HexGrid {
    /// Set sight on a tile and every tile within the sight radius
    pub fn set_visibility(&mut self, center: MapCoord, visible: bool) {
        if !self.set_tile_visibility(center, visible) {
            return;
        }
        for coord in self.neighbors(center, self.sight_radius()) {
            self.set_tile_visibility(coord, visible);
        }
    }

    /// Set sight on one tile only; returns false if it is out of bounds
    pub fn set_tile_visibility(&mut self, coord: MapCoord, visible: bool) -> bool {
        match self.get_mut(coord) {
            Some(tile) => {
                tile.set_in_sight(visible);
                true
            }
            None => false,
        }
    }

    /// Drop live sight everywhere, keeping what has been explored
    pub fn clear_current_visibility(&mut self) {
        for tile in self.tiles_mut() {
            tile.set_in_sight(false);
        }
    }

    /// Number of tiles the observer has ever seen
    pub fn explored_count(&self) -> usize {
        self.tiles().filter(|t| t.ever_seen()).count()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::config::GameConfig;
    use crate::core::types::{EntityId, FactionId};
    use crate::data::StaticData;
    use crate::map::terrain::TileType;
    use crate::map::tile::Claim;

    fn grid(width: u32, height: u32) -> HexGrid {
        let config = GameConfig::default().with_size(width, height);
        HexGrid::new(&config, Arc::new(StaticData::builtin().unwrap()), TileType::Land).unwrap()
    }

    #[test]
    fn test_reveal_cascades_to_sight_radius() {
        let mut g = grid(15, 15);
        let c = MapCoord::new(7, 7);
        g.set_visibility(c, true);

        assert!(g.tile(c).unwrap().is_currently_visible());
        for n in g.neighbors(c, 3) {
            assert!(g.tile(n).unwrap().is_currently_visible());
        }
        // Ring 4 stays dark
        assert!(!g.tile(MapCoord::new(7, 11)).unwrap().ever_seen());
        assert_eq!(g.explored_count(), 37);
    }

    #[test]
    fn test_hide_keeps_explored() {
        let mut g = grid(10, 10);
        let c = MapCoord::new(4, 4);
        g.set_visibility(c, true);
        g.set_visibility(c, false);
        let tile = g.tile(c).unwrap();
        assert!(!tile.is_currently_visible());
        assert!(tile.ever_seen());
    }

    #[test]
    fn test_single_tile_hide_leaves_neighbors() {
        let mut g = grid(10, 10);
        let c = MapCoord::new(4, 4);
        g.set_visibility(c, true);
        g.set_tile_visibility(c, false);
        assert!(!g.tile(c).unwrap().is_currently_visible());
        assert!(g.tile(MapCoord::new(4, 5)).unwrap().is_currently_visible());
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut g = grid(3, 3);
        g.set_visibility(MapCoord::new(8, 8), true);
        assert_eq!(g.explored_count(), 0);
    }

    #[test]
    fn test_appearance_fog_policy() {
        let mut g = grid(10, 10);
        let c = MapCoord::new(4, 4);
        g.set_modifier(c, Some("forest")).unwrap();
        g.place_settlement(c, EntityId(3)).unwrap();
        g.claim_tile(
            c,
            Claim {
                settlement: EntityId(3),
                faction: FactionId(1),
            },
            false,
        )
        .unwrap();
        g.occupy_tile(c, EntityId(4), false).unwrap();

        let hidden = appearance(g.tile(c).unwrap());
        assert_eq!(hidden.terrain_color, None);
        assert_eq!(hidden.modifier_image, None);
        assert!(!hidden.draw_settlement);
        assert!(!hidden.draw_occupant);

        g.set_visibility(c, true);
        let seen = appearance(g.tile(c).unwrap());
        assert!(seen.terrain_color.is_some());
        assert_eq!(seen.modifier_image.as_deref(), Some("forest"));
        assert!(seen.draw_settlement);
        assert!(seen.draw_occupant);

        g.set_visibility(c, false);
        let remembered = appearance(g.tile(c).unwrap());
        assert!(remembered.terrain_color.is_some());
        assert!(remembered.draw_settlement);
        assert!(!remembered.draw_occupant);
    }

    #[test]
    fn test_modifier_hidden_when_display_disabled() {
        let mut g = grid(5, 5);
        let c = MapCoord::new(2, 2);
        g.set_modifier(c, Some("hills")).unwrap();
        g.tile_mut(c).unwrap().display_modifier = false;
        g.set_visibility(c, true);
        assert_eq!(appearance(g.tile(c).unwrap()).modifier_image, None);
    }
}

//! A single cell of the world map

use serde::{Deserialize, Serialize};

use crate::core::error::{CoreError, Result};
use crate::core::types::{Color, EntityId, FactionId};
use crate::data::StaticData;
use crate::map::hex::{MapCoord, PlanePos};
use crate::map::terrain::{Modifier, TerrainData, TileType};

/// Territory claim of a settlement on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub settlement: EntityId,
    pub faction: FactionId,
}

/// Selection highlight placed by a selected entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub color: Color,
    pub entity: Option<EntityId>,
}

/// Persisted form of a tile
///
/// Plane position and adjacency are derived and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedTile {
    #[serde(rename = "type")]
    pub tile_type: TileType,
    pub map_pos: MapCoord,
    pub display_modifier: bool,
    pub modifier: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Tile {
    coord: MapCoord,
    pos: PlanePos,
    tile_type: TileType,
    terrain: TerrainData,
    modifier: Option<Modifier>,
    pub display_modifier: bool,
    occupant: Option<EntityId>,
    owner: Option<Claim>,
    settlement: Option<EntityId>,
    currently_visible: bool,
    ever_seen: bool,
    show_static_feature: bool,
    pub selection: Option<Selection>,
}

impl Tile {
    pub fn new(coord: MapCoord, pos: PlanePos, tile_type: TileType, data: &StaticData) -> Result<Self> {
        Ok(Self {
            coord,
            pos,
            tile_type,
            terrain: data.terrain(tile_type)?.clone(),
            modifier: None,
            display_modifier: true,
            occupant: None,
            owner: None,
            settlement: None,
            currently_visible: false,
            ever_seen: false,
            show_static_feature: false,
            selection: None,
        })
    }

    pub fn coord(&self) -> MapCoord {
        self.coord
    }

    pub fn pos(&self) -> PlanePos {
        self.pos
    }

    pub fn tile_type(&self) -> TileType {
        self.tile_type
    }

    /// Change terrain, re-resolving its data
    pub fn set_type(&mut self, tile_type: TileType, data: &StaticData) -> Result<()> {
        self.terrain = data.terrain(tile_type)?.clone();
        self.tile_type = tile_type;
        Ok(())
    }

    /// Cost of entering this tile
    pub fn weight(&self) -> f64 {
        self.terrain.weight + self.modifier.as_ref().map_or(0.0, |m| m.weight)
    }

    pub fn color(&self) -> &str {
        &self.terrain.color
    }

    pub fn modifier(&self) -> Option<&Modifier> {
        self.modifier.as_ref()
    }

    /// Set or clear the modifier by table name
    pub fn set_modifier(&mut self, name: Option<&str>, data: &StaticData) -> Result<()> {
        self.modifier = name.map(|n| data.modifier(n)).transpose()?;
        Ok(())
    }

    pub fn occupant(&self) -> Option<EntityId> {
        self.occupant
    }

    pub fn owner(&self) -> Option<Claim> {
        self.owner
    }

    pub fn settlement(&self) -> Option<EntityId> {
        self.settlement
    }

    pub fn is_currently_visible(&self) -> bool {
        self.currently_visible
    }

    pub fn ever_seen(&self) -> bool {
        self.ever_seen
    }

    pub fn show_static_feature(&self) -> bool {
        self.show_static_feature
    }

    /// Carries something that stays drawn once discovered
    pub fn has_static_feature(&self) -> bool {
        self.owner.is_some() || self.settlement.is_some()
    }

    /// Update the live sight flag of this tile alone
    ///
    /// `ever_seen` only ever goes from false to true.
    pub fn set_in_sight(&mut self, visible: bool) {
        self.currently_visible = visible;
        if visible {
            self.ever_seen = true;
            if self.has_static_feature() {
                self.show_static_feature = true;
            }
        }
    }

    pub(crate) fn set_occupant(&mut self, entity: EntityId) -> Result<()> {
        match self.occupant {
            Some(current) if current != entity => Err(CoreError::TileOccupied {
                coord: self.coord,
                occupant: current,
            }),
            _ => {
                self.occupant = Some(entity);
                Ok(())
            }
        }
    }

    /// Returns true if `entity` was the occupant
    pub(crate) fn clear_occupant(&mut self, entity: EntityId) -> bool {
        if self.occupant == Some(entity) {
            self.occupant = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_owner(&mut self, claim: Claim) -> Result<()> {
        match self.owner {
            Some(current) if current.settlement != claim.settlement => Err(CoreError::TileClaimed {
                coord: self.coord,
                owner: current.settlement,
            }),
            _ => {
                self.owner = Some(claim);
                Ok(())
            }
        }
    }

    pub(crate) fn clear_owner(&mut self, settlement: EntityId) -> bool {
        if self.owner.map(|c| c.settlement) == Some(settlement) {
            self.owner = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_settlement(&mut self, settlement: EntityId) -> Result<()> {
        if let Some(current) = self.settlement {
            if current != settlement {
                return Err(CoreError::InvalidAction(format!(
                    "tile {} already holds settlement {}",
                    self.coord, current
                )));
            }
        }
        self.settlement = Some(settlement);
        Ok(())
    }

    pub(crate) fn clear_settlement(&mut self, settlement: EntityId) -> bool {
        if self.settlement == Some(settlement) {
            self.settlement = None;
            true
        } else {
            false
        }
    }

    pub fn serialize(&self) -> SerializedTile {
        SerializedTile {
            tile_type: self.tile_type,
            map_pos: self.coord,
            display_modifier: self.display_modifier,
            modifier: self.modifier.as_ref().map(|m| m.name.clone()),
        }
    }

    /// Apply persisted data onto this tile (its coordinate is kept)
    pub fn load_data(&mut self, saved: &SerializedTile, data: &StaticData) -> Result<()> {
        // Resolve everything first so a bad key leaves the tile untouched
        let terrain = data.terrain(saved.tile_type)?.clone();
        let modifier = saved
            .modifier
            .as_deref()
            .map(|name| data.modifier(name))
            .transpose()?;
        self.tile_type = saved.tile_type;
        self.terrain = terrain;
        self.modifier = modifier;
        self.display_modifier = saved.display_modifier;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> StaticData {
        StaticData::builtin().unwrap()
    }

    fn tile(tile_type: TileType) -> Tile {
        Tile::new(MapCoord::new(2, 3), PlanePos::new(10.0, 20.0), tile_type, &data()).unwrap()
    }

    #[test]
    fn test_weight_includes_modifier() {
        let data = data();
        let mut t = tile(TileType::Land);
        assert_eq!(t.weight(), 1.0);
        t.set_modifier(Some("forest"), &data).unwrap();
        assert_eq!(t.weight(), 3.0);
        t.set_modifier(None, &data).unwrap();
        assert_eq!(t.weight(), 1.0);
    }

    #[test]
    fn test_unknown_modifier_leaves_tile_unchanged() {
        let data = data();
        let mut t = tile(TileType::Land);
        t.set_modifier(Some("hills"), &data).unwrap();
        assert!(t.set_modifier(Some("lava"), &data).is_err());
        assert_eq!(t.modifier().map(|m| m.name.as_str()), Some("hills"));
    }

    #[test]
    fn test_ever_seen_is_sticky() {
        let mut t = tile(TileType::Land);
        assert!(!t.ever_seen());
        t.set_in_sight(true);
        t.set_in_sight(false);
        assert!(!t.is_currently_visible());
        assert!(t.ever_seen());
    }

    #[test]
    fn test_static_feature_revealed_only_when_claimed() {
        let mut t = tile(TileType::Land);
        t.set_in_sight(true);
        assert!(!t.show_static_feature());

        t.set_owner(Claim {
            settlement: EntityId(1),
            faction: FactionId(0),
        })
        .unwrap();
        t.set_in_sight(true);
        t.set_in_sight(false);
        assert!(t.show_static_feature());
    }

    #[test]
    fn test_single_occupant() {
        let mut t = tile(TileType::Land);
        t.set_occupant(EntityId(1)).unwrap();
        // Re-assigning the same occupant is fine
        t.set_occupant(EntityId(1)).unwrap();
        let err = t.set_occupant(EntityId(2)).unwrap_err();
        assert!(matches!(err, CoreError::TileOccupied { occupant, .. } if occupant == EntityId(1)));
        assert!(!t.clear_occupant(EntityId(2)));
        assert!(t.clear_occupant(EntityId(1)));
        assert_eq!(t.occupant(), None);
    }

    #[test]
    fn test_single_owner() {
        let mut t = tile(TileType::Land);
        let a = Claim {
            settlement: EntityId(1),
            faction: FactionId(0),
        };
        let b = Claim {
            settlement: EntityId(2),
            faction: FactionId(1),
        };
        t.set_owner(a).unwrap();
        assert!(t.set_owner(b).is_err());
        assert_eq!(t.owner(), Some(a));
    }

    #[test]
    fn test_serialize_round_trip() {
        let data = data();
        let mut t = tile(TileType::Sand);
        t.set_modifier(Some("hills"), &data).unwrap();
        t.display_modifier = false;

        let json = serde_json::to_string(&t.serialize()).unwrap();
        assert!(json.contains("\"type\":\"sand\""));
        assert!(json.contains("\"mapPos\""));
        assert!(!json.contains("\"x\""));

        let saved: SerializedTile = serde_json::from_str(&json).unwrap();
        let mut restored = tile(TileType::Water);
        restored.load_data(&saved, &data).unwrap();
        assert_eq!(restored.tile_type(), TileType::Sand);
        assert!(!restored.display_modifier);
        assert_eq!(restored.modifier(), t.modifier());
        assert_eq!(restored.weight(), t.weight());
    }
}

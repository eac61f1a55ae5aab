//! The world map: a dense grid of tiles in offset coordinates
//!
//! The grid owns every tile. Entities refer to tiles by `MapCoord` and tiles
//! refer back to entities by `EntityId`; both links are maintained only by
//! the named operations below.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use crate::core::config::GameConfig;
use crate::core::error::{CoreError, Result};
use crate::core::types::EntityId;
use crate::data::StaticData;
use crate::map::hex::{HexLayout, MapCoord};
use crate::map::terrain::TileType;
use crate::map::tile::{Claim, Tile};

#[derive(Debug, Clone)]
pub struct HexGrid {
    width: u32,
    height: u32,
    layout: HexLayout,
    sight_radius: u32,
    tiles: Vec<Tile>,
    data: Arc<StaticData>,
}

impl HexGrid {
    /// Create a grid filled with one terrain type
    pub fn new(config: &GameConfig, data: Arc<StaticData>, fill: TileType) -> Result<Self> {
        config.validate()?;
        let layout = HexLayout::new(config.tile_size);
        let mut tiles = Vec::with_capacity((config.width * config.height) as usize);
        for row in 0..config.height as i32 {
            for col in 0..config.width as i32 {
                let coord = MapCoord::new(col, row);
                tiles.push(Tile::new(coord, layout.to_plane(coord), fill, &data)?);
            }
        }

        Ok(Self {
            width: config.width,
            height: config.height,
            layout,
            sight_radius: config.sight_radius,
            tiles,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> HexLayout {
        self.layout
    }

    pub fn sight_radius(&self) -> u32 {
        self.sight_radius
    }

    pub fn data(&self) -> &StaticData {
        &self.data
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Check if coordinate is within map bounds
    pub fn contains(&self, coord: MapCoord) -> bool {
        coord.col >= 0
            && coord.row >= 0
            && coord.col < self.width as i32
            && coord.row < self.height as i32
    }

    fn index(&self, coord: MapCoord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.row as usize * self.width as usize + coord.col as usize)
        } else {
            None
        }
    }

    pub fn get(&self, coord: MapCoord) -> Option<&Tile> {
        self.index(coord).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, coord: MapCoord) -> Option<&mut Tile> {
        match self.index(coord) {
            Some(i) => Some(&mut self.tiles[i]),
            None => None,
        }
    }

    /// Like `get`, but out-of-bounds is an error
    pub fn tile(&self, coord: MapCoord) -> Result<&Tile> {
        self.get(coord).ok_or(CoreError::OutOfBounds(coord))
    }

    pub fn tile_mut(&mut self, coord: MapCoord) -> Result<&mut Tile> {
        self.get_mut(coord).ok_or(CoreError::OutOfBounds(coord))
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    pub fn coords(&self) -> impl Iterator<Item = MapCoord> + '_ {
        self.tiles.iter().map(Tile::coord)
    }

    /// Euclidean distance between tile centers in plane units
    pub fn dist(&self, a: MapCoord, b: MapCoord) -> f64 {
        self.layout.to_plane(a).distance(&self.layout.to_plane(b))
    }

    pub fn set_terrain(&mut self, coord: MapCoord, tile_type: TileType) -> Result<()> {
        let data = Arc::clone(&self.data);
        self.tile_mut(coord)?.set_type(tile_type, &data)
    }

    pub fn set_modifier(&mut self, coord: MapCoord, modifier: Option<&str>) -> Result<()> {
        let data = Arc::clone(&self.data);
        self.tile_mut(coord)?.set_modifier(modifier, &data)
    }

    /// Smallest entry cost of any tile
    pub fn min_weight(&self) -> f64 {
        self.tiles
            .iter()
            .map(Tile::weight)
            .fold(f64::INFINITY, f64::min)
    }

    /// Uniformly pick a tile satisfying `pred`
    pub fn random_tile_where<R, F>(&self, rng: &mut R, pred: F) -> Option<MapCoord>
    where
        R: Rng + ?Sized,
        F: Fn(&Tile) -> bool,
    {
        let candidates: Vec<MapCoord> = self
            .tiles
            .iter()
            .filter(|t| pred(t))
            .map(Tile::coord)
            .collect();
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.gen_range(0..candidates.len())])
        }
    }

    /// Place `entity` on a tile, revealing the surroundings if `reveal`
    pub fn occupy_tile(&mut self, coord: MapCoord, entity: EntityId, reveal: bool) -> Result<()> {
        self.tile_mut(coord)?.set_occupant(entity)?;
        debug!(%entity, %coord, reveal, "tile occupied");
        if reveal {
            self.set_visibility(coord, true);
        }
        Ok(())
    }

    /// Remove `entity` from a tile; visibility is left as it is
    pub fn vacate_tile(&mut self, coord: MapCoord, entity: EntityId) -> bool {
        self.get_mut(coord)
            .map_or(false, |tile| tile.clear_occupant(entity))
    }

    /// Move an occupant between tiles, keeping the 0..1 cardinality
    pub fn move_occupant(
        &mut self,
        entity: EntityId,
        from: MapCoord,
        to: MapCoord,
        reveal: bool,
    ) -> Result<()> {
        // Check the destination first so a failed move leaves `from` intact
        if let Some(current) = self.tile(to)?.occupant() {
            if current != entity {
                return Err(CoreError::TileOccupied {
                    coord: to,
                    occupant: current,
                });
            }
        }
        self.vacate_tile(from, entity);
        self.occupy_tile(to, entity, reveal)
    }

    /// Put a settlement claim on a tile, revealing if `reveal`
    pub fn claim_tile(&mut self, coord: MapCoord, claim: Claim, reveal: bool) -> Result<()> {
        self.tile_mut(coord)?.set_owner(claim)?;
        debug!(settlement = %claim.settlement, %coord, reveal, "tile claimed");
        if reveal {
            self.set_visibility(coord, true);
        }
        Ok(())
    }

    pub fn release_claim(&mut self, coord: MapCoord, settlement: EntityId) -> bool {
        self.get_mut(coord)
            .map_or(false, |tile| tile.clear_owner(settlement))
    }

    /// Put a settlement structure on a tile
    pub fn place_settlement(&mut self, coord: MapCoord, settlement: EntityId) -> Result<()> {
        self.tile_mut(coord)?.set_settlement(settlement)
    }

    pub fn remove_settlement(&mut self, coord: MapCoord, settlement: EntityId) -> bool {
        self.get_mut(coord)
            .map_or(false, |tile| tile.clear_settlement(settlement))
    }
}

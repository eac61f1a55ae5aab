//! Entities that act on the map: mobile units and settlements
//!
//! Both variants share one capability set (the `Entity` trait) and are
//! stored by their faction as `Actor`s. An entity refers to its tile by
//! coordinate; the tile refers back by id. Neither owns the other.

pub mod settlement;
pub mod unit;

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, FactionId};
use crate::map::grid::HexGrid;
use crate::map::hex::{HexLayout, MapCoord};
use crate::map::tile::Selection;

pub use settlement::{ProductionOrder, Settlement};
pub use unit::MobileUnit;

/// Screen anchor of an entity sprite, always derived from its tile
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Anchor {
    pub fn for_tile(layout: &HexLayout, coord: MapCoord) -> Self {
        let center = layout.to_plane(coord);
        Self {
            x: center.x - layout.size,
            y: center.y - layout.size * 2.0,
            size: layout.size * 2.0,
        }
    }
}

/// State every entity carries regardless of variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCore {
    id: EntityId,
    faction: FactionId,
    tile: MapCoord,
    anchor: Anchor,
    pub selected: bool,
}

impl EntityCore {
    pub fn new(id: EntityId, faction: FactionId, tile: MapCoord, layout: &HexLayout) -> Self {
        Self {
            id,
            faction,
            tile,
            anchor: Anchor::for_tile(layout, tile),
            selected: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn faction(&self) -> FactionId {
        self.faction
    }

    pub fn tile(&self) -> MapCoord {
        self.tile
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Reassign the tile; the anchor follows
    pub fn set_tile(&mut self, tile: MapCoord, layout: &HexLayout) {
        self.tile = tile;
        self.anchor = Anchor::for_tile(layout, tile);
    }
}

/// Something a turn hook produced that the world handles after the sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// A settlement finished producing a unit
    UnitCompleted {
        settlement: EntityId,
        template: String,
        at: MapCoord,
    },
    /// A unit could not continue along its orders
    OrdersBlocked { entity: EntityId, at: MapCoord },
}

/// Outcome of taking damage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    Survived { remaining: f64 },
    Destroyed,
}

/// World access handed to entity capabilities
pub struct EntityContext<'a> {
    pub grid: &'a mut HexGrid,
    /// The acting faction is the privileged observer
    pub reveals: bool,
    /// Faction color, used for selection highlights
    pub color: &'a str,
    pub events: Vec<TurnEvent>,
}

impl<'a> EntityContext<'a> {
    pub fn new(grid: &'a mut HexGrid, reveals: bool, color: &'a str) -> Self {
        Self {
            grid,
            reveals,
            color,
            events: Vec::new(),
        }
    }

    /// Highlight tiles on behalf of `entity`
    pub fn highlight(&mut self, entity: EntityId, coords: &[MapCoord]) {
        for &coord in coords {
            if let Some(tile) = self.grid.get_mut(coord) {
                tile.selection = Some(Selection {
                    color: self.color.to_string(),
                    entity: Some(entity),
                });
            }
        }
    }

    /// Remove highlights placed by `entity`
    pub fn clear_highlight(&mut self, entity: EntityId, coords: &[MapCoord]) {
        for &coord in coords {
            if let Some(tile) = self.grid.get_mut(coord) {
                if tile.selection.as_ref().and_then(|s| s.entity) == Some(entity) {
                    tile.selection = None;
                }
            }
        }
    }
}

/// Capabilities every entity variant must provide
pub trait Entity {
    fn core(&self) -> &EntityCore;
    fn core_mut(&mut self) -> &mut EntityCore;

    fn select(&mut self, ctx: &mut EntityContext<'_>);
    fn deselect(&mut self, ctx: &mut EntityContext<'_>);

    /// Still has action capacity this round
    fn is_free(&self) -> bool;

    fn receive_damage(&mut self, amount: f64) -> DamageOutcome;

    /// Per-turn hook (regenerate, continue orders, produce)
    fn on_turn(&mut self, ctx: &mut EntityContext<'_>);

    fn id(&self) -> EntityId {
        self.core().id()
    }

    fn faction(&self) -> FactionId {
        self.core().faction()
    }

    fn tile(&self) -> MapCoord {
        self.core().tile()
    }

    fn is_selected(&self) -> bool {
        self.core().selected
    }
}

/// An entity of either variant, as stored in a faction roster
#[derive(Debug, Clone)]
pub enum Actor {
    Unit(MobileUnit),
    Settlement(Settlement),
}

impl Actor {
    pub fn as_unit(&self) -> Option<&MobileUnit> {
        match self {
            Actor::Unit(unit) => Some(unit),
            Actor::Settlement(_) => None,
        }
    }

    pub fn as_unit_mut(&mut self) -> Option<&mut MobileUnit> {
        match self {
            Actor::Unit(unit) => Some(unit),
            Actor::Settlement(_) => None,
        }
    }

    pub fn as_settlement(&self) -> Option<&Settlement> {
        match self {
            Actor::Settlement(settlement) => Some(settlement),
            Actor::Unit(_) => None,
        }
    }

    pub fn as_settlement_mut(&mut self) -> Option<&mut Settlement> {
        match self {
            Actor::Settlement(settlement) => Some(settlement),
            Actor::Unit(_) => None,
        }
    }

    fn inner(&self) -> &dyn Entity {
        match self {
            Actor::Unit(unit) => unit,
            Actor::Settlement(settlement) => settlement,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Entity {
        match self {
            Actor::Unit(unit) => unit,
            Actor::Settlement(settlement) => settlement,
        }
    }
}

impl Entity for Actor {
    fn core(&self) -> &EntityCore {
        self.inner().core()
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        self.inner_mut().core_mut()
    }

    fn select(&mut self, ctx: &mut EntityContext<'_>) {
        self.inner_mut().select(ctx)
    }

    fn deselect(&mut self, ctx: &mut EntityContext<'_>) {
        self.inner_mut().deselect(ctx)
    }

    fn is_free(&self) -> bool {
        self.inner().is_free()
    }

    fn receive_damage(&mut self, amount: f64) -> DamageOutcome {
        self.inner_mut().receive_damage(amount)
    }

    fn on_turn(&mut self, ctx: &mut EntityContext<'_>) {
        self.inner_mut().on_turn(ctx)
    }
}

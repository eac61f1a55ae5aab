//! The game world: map, factions and round advancement
//!
//! The world owns the grid and every faction; factions own their entities.
//! All cross-cutting side effects (occupying, claiming, removal) go through
//! the world so tile back-references and rosters stay consistent.

pub mod actions;

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::error::{CoreError, Result};
use crate::core::types::{EntityId, FactionId, IdAllocator, Round};
use crate::entity::{Actor, Entity, EntityContext, TurnEvent};
use crate::map::borders::{tile_border, Border};
use crate::map::grid::HexGrid;
use crate::map::hex::MapCoord;
use crate::map::visibility::{appearance, TileAppearance};
use crate::turn::faction::Faction;
use crate::turn::scheduler::sweep_faction;

/// What happened during one round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: Round,
    /// Hooks run across all factions
    pub acted: usize,
    pub spawned: Vec<EntityId>,
    pub events: Vec<TurnEvent>,
}

#[derive(Debug)]
pub struct World {
    grid: HexGrid,
    factions: BTreeMap<FactionId, Faction>,
    /// The faction whose sight is tracked
    observer: FactionId,
    ids: IdAllocator,
    round: Round,
    owners: AHashMap<EntityId, FactionId>,
}

impl World {
    pub fn new(grid: HexGrid) -> Self {
        Self {
            grid,
            factions: BTreeMap::new(),
            observer: FactionId(0),
            ids: IdAllocator::new(),
            round: 0,
            owners: AHashMap::new(),
        }
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut HexGrid {
        &mut self.grid
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn observer(&self) -> FactionId {
        self.observer
    }

    pub fn set_observer(&mut self, faction: FactionId) -> Result<()> {
        self.faction(faction)?;
        self.observer = faction;
        self.refresh_visibility();
        Ok(())
    }

    pub fn is_observer(&self, faction: FactionId) -> bool {
        faction == self.observer
    }

    /// Add a faction; ids are handed out in creation order
    pub fn add_faction(&mut self, name: &str, color: &str) -> FactionId {
        let id = FactionId(self.factions.keys().next_back().map_or(0, |f| f.0 + 1));
        self.factions.insert(id, Faction::new(id, name, color));
        info!(faction = %id, name, "faction added");
        id
    }

    pub fn faction(&self, id: FactionId) -> Result<&Faction> {
        self.factions.get(&id).ok_or(CoreError::FactionNotFound(id))
    }

    pub fn faction_mut(&mut self, id: FactionId) -> Result<&mut Faction> {
        self.factions.get_mut(&id).ok_or(CoreError::FactionNotFound(id))
    }

    pub fn factions(&self) -> impl Iterator<Item = &Faction> {
        self.factions.values()
    }

    /// Faction an entity belongs to
    pub fn owner_of(&self, entity: EntityId) -> Result<FactionId> {
        self.owners
            .get(&entity)
            .copied()
            .ok_or(CoreError::EntityNotFound(entity))
    }

    pub fn entity(&self, id: EntityId) -> Result<&Actor> {
        let faction = self.owner_of(id)?;
        self.faction(faction)?.entity(id)
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.owners.contains_key(&id)
    }

    /// Next entity of `faction` that still wants orders
    pub fn next_action(&mut self, faction: FactionId) -> Result<Option<EntityId>> {
        Ok(self.faction_mut(faction)?.next_action())
    }

    /// Factions that still have entities
    pub fn surviving_factions(&self) -> Vec<FactionId> {
        self.factions
            .values()
            .filter(|f| !f.is_eliminated())
            .map(Faction::id)
            .collect()
    }

    /// The only faction left standing, if any
    pub fn winner(&self) -> Option<FactionId> {
        match self.surviving_factions().as_slice() {
            [only] if self.factions.len() > 1 => Some(*only),
            _ => None,
        }
    }

    /// Border outline for a tile, colored by selection or owning faction
    pub fn border(&self, coord: MapCoord) -> Option<Border> {
        tile_border(&self.grid, coord, self.observer, |faction| {
            self.factions.get(&faction).map(|f| f.color().to_string())
        })
    }

    pub fn appearance(&self, coord: MapCoord) -> Option<TileAppearance> {
        self.grid.get(coord).map(appearance)
    }

    /// Run a closure against an entity with world access
    fn act<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut Actor, &mut EntityContext<'_>) -> R,
    ) -> Result<(R, Vec<TurnEvent>)> {
        let faction_id = self.owner_of(id)?;
        let reveals = faction_id == self.observer;
        let faction = self
            .factions
            .get_mut(&faction_id)
            .ok_or(CoreError::FactionNotFound(faction_id))?;
        let color = faction.color().to_string();
        let actor = faction.entity_mut(id)?;
        let mut ctx = EntityContext::new(&mut self.grid, reveals, &color);
        let result = f(actor, &mut ctx);
        Ok((result, ctx.events))
    }

    /// Rebuild live sight from the observer's units and territory
    ///
    /// Explored tiles stay explored.
    pub fn refresh_visibility(&mut self) {
        self.grid.clear_current_visibility();
        let Some(observer) = self.factions.get(&self.observer) else {
            return;
        };
        let mut sources: Vec<MapCoord> = observer.units().map(|u| u.tile()).collect();
        for settlement in observer.settlements() {
            sources.extend_from_slice(settlement.territory());
        }
        for coord in sources {
            self.grid.set_visibility(coord, true);
        }
    }

    /// Sweep every faction once, then handle what the hooks produced
    pub fn advance_round(&mut self) -> Result<RoundSummary> {
        self.round += 1;
        let mut summary = RoundSummary {
            round: self.round,
            ..RoundSummary::default()
        };

        let observer = self.observer;
        for (id, faction) in self.factions.iter_mut() {
            let report = sweep_faction(faction, &mut self.grid, *id == observer)?;
            summary.acted += report.acted.len();
            summary.events.extend(report.events);
        }

        for event in &summary.events {
            match event {
                TurnEvent::UnitCompleted {
                    settlement,
                    template,
                    at,
                } => match self.spawn_completed(*settlement, template, *at)? {
                    Some(id) => summary.spawned.push(id),
                    None => warn!(%settlement, %template, "no room to place completed unit"),
                },
                TurnEvent::OrdersBlocked { entity, at } => {
                    debug!(%entity, %at, "orders blocked this round");
                }
            }
        }

        self.refresh_visibility();
        info!(
            round = self.round,
            acted = summary.acted,
            spawned = summary.spawned.len(),
            explored = self.grid.explored_count(),
            "round complete"
        );
        Ok(summary)
    }

    /// Place a unit a settlement finished, on its tile or next to it
    fn spawn_completed(&mut self, settlement: EntityId, template: &str, at: MapCoord) -> Result<Option<EntityId>> {
        let Ok(faction) = self.owner_of(settlement) else {
            return Ok(None);
        };
        let mut candidates = vec![at];
        candidates.extend(self.grid.neighbors(at, 1));
        let spot = candidates.into_iter().find(|&c| {
            self.grid
                .get(c)
                .map_or(false, |t| t.occupant().is_none() && t.tile_type().is_land())
        });
        match spot {
            Some(coord) => self.spawn_unit(faction, template, coord).map(Some),
            None => Ok(None),
        }
    }
}


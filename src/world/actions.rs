//! World operations that change entities and their tiles

use tracing::{info, warn};

use crate::core::error::{CoreError, Result};
use crate::core::types::{EntityId, FactionId};
use crate::entity::{Actor, DamageOutcome, Entity, MobileUnit, ProductionOrder, Settlement};
use crate::map::constants::SETTLEMENT_CLAIM_RADIUS;
use crate::map::hex::MapCoord;
use crate::map::pathfinding::find_path_filtered;
use crate::map::tile::Claim;
use crate::world::World;

impl World {
    /// Create a unit on `at` and queue it
    pub fn spawn_unit(&mut self, faction: FactionId, template: &str, at: MapCoord) -> Result<EntityId> {
        let stats = self.grid.data().unit(template)?.clone();
        self.faction(faction)?;
        if let Some(occupant) = self.grid.tile(at)?.occupant() {
            return Err(CoreError::TileOccupied { coord: at, occupant });
        }

        let id = self.ids.allocate();
        let reveals = self.is_observer(faction);
        self.grid.occupy_tile(at, id, reveals)?;
        let unit = MobileUnit::new(id, faction, at, template, &stats, &self.grid.layout());
        self.faction_mut(faction)?.register(Actor::Unit(unit))?;
        self.owners.insert(id, faction);
        info!(entity = %id, %faction, template, %at, "unit spawned");
        Ok(id)
    }

    /// Found a settlement on an unclaimed tile and claim the ring around it
    ///
    /// Tiles in the ring already claimed by someone else are skipped.
    pub fn found_settlement(&mut self, faction: FactionId, at: MapCoord, name: &str) -> Result<EntityId> {
        self.faction(faction)?;
        self.check_settlement_site(at)?;

        let id = self.ids.allocate();
        let reveals = self.is_observer(faction);
        self.grid.place_settlement(at, id)?;
        let mut settlement = Settlement::new(id, faction, at, name, &self.grid.layout());

        let claim = Claim {
            settlement: id,
            faction,
        };
        let mut area = vec![at];
        area.extend(self.grid.neighbors(at, SETTLEMENT_CLAIM_RADIUS));
        for coord in area {
            if self.grid.tile(coord)?.owner().is_none() {
                self.grid.claim_tile(coord, claim, reveals)?;
                settlement.add_territory(coord);
            }
        }

        let claimed = settlement.territory().len();
        self.faction_mut(faction)?.register(Actor::Settlement(settlement))?;
        self.owners.insert(id, faction);
        info!(entity = %id, %faction, name, %at, claimed, "settlement founded");
        Ok(id)
    }

    fn check_settlement_site(&self, at: MapCoord) -> Result<()> {
        let tile = self.grid.tile(at)?;
        if let Some(existing) = tile.settlement() {
            return Err(CoreError::InvalidAction(format!(
                "tile {} already holds settlement {}",
                at, existing
            )));
        }
        if let Some(claim) = tile.owner() {
            return Err(CoreError::TileClaimed {
                coord: at,
                owner: claim.settlement,
            });
        }
        Ok(())
    }

    /// Turn a settler unit into a settlement on its tile
    pub fn settle(&mut self, unit: EntityId, name: &str) -> Result<EntityId> {
        let (faction, at) = match self.entity(unit)? {
            Actor::Unit(u) if u.can_settle() => (u.faction(), u.tile()),
            _ => {
                return Err(CoreError::InvalidAction(format!(
                    "entity {} cannot found a settlement",
                    unit
                )))
            }
        };
        self.check_settlement_site(at)?;
        self.remove_entity(unit)?;
        self.found_settlement(faction, at, name)
    }

    /// Extend a settlement's territory by one tile
    pub fn claim_tile(&mut self, settlement: EntityId, coord: MapCoord) -> Result<()> {
        let faction = self.owner_of(settlement)?;
        if self.entity(settlement)?.as_settlement().is_none() {
            return Err(CoreError::InvalidAction(format!(
                "entity {} is not a settlement",
                settlement
            )));
        }
        let claim = Claim { settlement, faction };
        let reveals = self.is_observer(faction);
        self.grid.claim_tile(coord, claim, reveals)?;
        if let Some(s) = self.faction_mut(faction)?.entity_mut(settlement)?.as_settlement_mut() {
            s.add_territory(coord);
        }
        Ok(())
    }

    /// Plan a path for a unit and start following it
    ///
    /// Returns the planned path length, or `None` when the goal cannot be
    /// reached; in that case the unit keeps its previous orders.
    pub fn order_move(&mut self, unit: EntityId, goal: MapCoord) -> Result<Option<usize>> {
        let start = match self.entity(unit)? {
            Actor::Unit(u) => u.tile(),
            Actor::Settlement(_) => {
                return Err(CoreError::InvalidAction(format!("entity {} cannot move", unit)))
            }
        };
        let path = match find_path_filtered(&self.grid, start, goal, |t| t.occupant().is_none()) {
            Ok(path) => path,
            Err(err) => {
                warn!(%unit, error = %err, "move order rejected");
                return Ok(None);
            }
        };

        let len = path.len();
        self.act(unit, |actor, ctx| {
            if let Some(u) = actor.as_unit_mut() {
                u.set_orders(path);
                u.advance(ctx);
            }
        })?;
        Ok(Some(len))
    }

    /// Move a unit one tile
    pub fn move_unit(&mut self, unit: EntityId, to: MapCoord) -> Result<()> {
        let (moved, _) = self.act(unit, |actor, ctx| match actor.as_unit_mut() {
            Some(u) => u.step(ctx, to),
            None => Err(CoreError::InvalidAction(format!("entity {} cannot move", unit))),
        })?;
        moved
    }

    pub fn start_production(&mut self, settlement: EntityId, template: &str) -> Result<()> {
        let stats = self.grid.data().unit(template)?.clone();
        let faction = self.owner_of(settlement)?;
        match self.faction_mut(faction)?.entity_mut(settlement)?.as_settlement_mut() {
            Some(s) => {
                s.start_production(template, &stats);
                Ok(())
            }
            None => Err(CoreError::InvalidAction(format!(
                "entity {} is not a settlement",
                settlement
            ))),
        }
    }

    /// Drop a settlement's production order; an idle settlement is queued again
    pub fn cancel_production(&mut self, settlement: EntityId) -> Result<Option<ProductionOrder>> {
        let owner = self.owner_of(settlement)?;
        let faction = self.faction_mut(owner)?;
        let order = match faction.entity_mut(settlement)?.as_settlement_mut() {
            Some(s) => s.cancel_production(),
            None => {
                return Err(CoreError::InvalidAction(format!(
                    "entity {} is not a settlement",
                    settlement
                )))
            }
        };
        if order.is_some() {
            faction.enqueue(settlement)?;
        }
        Ok(order)
    }

    /// Keep a unit where it stands until the next round
    ///
    /// Its orders are dropped, its movement is spent and it leaves the queue.
    pub fn hold_unit(&mut self, unit: EntityId) -> Result<()> {
        let owner = self.owner_of(unit)?;
        let faction = self.faction_mut(owner)?;
        match faction.entity_mut(unit)?.as_unit_mut() {
            Some(u) => {
                u.clear_orders();
                u.end_turn();
            }
            None => {
                return Err(CoreError::InvalidAction(format!("entity {} is not a unit", unit)))
            }
        }
        faction.queue_mut().remove(unit);
        Ok(())
    }

    pub fn select(&mut self, entity: EntityId) -> Result<()> {
        self.act(entity, |actor, ctx| actor.select(ctx))?;
        Ok(())
    }

    pub fn deselect(&mut self, entity: EntityId) -> Result<()> {
        self.act(entity, |actor, ctx| actor.deselect(ctx))?;
        Ok(())
    }

    /// Apply damage; a destroyed entity is removed from play
    pub fn apply_damage(&mut self, entity: EntityId, amount: f64) -> Result<DamageOutcome> {
        let (outcome, _) = self.act(entity, |actor, _| actor.receive_damage(amount))?;
        if outcome == DamageOutcome::Destroyed {
            let removed = self.remove_entity(entity)?;
            info!(%entity, faction = %removed.faction(), "entity destroyed");
        }
        Ok(outcome)
    }

    /// Take an entity out of play for good
    ///
    /// A unit leaves its tile, which loses live sight if the unit was the
    /// observer's. A settlement releases its territory and structure.
    pub fn remove_entity(&mut self, entity: EntityId) -> Result<Actor> {
        let faction = self.owner_of(entity)?;
        if self.entity(entity)?.is_selected() {
            self.deselect(entity)?;
        }
        let actor = self
            .faction_mut(faction)?
            .remove_entity(entity)
            .ok_or(CoreError::EntityNotFound(entity))?;
        self.owners.remove(&entity);

        match &actor {
            Actor::Unit(unit) => {
                self.grid.vacate_tile(unit.tile(), entity);
                if self.is_observer(faction) {
                    self.grid.set_tile_visibility(unit.tile(), false);
                }
            }
            Actor::Settlement(settlement) => {
                for &coord in settlement.territory() {
                    self.grid.release_claim(coord, entity);
                }
                self.grid.remove_settlement(settlement.tile(), entity);
            }
        }
        Ok(actor)
    }
}

//! Mobile units: movement points, health and multi-turn orders

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{CoreError, Result};
use crate::core::types::{EntityId, FactionId};
use crate::data::UnitTemplate;
use crate::entity::{DamageOutcome, Entity, EntityContext, EntityCore, TurnEvent};
use crate::map::hex::{HexLayout, MapCoord};

/// Health restored at the start of each turn
pub const UNIT_REGENERATION: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileUnit {
    core: EntityCore,
    template: String,
    movement: f64,
    movement_left: f64,
    health: f64,
    max_health: f64,
    settles: bool,
    /// Remaining path, next step first
    orders: VecDeque<MapCoord>,
    /// Skips its turns until woken
    sleeping: bool,
    /// Tiles this unit currently highlights
    highlighted: Vec<MapCoord>,
}

impl MobileUnit {
    pub fn new(
        id: EntityId,
        faction: FactionId,
        tile: MapCoord,
        template_name: &str,
        template: &UnitTemplate,
        layout: &HexLayout,
    ) -> Self {
        Self {
            core: EntityCore::new(id, faction, tile, layout),
            template: template_name.to_string(),
            movement: template.movement,
            movement_left: template.movement,
            health: template.health,
            max_health: template.health,
            settles: template.settles,
            orders: VecDeque::new(),
            sleeping: false,
            highlighted: Vec::new(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn movement(&self) -> f64 {
        self.movement
    }

    pub fn movement_left(&self) -> f64 {
        self.movement_left
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    pub fn can_settle(&self) -> bool {
        self.settles
    }

    pub fn orders(&self) -> impl Iterator<Item = MapCoord> + '_ {
        self.orders.iter().copied()
    }

    pub fn has_orders(&self) -> bool {
        !self.orders.is_empty()
    }

    /// Replace the current orders with a path (start excluded)
    pub fn set_orders(&mut self, path: Vec<MapCoord>) {
        self.orders = path.into();
        self.sleeping = false;
    }

    pub fn clear_orders(&mut self) {
        self.orders.clear();
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn set_sleeping(&mut self, sleeping: bool) {
        self.sleeping = sleeping;
    }

    /// Spend all remaining movement without moving
    pub fn end_turn(&mut self) {
        self.movement_left = 0.0;
    }

    /// Move one tile onto an adjacent, unoccupied tile
    ///
    /// Costs the destination's weight; a unit with any movement left may
    /// always attempt the step.
    pub fn step(&mut self, ctx: &mut EntityContext<'_>, to: MapCoord) -> Result<()> {
        let from = self.core.tile();
        if self.movement_left <= 0.0 {
            return Err(CoreError::InvalidAction(format!(
                "unit {} has no movement left",
                self.id()
            )));
        }
        if !ctx.grid.are_adjacent(from, to) {
            return Err(CoreError::InvalidAction(format!(
                "{} is not adjacent to {}",
                to, from
            )));
        }

        let weight = ctx.grid.tile(to)?.weight();
        let was_selected = self.core.selected;
        if was_selected {
            self.deselect(ctx);
        }
        let moved = ctx.grid.move_occupant(self.id(), from, to, ctx.reveals);
        if moved.is_ok() {
            self.core.set_tile(to, &ctx.grid.layout());
            self.movement_left = (self.movement_left - weight).max(0.0);
        }
        if was_selected {
            self.select(ctx);
        }
        moved?;
        debug!(unit = %self.id(), %from, %to, movement_left = self.movement_left, "unit moved");
        Ok(())
    }

    /// Follow orders while movement remains
    ///
    /// A blocked step drops the remaining orders and reports the block.
    pub fn advance(&mut self, ctx: &mut EntityContext<'_>) {
        while self.movement_left > 0.0 {
            let Some(next) = self.orders.front().copied() else {
                break;
            };
            match self.step(ctx, next) {
                Ok(()) => {
                    self.orders.pop_front();
                }
                Err(err) => {
                    warn!(unit = %self.id(), at = %self.tile(), error = %err, "orders blocked");
                    self.orders.clear();
                    ctx.events.push(TurnEvent::OrdersBlocked {
                        entity: self.id(),
                        at: self.tile(),
                    });
                    break;
                }
            }
        }
    }

    /// Tiles this unit highlights when selected: its own and the 1-ring
    fn highlight_area(&self, ctx: &EntityContext<'_>) -> Vec<MapCoord> {
        let center = self.core.tile();
        let mut area = vec![center];
        area.extend(ctx.grid.neighbors(center, 1));
        area
    }
}

impl Entity for MobileUnit {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn select(&mut self, ctx: &mut EntityContext<'_>) {
        let area = self.highlight_area(ctx);
        ctx.highlight(self.id(), &area);
        self.highlighted = area;
        self.core.selected = true;
    }

    fn deselect(&mut self, ctx: &mut EntityContext<'_>) {
        let area = std::mem::take(&mut self.highlighted);
        ctx.clear_highlight(self.id(), &area);
        self.core.selected = false;
    }

    /// Free while it can still move and is not asleep
    fn is_free(&self) -> bool {
        self.movement_left > 0.0 && !self.sleeping
    }

    fn receive_damage(&mut self, amount: f64) -> DamageOutcome {
        self.health -= amount.max(0.0);
        if self.health <= 0.0 {
            self.health = 0.0;
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Survived {
                remaining: self.health,
            }
        }
    }

    fn on_turn(&mut self, ctx: &mut EntityContext<'_>) {
        self.movement_left = self.movement;
        self.health = (self.health + UNIT_REGENERATION).min(self.max_health);
        if self.sleeping {
            return;
        }
        self.advance(ctx);
    }
}

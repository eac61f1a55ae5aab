//! Settlements: claim territory and produce units

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::{EntityId, FactionId};
use crate::data::UnitTemplate;
use crate::entity::{DamageOutcome, Entity, EntityContext, EntityCore, TurnEvent};
use crate::map::hex::{HexLayout, MapCoord};

pub const SETTLEMENT_HEALTH: f64 = 50.0;
/// Production added to the current order each turn
pub const SETTLEMENT_PRODUCTION: f64 = 10.0;
pub const SETTLEMENT_REGENERATION: f64 = 2.0;

/// A unit being built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrder {
    pub template: String,
    pub cost: f64,
    pub progress: f64,
}

impl ProductionOrder {
    pub fn new(template: &str, unit: &UnitTemplate) -> Self {
        Self {
            template: template.to_string(),
            cost: unit.cost,
            progress: 0.0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.cost
    }

    /// Turns left at the given rate
    pub fn turns_remaining(&self, rate: f64) -> u32 {
        if self.is_complete() || rate <= 0.0 {
            return 0;
        }
        ((self.cost - self.progress) / rate).ceil() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    core: EntityCore,
    name: String,
    health: f64,
    max_health: f64,
    production_rate: f64,
    production: Option<ProductionOrder>,
    /// Tiles claimed by this settlement, its own tile first
    territory: Vec<MapCoord>,
    highlighted: Vec<MapCoord>,
}

impl Settlement {
    pub fn new(id: EntityId, faction: FactionId, tile: MapCoord, name: &str, layout: &HexLayout) -> Self {
        Self {
            core: EntityCore::new(id, faction, tile, layout),
            name: name.to_string(),
            health: SETTLEMENT_HEALTH,
            max_health: SETTLEMENT_HEALTH,
            production_rate: SETTLEMENT_PRODUCTION,
            production: None,
            territory: Vec::new(),
            highlighted: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn production_rate(&self) -> f64 {
        self.production_rate
    }

    pub fn production(&self) -> Option<&ProductionOrder> {
        self.production.as_ref()
    }

    /// Start building a unit, replacing any current order
    pub fn start_production(&mut self, template: &str, unit: &UnitTemplate) {
        self.production = Some(ProductionOrder::new(template, unit));
    }

    pub fn cancel_production(&mut self) -> Option<ProductionOrder> {
        self.production.take()
    }

    pub fn territory(&self) -> &[MapCoord] {
        &self.territory
    }

    /// Record a tile the world has claimed for this settlement
    pub(crate) fn add_territory(&mut self, coord: MapCoord) {
        if !self.territory.contains(&coord) {
            self.territory.push(coord);
        }
    }
}

impl Entity for Settlement {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn select(&mut self, ctx: &mut EntityContext<'_>) {
        let area = if self.territory.is_empty() {
            vec![self.core.tile()]
        } else {
            self.territory.clone()
        };
        ctx.highlight(self.id(), &area);
        self.highlighted = area;
        self.core.selected = true;
    }

    fn deselect(&mut self, ctx: &mut EntityContext<'_>) {
        let area = std::mem::take(&mut self.highlighted);
        ctx.clear_highlight(self.id(), &area);
        self.core.selected = false;
    }

    /// Free while nothing is being produced
    fn is_free(&self) -> bool {
        self.production.is_none()
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
        self.health = (self.health + SETTLEMENT_REGENERATION).min(self.max_health);

        let Some(order) = self.production.as_mut() else {
            return;
        };
        order.progress += self.production_rate;
        debug!(settlement = %self.core.id(), template = %order.template, progress = order.progress, "production");
        if order.is_complete() {
            ctx.events.push(TurnEvent::UnitCompleted {
                settlement: self.core.id(),
                template: order.template.clone(),
                at: self.core.tile(),
            });
            self.production = None;
        }
    }
}

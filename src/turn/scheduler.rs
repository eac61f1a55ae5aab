//! Running entity turn hooks
//!
//! A sweep visits every entity of a faction exactly once: first the ones
//! still waiting in the queue (front to back), then the spent ones in
//! registration order. The queue is drained before any hook runs, so an
//! entity pushed back by its own hook is never visited twice.

use ahash::AHashSet;
use tracing::debug;

use crate::core::error::{CoreError, Result};
use crate::core::types::EntityId;
use crate::entity::{Entity, EntityContext, TurnEvent};
use crate::map::grid::HexGrid;
use crate::turn::faction::Faction;

/// What a sweep did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    /// Entities whose hook ran, in order
    pub acted: Vec<EntityId>,
    /// Entities pushed back because they were still free
    pub requeued: Vec<EntityId>,
    pub events: Vec<TurnEvent>,
}

/// Run one entity's turn hook
///
/// The entity's highlight is cleared while its hook runs, and it is pushed
/// back onto the queue afterwards if it is still free. A selected entity
/// stays selected: with `reselect` its highlight is redrawn where it now
/// stands, without it the highlight stays cleared until the next `select`.
/// Returns whether it was requeued.
pub fn next_turn(
    faction: &mut Faction,
    id: EntityId,
    ctx: &mut EntityContext<'_>,
    reselect: bool,
) -> Result<bool> {
    if !faction.contains(id) {
        return Err(CoreError::EntityNotFound(id));
    }
    faction.queue_mut().remove(id);
    faction.set_acting(Some(id));

    let actor = faction.entity_mut(id)?;
    let was_selected = actor.is_selected();
    if was_selected {
        actor.deselect(ctx);
    }
    actor.on_turn(ctx);
    let free = actor.is_free();
    if was_selected {
        if reselect {
            actor.select(ctx);
        } else {
            actor.core_mut().selected = true;
        }
    }

    faction.set_acting(None);
    if free {
        faction.queue_mut().push(id);
    }
    Ok(free)
}

/// Order in which a sweep visits a faction's entities
pub fn sweep_order(faction: &Faction) -> Vec<EntityId> {
    let mut order: Vec<EntityId> = faction.queue().iter().collect();
    let queued: AHashSet<EntityId> = order.iter().copied().collect();
    order.extend(
        faction
            .entity_ids()
            .into_iter()
            .filter(|id| !queued.contains(id)),
    );
    order
}

/// Run every entity's hook once
pub fn sweep_faction(faction: &mut Faction, grid: &mut HexGrid, reveals: bool) -> Result<SweepReport> {
    let order = sweep_order(faction);
    faction.queue_mut().drain();

    let color = faction.color().to_string();
    let mut ctx = EntityContext::new(grid, reveals, &color);
    let mut report = SweepReport::default();
    for id in order {
        if !faction.contains(id) {
            continue;
        }
        if next_turn(faction, id, &mut ctx, true)? {
            report.requeued.push(id);
        }
        report.acted.push(id);
    }
    report.events = std::mem::take(&mut ctx.events);

    debug!(
        faction = %faction.id(),
        acted = report.acted.len(),
        requeued = report.requeued.len(),
        events = report.events.len(),
        "faction swept"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::config::GameConfig;
    use crate::core::types::FactionId;
    use crate::data::StaticData;
    use crate::entity::{Actor, MobileUnit, Settlement};
    use crate::map::hex::MapCoord;
    use crate::map::terrain::TileType;
    use crate::turn::faction::EntityState;

    fn grid() -> HexGrid {
        let config = GameConfig::default().with_size(10, 10);
        HexGrid::new(&config, Arc::new(StaticData::builtin().unwrap()), TileType::Land).unwrap()
    }

    fn add_unit(f: &mut Faction, g: &mut HexGrid, id: u64, at: MapCoord) {
        let template = g.data().unit("warrior").unwrap().clone();
        g.occupy_tile(at, EntityId(id), false).unwrap();
        let unit = MobileUnit::new(EntityId(id), f.id(), at, "warrior", &template, &g.layout());
        f.register(Actor::Unit(unit)).unwrap();
    }

    fn add_busy_settlement(f: &mut Faction, g: &HexGrid, id: u64, at: MapCoord) {
        let template = g.data().unit("cavalry").unwrap().clone();
        let mut s = Settlement::new(EntityId(id), f.id(), at, "Alpha", &g.layout());
        s.start_production("cavalry", &template);
        f.register(Actor::Settlement(s)).unwrap();
    }

    #[test]
    fn test_free_entity_requeued_busy_entity_spent() {
        let mut g = grid();
        let mut f = Faction::new(FactionId(0), "Red", "red");
        add_unit(&mut f, &mut g, 1, MapCoord::new(1, 1));
        add_busy_settlement(&mut f, &g, 2, MapCoord::new(5, 5));

        let report = sweep_faction(&mut f, &mut g, false).unwrap();
        assert_eq!(report.acted, vec![EntityId(1), EntityId(2)]);
        assert_eq!(report.requeued, vec![EntityId(1)]);
        assert_eq!(f.state(EntityId(1)), EntityState::Queued);
        assert_eq!(f.state(EntityId(2)), EntityState::Spent);
    }

    #[test]
    fn test_queued_entities_go_first() {
        let mut g = grid();
        let mut f = Faction::new(FactionId(0), "Red", "red");
        add_unit(&mut f, &mut g, 1, MapCoord::new(1, 1));
        add_unit(&mut f, &mut g, 2, MapCoord::new(2, 2));
        add_unit(&mut f, &mut g, 3, MapCoord::new(3, 3));

        // Entity 1 was handed out; 2 and 3 still wait
        assert_eq!(f.next_action(), Some(EntityId(1)));
        assert_eq!(sweep_order(&f), vec![EntityId(2), EntityId(3), EntityId(1)]);
    }

    #[test]
    fn test_each_entity_visited_once_per_sweep() {
        let mut g = grid();
        let mut f = Faction::new(FactionId(0), "Red", "red");
        for i in 0..5 {
            add_unit(&mut f, &mut g, i, MapCoord::new(i as i32, 0));
        }
        let report = sweep_faction(&mut f, &mut g, false).unwrap();
        assert_eq!(report.acted.len(), 5);
        let unique: AHashSet<_> = report.acted.iter().collect();
        assert_eq!(unique.len(), 5);
        assert_eq!(f.queue().len(), 5);
    }

    #[test]
    fn test_reselect_flag() {
        let mut g = grid();
        let mut f = Faction::new(FactionId(0), "Red", "red");
        add_unit(&mut f, &mut g, 1, MapCoord::new(4, 4));
        let mut ctx = EntityContext::new(&mut g, false, "red");
        f.entity_mut(EntityId(1)).unwrap().select(&mut ctx);

        next_turn(&mut f, EntityId(1), &mut ctx, true).unwrap();
        assert!(f.entity(EntityId(1)).unwrap().is_selected());

        assert!(ctx.grid.tiles().any(|t| t.selection.is_some()));

        next_turn(&mut f, EntityId(1), &mut ctx, false).unwrap();
        assert!(f.entity(EntityId(1)).unwrap().is_selected());
        assert!(ctx.grid.tiles().all(|t| t.selection.is_none()));

        // A later select draws the highlight again
        f.entity_mut(EntityId(1)).unwrap().select(&mut ctx);
        assert_eq!(ctx.grid.tiles().filter(|t| t.selection.is_some()).count(), 7);
    }

    #[test]
    fn test_unselected_entity_stays_unselected() {
        let mut g = grid();
        let mut f = Faction::new(FactionId(0), "Red", "red");
        add_unit(&mut f, &mut g, 1, MapCoord::new(4, 4));
        let mut ctx = EntityContext::new(&mut g, false, "red");
        next_turn(&mut f, EntityId(1), &mut ctx, true).unwrap();
        assert!(!f.entity(EntityId(1)).unwrap().is_selected());
        assert!(ctx.grid.tiles().all(|t| t.selection.is_none()));
    }

    #[test]
    fn test_removed_entity_not_swept() {
        let mut g = grid();
        let mut f = Faction::new(FactionId(0), "Red", "red");
        add_unit(&mut f, &mut g, 1, MapCoord::new(1, 1));
        add_unit(&mut f, &mut g, 2, MapCoord::new(2, 2));
        f.remove_entity(EntityId(1));

        let report = sweep_faction(&mut f, &mut g, false).unwrap();
        assert_eq!(report.acted, vec![EntityId(2)]);
        assert!(!f.queue().contains(EntityId(1)));

        let mut ctx = EntityContext::new(&mut g, false, "red");
        assert!(next_turn(&mut f, EntityId(1), &mut ctx, true).is_err());
    }
}

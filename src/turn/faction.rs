//! A competing faction: its roster of entities and its turn queue

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::error::{CoreError, Result};
use crate::core::types::{Color, EntityId, FactionId};
use crate::entity::{Actor, Entity};
use crate::turn::queue::TurnQueue;

/// Where an entity stands in its faction's turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    Unregistered,
    Queued,
    /// Its hook is running
    Acting,
    Spent,
}

#[derive(Debug, Clone)]
pub struct Faction {
    id: FactionId,
    name: String,
    color: Color,
    queue: TurnQueue,
    /// Entities by id; ids are allocated monotonically, so this is
    /// registration order
    roster: BTreeMap<EntityId, Actor>,
    /// Entity whose hook is running
    acting: Option<EntityId>,
}

impl Faction {
    pub fn new(id: FactionId, name: impl Into<String>, color: impl Into<Color>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            queue: TurnQueue::new(),
            roster: BTreeMap::new(),
            acting: None,
        }
    }

    pub fn id(&self) -> FactionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn queue(&self) -> &TurnQueue {
        &self.queue
    }

    /// Add a newly constructed entity and queue it
    pub fn register(&mut self, actor: Actor) -> Result<()> {
        let id = actor.id();
        if actor.faction() != self.id {
            return Err(CoreError::InvalidAction(format!(
                "entity {} belongs to {}, not {}",
                id,
                actor.faction(),
                self.id
            )));
        }
        if self.roster.contains_key(&id) {
            return Err(CoreError::InvalidAction(format!("entity {} already registered", id)));
        }
        self.roster.insert(id, actor);
        self.queue.push(id);
        debug!(faction = %self.id, entity = %id, "entity registered");
        Ok(())
    }

    /// Queue a registered entity; removed entities are rejected
    pub fn enqueue(&mut self, id: EntityId) -> Result<bool> {
        if !self.roster.contains_key(&id) {
            return Err(CoreError::EntityNotFound(id));
        }
        Ok(self.queue.push(id))
    }

    /// Drop an entity from roster and queue
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Actor> {
        self.queue.remove(id);
        let removed = self.roster.remove(&id);
        if removed.is_some() {
            debug!(faction = %self.id, entity = %id, "entity removed");
        }
        removed
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.roster.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Actor> {
        self.roster.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        self.roster.get_mut(&id)
    }

    pub fn entity(&self, id: EntityId) -> Result<&Actor> {
        self.get(id).ok_or(CoreError::EntityNotFound(id))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Actor> {
        self.get_mut(id).ok_or(CoreError::EntityNotFound(id))
    }

    /// All entities in registration order
    pub fn entities(&self) -> impl Iterator<Item = &Actor> {
        self.roster.values()
    }

    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.roster.keys().copied().collect()
    }

    pub fn units(&self) -> impl Iterator<Item = &crate::entity::MobileUnit> {
        self.roster.values().filter_map(Actor::as_unit)
    }

    pub fn settlements(&self) -> impl Iterator<Item = &crate::entity::Settlement> {
        self.roster.values().filter_map(Actor::as_settlement)
    }

    pub fn state(&self, id: EntityId) -> EntityState {
        if !self.roster.contains_key(&id) {
            EntityState::Unregistered
        } else if self.acting == Some(id) {
            EntityState::Acting
        } else if self.queue.contains(id) {
            EntityState::Queued
        } else {
            EntityState::Spent
        }
    }

    /// Pop queued entities until one that can still act
    ///
    /// Entities that are no longer free leave the queue; the next round
    /// sweep brings them back.
    pub fn next_action(&mut self) -> Option<EntityId> {
        while let Some(id) = self.queue.pop() {
            if self.roster.get(&id).map_or(false, |actor| actor.is_free()) {
                return Some(id);
            }
        }
        None
    }

    /// Nothing left waiting to act this round
    pub fn ready(&self) -> bool {
        self.queue.is_empty()
    }

    /// No entities left at all
    pub fn is_eliminated(&self) -> bool {
        self.roster.is_empty()
    }

    pub(crate) fn queue_mut(&mut self) -> &mut TurnQueue {
        &mut self.queue
    }

    pub(crate) fn set_acting(&mut self, id: Option<EntityId>) {
        self.acting = id;
    }
}

//! FIFO of entities waiting to act, each present at most once

use std::collections::VecDeque;

use ahash::AHashSet;

use crate::core::types::EntityId;

#[derive(Debug, Clone, Default)]
pub struct TurnQueue {
    order: VecDeque<EntityId>,
    members: AHashSet<EntityId>,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the back; returns false if already queued
    pub fn push(&mut self, id: EntityId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push_back(id);
        true
    }

    pub fn pop(&mut self) -> Option<EntityId> {
        let id = self.order.pop_front()?;
        self.members.remove(&id);
        Some(id)
    }

    pub fn peek(&self) -> Option<EntityId> {
        self.order.front().copied()
    }

    /// Drop an entity wherever it sits in the queue
    pub fn remove(&mut self, id: EntityId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.order.retain(|&queued| queued != id);
        true
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    /// Empty the queue, returning its contents front to back
    pub fn drain(&mut self) -> Vec<EntityId> {
        self.members.clear();
        self.order.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = TurnQueue::new();
        q.push(EntityId(3));
        q.push(EntityId(1));
        q.push(EntityId(2));
        assert_eq!(q.peek(), Some(EntityId(3)));
        assert_eq!(q.pop(), Some(EntityId(3)));
        assert_eq!(q.peek(), Some(EntityId(1)));
        assert_eq!(q.pop(), Some(EntityId(1)));
        assert_eq!(q.pop(), Some(EntityId(2)));
        assert_eq!(q.pop(), None);
        assert_eq!(q.peek(), None);
    }

    #[test]
    fn test_at_most_once() {
        let mut q = TurnQueue::new();
        assert!(q.push(EntityId(1)));
        assert!(!q.push(EntityId(1)));
        assert_eq!(q.len(), 1);
        q.pop();
        assert!(q.push(EntityId(1)));
    }

    #[test]
    fn test_remove_from_middle() {
        let mut q = TurnQueue::new();
        for i in 0..4 {
            q.push(EntityId(i));
        }
        assert!(q.remove(EntityId(2)));
        assert!(!q.remove(EntityId(2)));
        assert!(!q.contains(EntityId(2)));
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![EntityId(0), EntityId(1), EntityId(3)]);
    }

    #[test]
    fn test_drain_empties() {
        let mut q = TurnQueue::new();
        q.push(EntityId(5));
        q.push(EntityId(6));
        assert_eq!(q.drain(), vec![EntityId(5), EntityId(6)]);
        assert!(q.is_empty());
        assert!(q.push(EntityId(5)));
    }
}

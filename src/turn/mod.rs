//! Faction turn queues and the per-round sweep

pub mod faction;
pub mod queue;
pub mod scheduler;

pub use faction::{EntityState, Faction};
pub use queue::TurnQueue;
pub use scheduler::{next_turn, sweep_faction, sweep_order, SweepReport};

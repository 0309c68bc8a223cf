//! Speed timeline: scheduling, rewrites and collisions.
//!
//! ## Key Types
//!
//! - `PlannedCard`: a card a side committed to, with its actor
//! - `QueueEntry`: a scheduled action at position `sp`
//! - `Timeline`: the turn's queue; unresolved entries stay sorted by `sp`
//! - `TimelineChanges`: signed shifts applied by card traits

pub mod entry;
pub mod scheduler;

pub use entry::{apply_agility, PlannedCard, QueueEntry, TimelineChanges};
pub use scheduler::Timeline;

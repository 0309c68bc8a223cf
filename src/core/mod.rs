//! Core battle types: sides, handles, RNG, configuration, events.
//!
//! Everything here is independent of the catalog contents; subsystems
//! build on these types rather than on each other's internals.

pub mod config;
pub mod event;
pub mod id;
pub mod rng;
pub mod side;

pub use config::BattleConfig;
pub use event::{BattleEvent, Winner};
pub use id::{CombatantId, EntryId};
pub use rng::{BattleRng, BattleRngState};
pub use side::{Side, SideMap};

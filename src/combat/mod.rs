//! Combatant state and card resolution.
//!
//! ## Key Types
//!
//! - `CombatantState`: hp, block, stats and token ledger of one body
//! - `Combatants`: arena addressed by `CombatantId` (player at slot 0)
//! - `apply_action`: resolves one card and returns `(dealt, taken, events)`

pub mod arena;
pub mod resolver;
pub mod state;

pub use arena::Combatants;
pub use resolver::{apply_action, ActionOutcome, BattleContext};
pub use state::{CombatantState, Stats};

//! Turn driver, policies and the battle summary.
//!
//! ## Key Types
//!
//! - `Battle`: owns one battle's arena, decks, ether pools and event log
//! - `CardPolicy`: chooses hand cards from a `BattleView`
//! - `BattleResult`: the summary the balance simulator aggregates

pub mod deck;
pub mod engine;
pub mod policy;
pub mod result;

pub use deck::{repair_deck, Deck};
pub use engine::Battle;
pub use policy::{BattleView, CardPolicy, ComboPolicy, RandomPolicy};
pub use result::BattleResult;

pub use crate::core::Winner;

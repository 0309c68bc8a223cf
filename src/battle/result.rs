//! Battle summary consumed by the balance simulator.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::CardId;
use crate::core::Winner;

/// Outcome of one finished battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    pub winner: Winner,
    pub turns: u32,
    /// Hp the opponent side lost.
    pub damage_dealt: u64,
    /// Hp the player lost.
    pub damage_taken: u64,
    /// How often the player played each card.
    pub card_usage: FxHashMap<CardId, u32>,
    pub final_soul: u32,
}

impl BattleResult {
    #[must_use]
    pub fn player_won(&self) -> bool {
        self.winner == Winner::Player
    }

    #[must_use]
    pub fn used(&self, card: CardId) -> bool {
        self.card_usage.get(&card).is_some_and(|&n| n > 0)
    }
}

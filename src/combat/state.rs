//! Per-combatant state.

use serde::{Deserialize, Serialize};

use crate::core::{CombatantId, Side};
use crate::tokens::TokenLedger;

/// Base stats of a combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    /// Flat bonus to attack damage and counter reflection.
    pub strength: i32,
    /// Shortens the speed cost of every card on this side.
    pub agility: i32,
    /// Above zero, reveals the opponent's planned cards.
    pub insight: i32,
}

impl Stats {
    #[must_use]
    pub const fn new(strength: i32, agility: i32, insight: i32) -> Self {
        Self {
            strength,
            agility,
            insight,
        }
    }
}

/// A single combatant: hp, block, stats and tokens.
///
/// `0 <= hp <= max_hp` and `block >= 0` hold after every mutation made
/// through this type's methods.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatantState {
    pub id: CombatantId,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub block: i32,
    pub stats: Stats,
    pub tokens: TokenLedger,
}

impl CombatantState {
    #[must_use]
    pub fn new(id: CombatantId, name: impl Into<String>, max_hp: i32, stats: Stats) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            id,
            name: name.into(),
            hp: max_hp,
            max_hp,
            block: 0,
            stats,
            tokens: TokenLedger::new(),
        }
    }

    #[must_use]
    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp.clamp(0, self.max_hp);
        self
    }

    #[must_use]
    pub fn with_block(mut self, block: i32) -> Self {
        self.block = block.max(0);
        self
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.id.side()
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Lose up to `amount` hp; returns the hp actually lost.
    pub fn lose_hp(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).clamp(0, self.max_hp);
        before - self.hp
    }

    /// Regain up to `amount` hp; returns the hp actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount.max(0)).clamp(0, self.max_hp);
        self.hp - before
    }

    pub fn gain_block(&mut self, amount: i32) {
        self.block = self.block.saturating_add(amount.max(0));
    }
}

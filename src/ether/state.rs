//! Battle-long resource pools.

use serde::{Deserialize, Serialize};

use super::transfer::{ShieldState, TransferOutcome};

/// What the opponent can spend grace on at turn start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GraceAbility {
    /// Raise a shield that absorbs the player's net ether gain.
    Ward { cost: u32, shield: u32 },
    /// Heal the most wounded opponent unit.
    Mend { cost: u32, heal: i32 },
}

impl GraceAbility {
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            GraceAbility::Ward { cost, .. } | GraceAbility::Mend { cost, .. } => cost,
        }
    }
}

impl std::fmt::Display for GraceAbility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraceAbility::Ward { shield, .. } => write!(f, "ward ({shield} shield)"),
            GraceAbility::Mend { heal, .. } => write!(f, "mend ({heal} heal)"),
        }
    }
}

/// Soul, grace and shield of one battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtherState {
    /// Player soul.
    pub soul: u32,
    /// Opponent soul-equivalent; the pool the player drains.
    pub opponent_soul: u32,
    /// Opponent grace; only ever spent by the opponent.
    pub grace: u32,
    pub shield: Option<ShieldState>,
}

impl EtherState {
    #[must_use]
    pub fn new(opponent_soul: u32) -> Self {
        Self {
            opponent_soul,
            ..Self::default()
        }
    }

    /// Spend grace if there is enough. Returns whether it was spent.
    pub fn spend_grace(&mut self, amount: u32) -> bool {
        match self.grace.checked_sub(amount) {
            Some(left) => {
                self.grace = left;
                true
            }
            None => false,
        }
    }

    /// Stack more absorption onto the shield.
    pub fn raise_shield(&mut self, amount: u32) {
        let shield = self.shield.get_or_insert_with(ShieldState::default);
        shield.remaining = shield.remaining.saturating_add(amount);
    }

    /// Take the pools from a settlement.
    pub fn apply(&mut self, outcome: &TransferOutcome) {
        self.soul = outcome.next_soul;
        self.opponent_soul = outcome.next_opponent_soul;
        self.grace = self.grace.saturating_add(outcome.opponent_grace_gain);
        self.shield = outcome.shield.filter(|s| !s.is_depleted());
    }
}

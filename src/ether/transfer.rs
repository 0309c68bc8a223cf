//! Turn-end soul/grace settlement.
//!
//! The player's soul and the opponent's grace are separate, one-way
//! pools:
//!
//! - a player-favored turn drains the opponent's soul-equivalent pool into
//!   the player's soul, after an optional shield absorbs part of it
//! - an opponent-favored turn only adds grace; player soul never drops
//! - a defeated opponent's remaining soul-equivalent goes to the player

use serde::{Deserialize, Serialize};

/// Grace-funded absorption in front of the opponent's pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldState {
    pub remaining: u32,
}

impl ShieldState {
    #[must_use]
    pub const fn new(remaining: u32) -> Self {
        Self { remaining }
    }

    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.remaining == 0
    }
}

/// Inputs of one settlement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInput {
    pub player_gain: u32,
    pub opponent_gain: u32,
    pub soul: u32,
    pub opponent_soul: u32,
    /// Summed opponent hp; `<= 0` means the opponent is defeated.
    pub opponent_hp: i32,
    pub shield: Option<ShieldState>,
}

impl TransferInput {
    #[must_use]
    pub fn new(player_gain: u32, opponent_gain: u32, soul: u32, opponent_soul: u32, opponent_hp: i32) -> Self {
        Self {
            player_gain,
            opponent_gain,
            soul,
            opponent_soul,
            opponent_hp,
            shield: None,
        }
    }

    #[must_use]
    pub fn with_shield(mut self, shield: ShieldState) -> Self {
        self.shield = Some(shield);
        self
    }
}

/// Result of one settlement. All pools are unsigned, so never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub next_soul: u32,
    pub next_opponent_soul: u32,
    /// Taken from the opponent's pool by the net gain.
    pub moved: u32,
    pub opponent_grace_gain: u32,
    pub shield_blocked: u32,
    /// Net gain left over after zeroing the opponent's pool.
    pub overkill: u32,
    /// Remainder claimed from a defeated opponent.
    pub inherited: u32,
    pub shield: Option<ShieldState>,
}

/// Settle one turn's ether.
///
/// ```
/// use ether_battle::ether::{transfer, TransferInput};
///
/// let out = transfer(TransferInput::new(100, 50, 0, 200, 100));
/// assert_eq!(out.moved, 50);
/// assert_eq!(out.next_soul, 50);
/// assert_eq!(out.next_opponent_soul, 150);
/// ```
#[must_use]
pub fn transfer(input: TransferInput) -> TransferOutcome {
    let mut out = TransferOutcome {
        next_soul: input.soul,
        next_opponent_soul: input.opponent_soul,
        shield: input.shield,
        ..TransferOutcome::default()
    };

    if input.player_gain > input.opponent_gain {
        let net = input.player_gain - input.opponent_gain;
        if let Some(shield) = out.shield.as_mut() {
            out.shield_blocked = net.min(shield.remaining);
            shield.remaining -= out.shield_blocked;
        }
        let effective = net - out.shield_blocked;
        out.moved = effective.min(input.opponent_soul);
        out.next_opponent_soul -= out.moved;
        out.next_soul = out.next_soul.saturating_add(out.moved);
        if input.opponent_soul > 0 && out.next_opponent_soul == 0 {
            out.overkill = effective - out.moved;
        }
    } else if input.opponent_gain > input.player_gain {
        out.opponent_grace_gain = input.opponent_gain - input.player_gain;
    }

    if input.opponent_hp <= 0 && out.next_opponent_soul > 0 {
        out.inherited = out.next_opponent_soul;
        out.next_soul = out.next_soul.saturating_add(out.inherited);
        out.next_opponent_soul = 0;
    }

    tracing::debug!(
        player_gain = input.player_gain,
        opponent_gain = input.opponent_gain,
        moved = out.moved,
        grace = out.opponent_grace_gain,
        blocked = out.shield_blocked,
        overkill = out.overkill,
        inherited = out.inherited,
        "ether settled"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_favored_turn_only_adds_grace() {
        let out = transfer(TransferInput::new(10, 70, 40, 100, 50));

        assert_eq!(out.next_soul, 40);
        assert_eq!(out.next_opponent_soul, 100);
        assert_eq!(out.opponent_grace_gain, 60);
        assert_eq!(out.moved, 0);
    }

    #[test]
    fn test_even_turn_changes_nothing() {
        let out = transfer(TransferInput::new(30, 30, 5, 100, 50));
        assert_eq!((out.next_soul, out.next_opponent_soul, out.opponent_grace_gain), (5, 100, 0));
    }

    #[test]
    fn test_shield_absorbs_first() {
        let out = transfer(TransferInput::new(50, 0, 0, 100, 50).with_shield(ShieldState::new(30)));

        assert_eq!(out.shield_blocked, 30);
        assert_eq!(out.moved, 20);
        assert_eq!(out.shield, Some(ShieldState::new(0)));
        assert_eq!(out.next_opponent_soul, 80);
    }

    #[test]
    fn test_overkill_excludes_shielded_amount() {
        let out = transfer(TransferInput::new(200, 0, 0, 50, 10).with_shield(ShieldState::new(30)));

        assert_eq!(out.moved, 50);
        assert_eq!(out.next_opponent_soul, 0);
        assert_eq!(out.overkill, 120);
    }

    #[test]
    fn test_no_overkill_on_empty_pool() {
        let out = transfer(TransferInput::new(200, 0, 0, 0, 10));
        assert_eq!(out.overkill, 0);
        assert_eq!(out.moved, 0);
    }

    #[test]
    fn test_exact_drain_has_no_overkill() {
        let out = transfer(TransferInput::new(60, 0, 0, 60, 10));
        assert_eq!(out.overkill, 0);
        assert_eq!(out.next_opponent_soul, 0);
    }

    #[test]
    fn test_defeated_opponent_hands_over_remainder() {
        let out = transfer(TransferInput::new(0, 0, 10, 30, 0));

        assert_eq!(out.inherited, 30);
        assert_eq!(out.next_soul, 40);
        assert_eq!(out.next_opponent_soul, 0);
    }

    #[test]
    fn test_grace_is_not_inherited() {
        let out = transfer(TransferInput::new(0, 40, 10, 0, -5));

        assert_eq!(out.inherited, 0);
        assert_eq!(out.next_soul, 10);
        assert_eq!(out.opponent_grace_gain, 40);
    }
}

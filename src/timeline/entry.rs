//! Queue entries and timeline rewrites.

use serde::{Deserialize, Serialize};

use crate::catalog::CardId;
use crate::core::{CombatantId, EntryId, Side};

/// A card a side has committed to play, and who plays it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlannedCard {
    pub actor: CombatantId,
    pub card: CardId,
}

impl PlannedCard {
    #[must_use]
    pub const fn new(actor: CombatantId, card: CardId) -> Self {
        Self { actor, card }
    }
}

/// One scheduled action on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,
    pub side: Side,
    pub actor: CombatantId,
    pub card: CardId,
    /// Agility-adjusted speed cost.
    pub speed_cost: i32,
    /// Position on the actor side's sub-timeline.
    pub sp: i32,
    /// This entry is an echo of another.
    pub duplicated: bool,
    /// An entry of the other side sits at the same position.
    pub crossed: bool,
}

/// Signed shifts applied to unresolved entries.
///
/// Positive `advance_player` moves player entries earlier; positive
/// `push_enemy` and `push_last_enemy` move opponent entries later.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineChanges {
    pub advance_player: i32,
    pub push_enemy: i32,
    pub push_last_enemy: i32,
}

impl TimelineChanges {
    #[must_use]
    pub fn advance_player(amount: i32) -> Self {
        Self {
            advance_player: amount,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn push_enemy(amount: i32) -> Self {
        Self {
            push_enemy: amount,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn push_last_enemy(amount: i32) -> Self {
        Self {
            push_last_enemy: amount,
            ..Self::default()
        }
    }

    /// All deltas zero.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Agility-adjusted speed cost. A card always occupies at least 1.
///
/// ```
/// use ether_battle::timeline::apply_agility;
///
/// assert_eq!(apply_agility(6, 2), 4);
/// assert_eq!(apply_agility(3, 5), 1);
/// assert_eq!(apply_agility(4, -2), 6);
/// ```
#[must_use]
pub fn apply_agility(speed_cost: i32, agility: i32) -> i32 {
    speed_cost.saturating_sub(agility).max(1)
}

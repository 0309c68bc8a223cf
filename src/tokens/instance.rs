//! A live token on a combatant.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::catalog::TokenId;

/// A coordinate on the battle timeline: turn number plus position within
/// the turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub turn: u32,
    pub sp: i32,
}

impl TimelinePoint {
    #[must_use]
    pub const fn new(turn: u32, sp: i32) -> Self {
        Self { turn, sp }
    }

    /// True once the timeline has moved past `granted`: a later turn, at
    /// or beyond the same position.
    #[must_use]
    pub const fn has_passed(self, granted: TimelinePoint) -> bool {
        self.turn > granted.turn && self.sp >= granted.sp
    }
}

impl std::fmt::Display for TimelinePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}@{}", self.turn, self.sp)
    }
}

/// One token instance. Stacks can never be zero: an instance that would
/// drop to zero stacks is removed instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInstance {
    pub id: TokenId,
    pub stacks: NonZeroU32,
    /// When set, the token expires by timeline position instead of at
    /// turn end.
    pub granted_at: Option<TimelinePoint>,
}

impl TokenInstance {
    /// `None` when `stacks` is zero.
    #[must_use]
    pub fn new(id: TokenId, stacks: u32, granted_at: Option<TimelinePoint>) -> Option<Self> {
        NonZeroU32::new(stacks).map(|stacks| Self {
            id,
            stacks,
            granted_at,
        })
    }

    #[must_use]
    pub fn stacks(&self) -> u32 {
        self.stacks.get()
    }
}

//! Stable handles for combatants and queue entries.
//!
//! ## Combatant layout
//!
//! Combatants live in an arena and are addressed by `CombatantId`:
//! - `0`: the player
//! - `1..`: opponent units, in spawn order
//!
//! ```
//! use ether_battle::core::{CombatantId, Side};
//!
//! assert_eq!(CombatantId::PLAYER.side(), Side::Player);
//! assert_eq!(CombatantId::opponent_unit(0), CombatantId(1));
//! assert_eq!(CombatantId(3).side(), Side::Opponent);
//! ```

use serde::{Deserialize, Serialize};

use super::side::Side;

/// Arena handle for one combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(pub u32);

impl CombatantId {
    /// The player's handle.
    pub const PLAYER: CombatantId = CombatantId(0);

    /// The primary opponent unit (the one holding the opponent's pools).
    pub const PRIMARY_OPPONENT: CombatantId = CombatantId(1);

    /// Handle for the opponent unit at `index` (0-based).
    #[must_use]
    pub const fn opponent_unit(index: u32) -> Self {
        Self(index + 1)
    }

    /// Which side this combatant fights on.
    #[must_use]
    pub const fn side(self) -> Side {
        if self.0 == 0 {
            Side::Player
        } else {
            Side::Opponent
        }
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Combatant({})", self.0)
    }
}

/// Identity of one queue entry, unique within a battle.
///
/// Duplicated entries get fresh ids, so the id of an original and its
/// clone always differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub u32);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entry({})", self.0)
    }
}

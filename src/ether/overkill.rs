//! Overkill conversion into reward tokens.
//!
//! Overkill buys "slots". The first slot costs the base threshold and each
//! further slot costs `growth` times the previous one. Rewards by slot
//! count:
//!
//! - 0: nothing
//! - 1: one random reward token, one stack
//! - 2: two distinct random reward tokens, one stack each
//! - 3+: two distinct random reward tokens sharing `slots` stacks

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::TokenId;
use crate::core::BattleRng;

/// Tokens bought with overkill.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverkillReward {
    pub slots: u32,
    pub tokens: SmallVec<[(TokenId, u32); 2]>,
}

impl OverkillReward {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Number of slots `overkill` pays for.
///
/// ```
/// use ether_battle::ether::overkill_slots;
///
/// assert_eq!(overkill_slots(79, 80, 1.1), 0);
/// assert_eq!(overkill_slots(80, 80, 1.1), 1);
/// assert_eq!(overkill_slots(168, 80, 1.1), 2);
/// assert_eq!(overkill_slots(167, 80, 1.1), 1);
/// ```
#[must_use]
pub fn overkill_slots(overkill: u32, threshold: u32, growth: f64) -> u32 {
    if threshold == 0 {
        tracing::warn!("overkill threshold is zero, conversion disabled");
        return 0;
    }
    let growth = growth.max(1.0);
    let mut remaining = f64::from(overkill);
    let mut cost = f64::from(threshold);
    let mut slots = 0;
    while remaining + 1e-9 >= cost {
        remaining -= cost;
        cost *= growth;
        slots += 1;
    }
    slots
}

/// Convert `overkill` into reward tokens drawn from `pool`.
#[must_use]
pub fn convert_overkill(
    overkill: u32,
    threshold: u32,
    growth: f64,
    pool: &[TokenId],
    rng: &mut BattleRng,
) -> OverkillReward {
    let slots = overkill_slots(overkill, threshold, growth);
    let mut reward = OverkillReward {
        slots,
        tokens: SmallVec::new(),
    };
    if slots == 0 {
        return reward;
    }
    if pool.is_empty() {
        tracing::warn!(slots, "no reward tokens defined, overkill wasted");
        return reward;
    }

    let first = pool[rng.index(pool.len())];
    if slots == 1 {
        reward.tokens.push((first, 1));
        return reward;
    }

    let (a, b) = (slots - slots / 2, slots / 2);
    if pool.len() == 1 {
        reward.tokens.push((first, a + b));
        return reward;
    }
    let mut second_index = rng.index(pool.len() - 1);
    if pool[second_index] == first {
        second_index = pool.len() - 1;
    }
    reward.tokens.push((first, a));
    reward.tokens.push((pool[second_index], b));
    reward
}

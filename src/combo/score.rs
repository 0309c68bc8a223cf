//! Hand scoring for card selection.
//!
//! `score_with_combo` has no correct value; it only defines an order over
//! candidate hands. Terms, in decreasing dominance:
//!
//! - card count: every extra card outweighs any other term
//! - combo weight x `combo_weight`
//! - mode-weighted damage / block / heal
//! - estimated ether x combo multiplier x `ether_priority`

use serde::{Deserialize, Serialize};

use crate::catalog::{CardDef, CardId, Catalog};

use super::detect::detect_combo;

/// Per-card bonus; larger than any realistic sum of the other terms.
const CARD_COUNT_BONUS: f64 = 1000.0;

const COMBO_SCALE: f64 = 10.0;

/// Largest hand searched exhaustively; extra cards are ignored.
const MAX_SEARCH_HAND: usize = 12;

/// Temperament of a card-choosing AI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AiMode {
    Aggressive,
    Defensive,
    #[default]
    Balanced,
}

impl AiMode {
    /// `(damage, block)` weights.
    #[must_use]
    pub const fn weights(self) -> (f64, f64) {
        match self {
            AiMode::Aggressive => (1.0, 0.3),
            AiMode::Defensive => (0.4, 1.0),
            AiMode::Balanced => (0.7, 0.7),
        }
    }
}

/// Knobs for `score_with_combo`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreOptions {
    pub combo_weight: f64,
    /// 0 disables the ether term.
    pub ether_priority: f64,
    /// Ether a card yields when it does not define its own.
    pub base_ether: u32,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            combo_weight: 1.0,
            ether_priority: 0.0,
            base_ether: 10,
        }
    }
}

impl ScoreOptions {
    #[must_use]
    pub fn with_combo_weight(mut self, weight: f64) -> Self {
        self.combo_weight = weight;
        self
    }

    #[must_use]
    pub fn with_ether_priority(mut self, priority: f64) -> Self {
        self.ether_priority = priority;
        self
    }

    #[must_use]
    pub fn with_base_ether(mut self, base: u32) -> Self {
        self.base_ether = base;
        self
    }
}

/// Score a candidate hand. Higher is better.
#[must_use]
pub fn score_with_combo(mode: AiMode, cards: &[&CardDef], options: &ScoreOptions) -> f64 {
    if cards.is_empty() {
        return 0.0;
    }
    let (damage_weight, block_weight) = mode.weights();

    let mut damage = 0.0;
    let mut defense = 0.0;
    let mut ether = 0.0;
    for card in cards {
        damage += f64::from(card.damage) * f64::from(card.hits);
        defense += f64::from(card.block) + f64::from(card.heal);
        ether += f64::from(card.ether_points(options.base_ether));
    }

    let combo = detect_combo(cards.iter().copied());
    let (combo_weight, combo_multiplier) = combo.map_or((0.0, 1.0), |c| (f64::from(c.score_weight), c.multiplier));

    let count_term = CARD_COUNT_BONUS * cards.len() as f64;
    let mode_term = damage * damage_weight + defense * block_weight;
    let combo_term = combo_weight * COMBO_SCALE * options.combo_weight;
    let ether_term = options.ether_priority * ether * combo_multiplier;

    count_term + mode_term + combo_term + ether_term
}

/// Pick the best-scoring subset of `hand` that fits in `action_points`.
///
/// Returns indices into `hand`, ascending. Unknown cards are never
/// picked. Ties keep the subset found first.
///
/// ```
/// use ether_battle::catalog::{standard::cards, Catalog};
/// use ether_battle::combo::{choose_hand, AiMode, ScoreOptions};
///
/// let catalog = Catalog::standard();
/// let hand = [cards::CRUSH, cards::CLAW, cards::CLAW];
///
/// // Crush costs 3 and Claw 1: with 2 points the two claws win.
/// let picked = choose_hand(&catalog, &hand, 2, AiMode::Aggressive, &ScoreOptions::default());
/// assert_eq!(picked, vec![1, 2]);
/// ```
#[must_use]
pub fn choose_hand(
    catalog: &Catalog,
    hand: &[CardId],
    action_points: u32,
    mode: AiMode,
    options: &ScoreOptions,
) -> Vec<usize> {
    if hand.len() > MAX_SEARCH_HAND {
        tracing::warn!(size = hand.len(), "hand too large to search, extra cards ignored");
    }
    let known: Vec<(usize, &CardDef)> = hand
        .iter()
        .take(MAX_SEARCH_HAND)
        .enumerate()
        .filter_map(|(i, id)| match catalog.card(*id) {
            Some(card) => Some((i, card)),
            None => {
                tracing::warn!(card = %id, "unknown card in hand");
                None
            }
        })
        .collect();

    let mut best: Vec<usize> = Vec::new();
    let mut best_score = f64::NEG_INFINITY;
    let mut picked: Vec<&CardDef> = Vec::with_capacity(known.len());

    for mask in 0u32..(1u32 << known.len()) {
        let mut cost = 0;
        picked.clear();
        for (bit, &(_, card)) in known.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                cost += card.action_cost;
                picked.push(card);
            }
        }
        if cost > action_points {
            continue;
        }
        let score = score_with_combo(mode, &picked, options);
        if score > best_score {
            best_score = score;
            best = known
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, (index, _))| *index)
                .collect();
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::standard::cards;

    fn defs<'a>(catalog: &'a Catalog, ids: &[CardId]) -> Vec<&'a CardDef> {
        ids.iter().filter_map(|id| catalog.card(*id)).collect()
    }

    #[test]
    fn test_more_cards_always_win() {
        let catalog = Catalog::standard();
        let options = ScoreOptions::default();
        let one_big = defs(&catalog, &[cards::CRUSH]);
        let two_small = defs(&catalog, &[cards::HOWL, cards::TAUNT]);

        for mode in [AiMode::Aggressive, AiMode::Defensive, AiMode::Balanced] {
            assert!(score_with_combo(mode, &two_small, &options) > score_with_combo(mode, &one_big, &options));
        }
    }

    #[test]
    fn test_mode_changes_preference() {
        let catalog = Catalog::standard();
        let options = ScoreOptions::default();
        let claw = defs(&catalog, &[cards::CLAW]);
        let hide = defs(&catalog, &[cards::HIDE]);

        assert!(score_with_combo(AiMode::Aggressive, &claw, &options) > score_with_combo(AiMode::Aggressive, &hide, &options));
        assert!(score_with_combo(AiMode::Defensive, &hide, &options) > score_with_combo(AiMode::Defensive, &claw, &options));
    }

    #[test]
    fn test_combo_weight_breaks_ties() {
        let catalog = Catalog::standard();
        let pair = defs(&catalog, &[cards::CLAW, cards::HIDE]);
        let plain = defs(&catalog, &[cards::CLAW, cards::BITE]);
        let options = ScoreOptions::default().with_combo_weight(100.0);

        assert!(score_with_combo(AiMode::Balanced, &pair, &options) > score_with_combo(AiMode::Balanced, &plain, &options));
    }

    #[test]
    fn test_ether_priority_adds() {
        let catalog = Catalog::standard();
        let hand = defs(&catalog, &[cards::SOUL_SIPHON]);
        let off = ScoreOptions::default();
        let on = ScoreOptions::default().with_ether_priority(1.0);

        let delta = score_with_combo(AiMode::Balanced, &hand, &on) - score_with_combo(AiMode::Balanced, &hand, &off);
        assert!((delta - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_choose_hand_respects_budget() {
        let catalog = Catalog::standard();
        let hand = [cards::CRUSH, cards::BITE, cards::CLAW, cards::HIDE];

        let picked = choose_hand(&catalog, &hand, 4, AiMode::Aggressive, &ScoreOptions::default());
        let cost: u32 = picked.iter().map(|&i| catalog.card(hand[i]).unwrap().action_cost).sum();

        assert!(cost <= 4);
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn test_choose_hand_skips_unknown() {
        let catalog = Catalog::standard();
        let hand = [CardId::new(999), cards::CLAW];

        assert_eq!(choose_hand(&catalog, &hand, 5, AiMode::Balanced, &ScoreOptions::default()), vec![1]);
    }

    #[test]
    fn test_choose_hand_zero_points() {
        let catalog = Catalog::standard();
        assert!(choose_hand(&catalog, &[cards::CLAW], 0, AiMode::Balanced, &ScoreOptions::default()).is_empty());
    }
}

//! Poker-style classification of the cards a side played in a turn.
//!
//! Rank is a card's `action_cost`; suit collapses to attack vs. everything
//! else. A flush needs at least four cards, all of one suit.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::CardDef;

const FLUSH_MIN_CARDS: usize = 4;

/// Combo ranking, weakest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComboKind {
    HighCard,
    Pair,
    TwoPair,
    Triple,
    Flush,
    FullHouse,
    FourOfAKind,
    FiveOfAKind,
}

impl ComboKind {
    pub const ALL: [ComboKind; 8] = [
        ComboKind::HighCard,
        ComboKind::Pair,
        ComboKind::TwoPair,
        ComboKind::Triple,
        ComboKind::Flush,
        ComboKind::FullHouse,
        ComboKind::FourOfAKind,
        ComboKind::FiveOfAKind,
    ];

    /// Integer score weight, 1 for high card up to 8.
    #[must_use]
    pub const fn score_weight(self) -> u32 {
        self as u32 + 1
    }

    /// Ether (and AI score) multiplier.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            ComboKind::HighCard => 1.0,
            ComboKind::Pair => 2.0,
            ComboKind::TwoPair => 2.5,
            ComboKind::Triple => 3.0,
            ComboKind::Flush => 3.25,
            ComboKind::FullHouse => 3.5,
            ComboKind::FourOfAKind => 4.0,
            ComboKind::FiveOfAKind => 5.0,
        }
    }
}

impl std::fmt::Display for ComboKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComboKind::HighCard => "high card",
            ComboKind::Pair => "pair",
            ComboKind::TwoPair => "two pair",
            ComboKind::Triple => "triple",
            ComboKind::Flush => "flush",
            ComboKind::FullHouse => "full house",
            ComboKind::FourOfAKind => "four of a kind",
            ComboKind::FiveOfAKind => "five of a kind",
        };
        f.write_str(name)
    }
}

/// A classified hand.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComboResult {
    pub kind: ComboKind,
    pub score_weight: u32,
    pub multiplier: f64,
}

impl From<ComboKind> for ComboResult {
    fn from(kind: ComboKind) -> Self {
        Self {
            kind,
            score_weight: kind.score_weight(),
            multiplier: kind.multiplier(),
        }
    }
}

/// Classify `cards`. `None` for an empty play.
///
/// ```
/// use ether_battle::catalog::{CardDef, CardId};
/// use ether_battle::combo::{detect_combo, ComboKind};
///
/// let a = CardDef::attack(CardId::new(1), "A", 5).with_cost(1);
/// let b = CardDef::defense(CardId::new(2), "B", 5).with_cost(1);
/// let c = CardDef::attack(CardId::new(3), "C", 5).with_cost(2);
///
/// let combo = detect_combo([&a, &b, &c]).unwrap();
/// assert_eq!(combo.kind, ComboKind::Pair);
/// assert!(detect_combo(Vec::<&CardDef>::new()).is_none());
/// ```
pub fn detect_combo<'a>(cards: impl IntoIterator<Item = &'a CardDef>) -> Option<ComboResult> {
    let mut ranks: FxHashMap<u32, u32> = FxHashMap::default();
    let mut total = 0usize;
    let mut attacks = 0usize;
    for card in cards {
        *ranks.entry(card.action_cost).or_insert(0) += 1;
        total += 1;
        if card.kind.is_attack() {
            attacks += 1;
        }
    }
    if total == 0 {
        return None;
    }

    let mut counts: Vec<u32> = ranks.into_values().collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));
    let top = counts[0];
    let second = counts.get(1).copied().unwrap_or(0);
    let flush = total >= FLUSH_MIN_CARDS && (attacks == total || attacks == 0);

    let kind = if top >= 5 {
        ComboKind::FiveOfAKind
    } else if top == 4 {
        ComboKind::FourOfAKind
    } else if top == 3 && second >= 2 {
        ComboKind::FullHouse
    } else if flush {
        ComboKind::Flush
    } else if top == 3 {
        ComboKind::Triple
    } else if top == 2 && second == 2 {
        ComboKind::TwoPair
    } else if top == 2 {
        ComboKind::Pair
    } else {
        ComboKind::HighCard
    };
    Some(kind.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CardId, CardKind};

    fn cards(hand: &[(CardKind, u32)]) -> Vec<CardDef> {
        hand.iter()
            .enumerate()
            .map(|(i, &(kind, cost))| CardDef::new(CardId::new(i as u32), "c", kind).with_cost(cost))
            .collect()
    }

    fn kind_of(hand: &[(CardKind, u32)]) -> Option<ComboKind> {
        detect_combo(&cards(hand)).map(|c| c.kind)
    }

    use CardKind::{Attack as A, Defense as D, Support as S};

    #[test]
    fn test_each_kind() {
        assert_eq!(kind_of(&[(A, 1)]), Some(ComboKind::HighCard));
        assert_eq!(kind_of(&[(A, 1), (D, 1), (A, 2)]), Some(ComboKind::Pair));
        assert_eq!(kind_of(&[(A, 1), (D, 1), (A, 2), (S, 2)]), Some(ComboKind::TwoPair));
        assert_eq!(kind_of(&[(A, 1), (D, 1), (S, 1)]), Some(ComboKind::Triple));
        assert_eq!(kind_of(&[(A, 1), (A, 2), (A, 3), (A, 1)]), Some(ComboKind::Flush));
        assert_eq!(kind_of(&[(A, 1), (D, 1), (S, 1), (A, 2), (D, 2)]), Some(ComboKind::FullHouse));
        assert_eq!(kind_of(&[(A, 2), (D, 2), (S, 2), (A, 2)]), Some(ComboKind::FourOfAKind));
        assert_eq!(kind_of(&[(A, 1), (D, 1), (S, 1), (A, 1), (A, 1)]), Some(ComboKind::FiveOfAKind));
    }

    #[test]
    fn test_non_attack_suit_flush() {
        assert_eq!(kind_of(&[(D, 1), (S, 2), (D, 3), (S, 1)]), Some(ComboKind::Flush));
        assert_eq!(kind_of(&[(D, 1), (S, 2), (A, 3), (S, 1)]), Some(ComboKind::Pair));
    }

    #[test]
    fn test_three_card_same_suit_is_not_flush() {
        assert_eq!(kind_of(&[(A, 1), (A, 2), (A, 3)]), Some(ComboKind::HighCard));
    }

    #[test]
    fn test_ranking_is_monotonic() {
        for pair in ComboKind::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].score_weight() < pair[1].score_weight());
            assert!(pair[0].multiplier() < pair[1].multiplier());
        }
    }

    #[test]
    fn test_empty() {
        assert!(detect_combo(&Vec::<CardDef>::new()).is_none());
    }
}

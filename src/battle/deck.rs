//! Draw pile, hand and discard of one side.

use serde::{Deserialize, Serialize};

use crate::catalog::{CardId, Catalog};
use crate::core::BattleRng;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    draw: Vec<CardId>,
    hand: Vec<CardId>,
    discard: Vec<CardId>,
}

impl Deck {
    /// A shuffled draw pile.
    #[must_use]
    pub fn new(mut cards: Vec<CardId>, rng: &mut BattleRng) -> Self {
        rng.shuffle(&mut cards);
        Self {
            draw: cards,
            hand: Vec::new(),
            discard: Vec::new(),
        }
    }

    #[must_use]
    pub fn hand(&self) -> &[CardId] {
        &self.hand
    }

    #[must_use]
    pub fn draw_pile(&self) -> &[CardId] {
        &self.draw
    }

    #[must_use]
    pub fn discard_pile(&self) -> &[CardId] {
        &self.discard
    }

    /// Every card this side owns.
    #[must_use]
    pub fn total(&self) -> usize {
        self.draw.len() + self.hand.len() + self.discard.len()
    }

    /// Draw until the hand holds `size` cards, reshuffling the discard
    /// into the draw pile when it runs out. Returns `(drawn, reshuffled)`.
    pub fn draw_to(&mut self, size: usize, rng: &mut BattleRng) -> (usize, bool) {
        let mut drawn = 0;
        let mut reshuffled = false;
        while self.hand.len() < size {
            if self.draw.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.draw.append(&mut self.discard);
                rng.shuffle(&mut self.draw);
                reshuffled = true;
            }
            match self.draw.pop() {
                Some(card) => {
                    self.hand.push(card);
                    drawn += 1;
                }
                None => break,
            }
        }
        (drawn, reshuffled)
    }

    /// Move the hand cards at `indices` to the discard pile and return
    /// them in index order. Invalid indices are ignored.
    pub fn play(&mut self, indices: &[usize]) -> Vec<CardId> {
        let mut sorted: Vec<usize> = indices.iter().copied().filter(|&i| i < self.hand.len()).collect();
        sorted.sort_unstable();
        sorted.dedup();

        let played: Vec<CardId> = sorted.iter().map(|&i| self.hand[i]).collect();
        for &i in sorted.iter().rev() {
            self.hand.remove(i);
        }
        self.discard.extend_from_slice(&played);
        played
    }
}

/// Drop cards the catalog does not know; an empty result falls back to
/// `fallback`.
#[must_use]
pub fn repair_deck(catalog: &Catalog, owner: &str, deck: &[CardId], fallback: &[CardId]) -> Vec<CardId> {
    let repaired: Vec<CardId> = deck
        .iter()
        .copied()
        .filter(|id| {
            let known = catalog.card(*id).is_some();
            if !known {
                tracing::warn!(owner, card = %id, "unknown card removed from deck");
            }
            known
        })
        .collect();
    if repaired.is_empty() {
        tracing::warn!(owner, "deck has no playable cards, using fallback");
        return fallback.to_vec();
    }
    repaired
}

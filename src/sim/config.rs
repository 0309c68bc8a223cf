//! Simulator configuration.

use serde::{Deserialize, Serialize};

use crate::catalog::CardId;
use crate::combat::Stats;
use crate::core::BattleConfig;

/// Settings for a batch of simulated battles.
///
/// ```
/// use ether_battle::sim::SimConfig;
///
/// let config = SimConfig::default().with_battles(200).with_seed_offset(7);
/// assert_eq!(config.battles, 200);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Battles per batch.
    pub battles: u32,

    /// Battle `i` is seeded with `seed_offset + i`.
    pub seed_offset: u64,

    /// A card is flagged when its win rate beats the overall rate by more
    /// than this.
    pub overpowered_threshold: f64,

    /// Battles a card must appear in before it can be flagged.
    pub min_card_samples: u32,

    /// Win-rate delta that flags a swept stat value.
    pub sweep_threshold: f64,

    pub player_stats: Stats,

    /// Empty means the catalog's starter deck.
    pub player_deck: Vec<CardId>,

    pub battle: BattleConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            battles: 1000,
            seed_offset: 0,
            overpowered_threshold: 0.15,
            min_card_samples: 20,
            sweep_threshold: 0.1,
            player_stats: Stats::default(),
            player_deck: Vec::new(),
            battle: BattleConfig::default(),
        }
    }
}

impl SimConfig {
    #[must_use]
    pub fn with_battles(mut self, battles: u32) -> Self {
        self.battles = battles;
        self
    }

    #[must_use]
    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    #[must_use]
    pub fn with_overpowered_threshold(mut self, threshold: f64, min_samples: u32) -> Self {
        self.overpowered_threshold = threshold;
        self.min_card_samples = min_samples;
        self
    }

    #[must_use]
    pub fn with_sweep_threshold(mut self, threshold: f64) -> Self {
        self.sweep_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_player_stats(mut self, stats: Stats) -> Self {
        self.player_stats = stats;
        self
    }

    #[must_use]
    pub fn with_player_deck(mut self, deck: Vec<CardId>) -> Self {
        self.player_deck = deck;
        self
    }

    #[must_use]
    pub fn with_battle(mut self, battle: BattleConfig) -> Self {
        self.battle = battle;
        self
    }
}

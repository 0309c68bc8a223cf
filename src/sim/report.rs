//! Aggregated simulator statistics.

use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::{BattleResult, Winner};
use crate::catalog::{CardId, Catalog};
use crate::combat::Stats;

/// Per-card numbers across a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardStats {
    pub card: CardId,
    pub name: String,
    /// Battles in which the player played the card at least once.
    pub battles_played: u32,
    pub wins_when_played: u32,
    /// Times played across all battles.
    pub total_plays: u32,
}

impl CardStats {
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.battles_played == 0 {
            0.0
        } else {
            f64::from(self.wins_when_played) / f64::from(self.battles_played)
        }
    }
}

/// Result of one batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimReport {
    pub encounter: String,
    pub battles: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub avg_turns: f64,
    pub avg_damage_dealt: f64,
    pub avg_damage_taken: f64,
    /// Sorted by card id.
    pub cards: Vec<CardStats>,
    pub overpowered: Vec<CardId>,
    /// The stop flag ended the batch early.
    pub stopped: bool,
}

impl SimReport {
    /// Fold battle summaries into a report.
    ///
    /// A card is overpowered when it appeared in at least `min_samples`
    /// battles and its win rate exceeds the overall one by more than
    /// `threshold`.
    #[must_use]
    pub fn from_results(
        catalog: &Catalog,
        encounter: impl Into<String>,
        results: &[BattleResult],
        threshold: f64,
        min_samples: u32,
    ) -> Self {
        let mut report = SimReport {
            encounter: encounter.into(),
            battles: results.len() as u32,
            ..SimReport::default()
        };
        if results.is_empty() {
            return report;
        }

        let mut cards: FxHashMap<CardId, CardStats> = FxHashMap::default();
        let (mut turns, mut dealt, mut taken) = (0u64, 0u64, 0u64);
        for result in results {
            match result.winner {
                Winner::Player => report.wins += 1,
                Winner::Opponent => report.losses += 1,
                Winner::Draw => report.draws += 1,
            }
            turns += u64::from(result.turns);
            dealt += result.damage_dealt;
            taken += result.damage_taken;

            for (&card, &plays) in &result.card_usage {
                if plays == 0 {
                    continue;
                }
                let stats = cards.entry(card).or_insert_with(|| CardStats {
                    card,
                    name: catalog.card(card).map_or_else(|| card.to_string(), |c| c.name.clone()),
                    battles_played: 0,
                    wins_when_played: 0,
                    total_plays: 0,
                });
                stats.battles_played += 1;
                stats.total_plays += plays;
                if result.player_won() {
                    stats.wins_when_played += 1;
                }
            }
        }

        let n = results.len() as f64;
        report.avg_turns = turns as f64 / n;
        report.avg_damage_dealt = dealt as f64 / n;
        report.avg_damage_taken = taken as f64 / n;

        let overall = report.win_rate();
        let mut cards: Vec<CardStats> = cards.into_values().collect();
        cards.sort_by_key(|stats| stats.card);
        report.overpowered = cards
            .iter()
            .filter(|stats| stats.battles_played >= min_samples && stats.win_rate() - overall > threshold)
            .map(|stats| stats.card)
            .collect();
        report.cards = cards;
        report
    }

    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.battles == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.battles)
        }
    }

    #[must_use]
    pub fn card(&self, card: CardId) -> Option<&CardStats> {
        self.cards.iter().find(|stats| stats.card == card)
    }
}

/// Player stat a sweep overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    Strength,
    Agility,
    Insight,
}

impl StatKind {
    /// `stats` with this stat replaced by `value`.
    #[must_use]
    pub fn apply(self, mut stats: Stats, value: i32) -> Stats {
        match self {
            StatKind::Strength => stats.strength = value,
            StatKind::Agility => stats.agility = value,
            StatKind::Insight => stats.insight = value,
        }
        stats
    }
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StatKind::Strength => "strength",
            StatKind::Agility => "agility",
            StatKind::Insight => "insight",
        };
        f.write_str(name)
    }
}

impl FromStr for StatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strength" | "str" => Ok(StatKind::Strength),
            "agility" | "agi" => Ok(StatKind::Agility),
            "insight" | "ins" => Ok(StatKind::Insight),
            other => Err(format!("unknown stat {other:?} (expected strength, agility or insight)")),
        }
    }
}

/// One swept value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub value: i32,
    pub win_rate: f64,
    /// Difference from the baseline win rate.
    pub delta: f64,
    pub flagged: bool,
}

/// Win rate as one player stat varies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub stat: StatKind,
    pub baseline_win_rate: f64,
    pub points: Vec<SweepPoint>,
}

impl SweepReport {
    pub fn flagged(&self) -> impl Iterator<Item = &SweepPoint> {
        self.points.iter().filter(|point| point.flagged)
    }
}

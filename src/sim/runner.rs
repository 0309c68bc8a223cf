//! Parallel batch runner.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::battle::{Battle, BattleResult, ComboPolicy};
use crate::catalog::{Catalog, CatalogError, EnemyDef};
use crate::core::BattleRng;

use super::config::SimConfig;
use super::report::{SimReport, StatKind, SweepPoint, SweepReport};

/// Replays many independent battles against one encounter.
///
/// Every battle gets its own `BattleRng` seeded `seed_offset + i` and a
/// shared read-only catalog, so a batch is reproducible regardless of
/// how rayon schedules it.
///
/// ```
/// use std::sync::Arc;
/// use ether_battle::catalog::Catalog;
/// use ether_battle::sim::{BalanceSimulator, SimConfig};
///
/// let sim = BalanceSimulator::new(Arc::new(Catalog::standard()), SimConfig::default().with_battles(8));
/// let goblin = sim.encounter("Goblin").unwrap();
/// let report = sim.run(&goblin);
/// assert_eq!(report.wins + report.losses + report.draws, 8);
/// ```
#[derive(Clone, Debug)]
pub struct BalanceSimulator {
    catalog: Arc<Catalog>,
    config: SimConfig,
    stop: Option<Arc<AtomicBool>>,
}

impl BalanceSimulator {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: SimConfig) -> Self {
        Self {
            catalog,
            config,
            stop: None,
        }
    }

    /// Battles not yet started when `stop` turns true are skipped.
    #[must_use]
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Look up an encounter by name.
    pub fn encounter(&self, name: &str) -> Result<EnemyDef, CatalogError> {
        self.catalog
            .enemy_by_name(name)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownEnemy(name.to_string()))
    }

    /// Run the configured number of battles against `enemy`.
    #[must_use]
    pub fn run(&self, enemy: &EnemyDef) -> SimReport {
        run_batch(&self.catalog, &self.config, self.stop.as_deref(), enemy)
    }

    /// One battle of the batch, by index.
    #[must_use]
    pub fn run_battle(&self, enemy: &EnemyDef, index: u32) -> BattleResult {
        play_one(&self.catalog, &self.config, enemy, index)
    }

    /// Rerun the batch once per value with `stat` overridden and compare
    /// each win rate to the unmodified baseline.
    #[must_use]
    pub fn sweep_stat(&self, enemy: &EnemyDef, stat: StatKind, values: &[i32]) -> SweepReport {
        let stop = self.stop.as_deref();
        let baseline = run_batch(&self.catalog, &self.config, stop, enemy).win_rate();

        let points = values
            .iter()
            .map(|&value| {
                let mut config = self.config.clone();
                config.player_stats = stat.apply(config.player_stats, value);
                let win_rate = run_batch(&self.catalog, &config, stop, enemy).win_rate();
                let delta = win_rate - baseline;
                SweepPoint {
                    value,
                    win_rate,
                    delta,
                    flagged: delta.abs() > self.config.sweep_threshold,
                }
            })
            .collect();

        let report = SweepReport {
            stat,
            baseline_win_rate: baseline,
            points,
        };
        tracing::info!(
            stat = %stat,
            baseline,
            flagged = report.flagged().count(),
            "stat sweep finished"
        );
        report
    }
}

fn run_batch(catalog: &Arc<Catalog>, config: &SimConfig, stop: Option<&AtomicBool>, enemy: &EnemyDef) -> SimReport {
    let stopped = || stop.is_some_and(|flag| flag.load(Ordering::Relaxed));

    let results: Vec<BattleResult> = (0..config.battles)
        .into_par_iter()
        .filter_map(|index| (!stopped()).then(|| play_one(catalog, config, enemy, index)))
        .collect();

    let mut report = SimReport::from_results(
        catalog,
        enemy.name.clone(),
        &results,
        config.overpowered_threshold,
        config.min_card_samples,
    );
    report.stopped = report.battles < config.battles;

    tracing::info!(
        encounter = %enemy.name,
        battles = report.battles,
        win_rate = report.win_rate(),
        avg_turns = report.avg_turns,
        overpowered = report.overpowered.len(),
        stopped = report.stopped,
        "simulation batch finished"
    );
    report
}

fn play_one(catalog: &Arc<Catalog>, config: &SimConfig, enemy: &EnemyDef, index: u32) -> BattleResult {
    let rng = BattleRng::new(config.seed_offset.wrapping_add(u64::from(index)));
    let mut battle = Battle::new(Arc::clone(catalog), enemy, config.battle.clone(), rng)
        .with_player_stats(config.player_stats);
    if !config.player_deck.is_empty() {
        battle = battle.with_player_deck(&config.player_deck);
    }
    battle.run(&mut ComboPolicy::player(), &mut ComboPolicy::new(enemy.ai_mode))
}

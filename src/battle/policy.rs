//! Card-choosing policies.
//!
//! A policy sees a `BattleView` of its side and returns indices into its
//! hand. The driver enforces the action-point budget, so a policy that
//! over-commits simply loses the cards that do not fit.

use crate::catalog::{CardId, Catalog};
use crate::combat::Combatants;
use crate::combo::{choose_hand, AiMode, ScoreOptions};
use crate::core::{BattleRng, Side};
use crate::ether::EtherState;

/// What a side can see when choosing cards.
#[derive(Clone, Copy, Debug)]
pub struct BattleView<'a> {
    pub side: Side,
    pub turn: u32,
    pub hand: &'a [CardId],
    pub action_points: u32,
    pub catalog: &'a Catalog,
    pub combatants: &'a Combatants,
    pub ether: &'a EtherState,
    /// The other side's committed cards, when insight reveals them.
    pub revealed: Option<&'a [CardId]>,
}

impl BattleView<'_> {
    /// Total attack damage in the revealed cards.
    #[must_use]
    pub fn revealed_damage(&self) -> i32 {
        self.revealed
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.catalog.card(*id))
            .filter(|card| card.kind.is_attack())
            .map(|card| card.damage.saturating_mul(card.hits as i32))
            .sum()
    }
}

/// Chooses which hand cards to play this turn.
pub trait CardPolicy: Send {
    /// Indices into `view.hand`.
    fn choose(&mut self, view: &BattleView<'_>) -> Vec<usize>;
}

/// Best-scoring hand under the action budget.
///
/// With `react_to_reveal`, a revealed attack worth at least half the
/// player's hp switches the policy to defensive scoring for that turn.
#[derive(Clone, Debug, Default)]
pub struct ComboPolicy {
    pub mode: AiMode,
    pub options: ScoreOptions,
    pub react_to_reveal: bool,
}

impl ComboPolicy {
    #[must_use]
    pub fn new(mode: AiMode) -> Self {
        Self {
            mode,
            options: ScoreOptions::default(),
            react_to_reveal: false,
        }
    }

    /// Balanced policy that reads revealed intent.
    #[must_use]
    pub fn player() -> Self {
        Self::new(AiMode::Balanced).with_reaction(true)
    }

    #[must_use]
    pub fn with_options(mut self, options: ScoreOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_reaction(mut self, react: bool) -> Self {
        self.react_to_reveal = react;
        self
    }

    fn mode_for(&self, view: &BattleView<'_>) -> AiMode {
        if !self.react_to_reveal || view.revealed.is_none() {
            return self.mode;
        }
        let own_hp = match view.side {
            Side::Player => view.combatants.player().hp,
            Side::Opponent => view.combatants.living_opponents().map(|c| c.hp).sum(),
        };
        if view.revealed_damage() * 2 >= own_hp {
            AiMode::Defensive
        } else {
            self.mode
        }
    }
}

impl CardPolicy for ComboPolicy {
    fn choose(&mut self, view: &BattleView<'_>) -> Vec<usize> {
        let mode = self.mode_for(view);
        choose_hand(view.catalog, view.hand, view.action_points, mode, &self.options)
    }
}

/// Plays random affordable cards, from its own seeded generator.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    rng: BattleRng,
}

impl RandomPolicy {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: BattleRng::new(seed),
        }
    }
}

impl CardPolicy for RandomPolicy {
    fn choose(&mut self, view: &BattleView<'_>) -> Vec<usize> {
        let mut order: Vec<usize> = (0..view.hand.len()).collect();
        self.rng.shuffle(&mut order);

        let mut budget = view.action_points;
        let mut picked = Vec::new();
        for index in order {
            let Some(card) = view.catalog.card(view.hand[index]) else {
                continue;
            };
            if card.action_cost <= budget {
                budget -= card.action_cost;
                picked.push(index);
            }
        }
        picked.sort_unstable();
        picked
    }
}

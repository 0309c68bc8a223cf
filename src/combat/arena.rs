//! Arena of combatants addressed by `CombatantId`.
//!
//! Slot 0 is always the player; opponent units follow in spawn order.
//! Defeated units keep their slot so handles never go stale.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, EnemyDef, TokenId};
use crate::core::{CombatantId, Side};
use crate::tokens::{TimelinePoint, TokenEvent, TokenLedger};

use super::state::{CombatantState, Stats};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Combatants {
    units: Vec<CombatantState>,
}

impl Combatants {
    /// An arena holding only the player.
    #[must_use]
    pub fn new(player_max_hp: i32, player_stats: Stats) -> Self {
        Self {
            units: vec![CombatantState::new(CombatantId::PLAYER, "Player", player_max_hp, player_stats)],
        }
    }

    /// Player plus every unit of an encounter.
    #[must_use]
    pub fn for_encounter(player_max_hp: i32, player_stats: Stats, enemy: &EnemyDef) -> Self {
        let mut arena = Self::new(player_max_hp, player_stats);
        for unit in &enemy.units {
            arena.spawn(unit.name.clone(), unit.hp, unit.stats);
        }
        arena
    }

    /// Add an opponent unit and return its handle.
    pub fn spawn(&mut self, name: impl Into<String>, max_hp: i32, stats: Stats) -> CombatantId {
        let id = CombatantId(self.units.len() as u32);
        self.units.push(CombatantState::new(id, name, max_hp, stats));
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&CombatantState> {
        self.units.get(id.raw() as usize)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut CombatantState> {
        self.units.get_mut(id.raw() as usize)
    }

    #[must_use]
    pub fn player(&self) -> &CombatantState {
        &self.units[0]
    }

    pub fn player_mut(&mut self) -> &mut CombatantState {
        &mut self.units[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatantState> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CombatantState> {
        self.units.iter_mut()
    }

    /// Every combatant of `side`, dead or alive.
    pub fn on_side(&self, side: Side) -> impl Iterator<Item = &CombatantState> {
        self.units.iter().filter(move |c| c.side() == side)
    }

    /// Living opponent units, in spawn order.
    pub fn living_opponents(&self) -> impl Iterator<Item = &CombatantState> {
        self.on_side(Side::Opponent).filter(|c| c.is_alive())
    }

    /// The opponent unit player attacks aim at: the first one still standing.
    #[must_use]
    pub fn front_opponent(&self) -> Option<CombatantId> {
        self.living_opponents().next().map(|c| c.id)
    }

    #[must_use]
    pub fn all_opponents_down(&self) -> bool {
        self.living_opponents().next().is_none()
    }

    /// Summed hp of every opponent unit.
    #[must_use]
    pub fn opponent_hp(&self) -> i32 {
        self.on_side(Side::Opponent).map(|c| c.hp).sum()
    }

    /// Mutable access to two distinct combatants at once.
    pub fn pair_mut(
        &mut self,
        a: CombatantId,
        b: CombatantId,
    ) -> Option<(&mut CombatantState, &mut CombatantState)> {
        let (ia, ib) = (a.raw() as usize, b.raw() as usize);
        if ia == ib || ia >= self.units.len() || ib >= self.units.len() {
            return None;
        }
        if ia < ib {
            let (left, right) = self.units.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.units.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    /// Ledger of `id`, or an empty ledger when there is no such combatant.
    #[must_use]
    pub fn tokens(&self, id: CombatantId) -> TokenLedger {
        match self.get(id) {
            Some(unit) => unit.tokens.clone(),
            None => {
                tracing::warn!(combatant = %id, "no such combatant, returning empty ledger");
                TokenLedger::new()
            }
        }
    }

    /// Add tokens to `id`. A missing combatant is a logged no-op.
    pub fn add_token(
        &mut self,
        catalog: &Catalog,
        id: CombatantId,
        token: TokenId,
        stacks: u32,
        granted_at: Option<TimelinePoint>,
    ) -> Vec<TokenEvent> {
        match self.get_mut(id) {
            Some(unit) => unit.tokens.add(catalog, token, stacks, granted_at),
            None => {
                tracing::warn!(combatant = %id, token = %token, "no such combatant, token add ignored");
                Vec::new()
            }
        }
    }
}

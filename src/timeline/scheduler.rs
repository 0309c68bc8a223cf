//! The turn's action queue.
//!
//! Each side accumulates its own running speed total (`sp`); the two
//! sub-timelines are merged into one queue ordered by `sp`, player first
//! on ties. Resolution walks the queue front to back. Everything at or
//! before the executing index is history and is never touched again;
//! rewrites only ever re-sort the unresolved suffix.

use serde::{Deserialize, Serialize};

use crate::catalog::{CardTrait, Catalog};
use crate::core::{EntryId, Side, SideMap};

use super::entry::{apply_agility, PlannedCard, QueueEntry, TimelineChanges};

/// Ordered queue of one turn's entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    entries: Vec<QueueEntry>,
    next_id: u32,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the queue for both sides' planned cards.
    ///
    /// Unknown cards are skipped with a warning.
    ///
    /// ```
    /// use ether_battle::catalog::{standard::cards, Catalog};
    /// use ether_battle::core::{CombatantId, Side, SideMap};
    /// use ether_battle::timeline::{PlannedCard, Timeline};
    ///
    /// let catalog = Catalog::standard();
    /// let planned = SideMap::from_pair(
    ///     vec![PlannedCard::new(CombatantId::PLAYER, cards::SLASH)],
    ///     vec![PlannedCard::new(CombatantId(1), cards::CLAW)],
    /// );
    /// let timeline = Timeline::schedule(&catalog, &planned, &SideMap::with_value(0));
    ///
    /// assert_eq!(timeline.len(), 2);
    /// assert_eq!(timeline.get(0).map(|e| e.side), Some(Side::Player));
    /// ```
    #[must_use]
    pub fn schedule(catalog: &Catalog, planned: &SideMap<Vec<PlannedCard>>, agility: &SideMap<i32>) -> Self {
        let mut timeline = Self::new();
        for side in Side::BOTH {
            let mut sp: i32 = 0;
            for plan in &planned[side] {
                let Some(card) = catalog.card(plan.card) else {
                    tracing::warn!(card = %plan.card, side = %side, "unknown card left off the timeline");
                    continue;
                };
                let cost = apply_agility(card.speed_cost, agility[side]);
                sp = sp.saturating_add(cost);
                timeline.push(side, *plan, cost, sp, false);
            }
        }
        timeline.sort_from(0);
        timeline.mark_adjacency(0);
        tracing::debug!(entries = timeline.len(), "timeline scheduled");
        timeline
    }

    fn push(&mut self, side: Side, plan: PlannedCard, speed_cost: i32, sp: i32, duplicated: bool) {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(QueueEntry {
            id,
            side,
            actor: plan.actor,
            card: plan.card,
            speed_cost,
            sp,
            duplicated,
            crossed: false,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&QueueEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First index still open to rewrites when `current` is executing.
    #[must_use]
    fn unresolved_start(&self, current: Option<usize>) -> usize {
        current.map_or(0, |c| c.saturating_add(1)).min(self.entries.len())
    }

    /// Entries after `current`.
    #[must_use]
    pub fn unresolved(&self, current: Option<usize>) -> &[QueueEntry] {
        &self.entries[self.unresolved_start(current)..]
    }

    /// No later entry of the same side follows `index`.
    #[must_use]
    pub fn is_last_for_side(&self, index: usize) -> bool {
        match self.entries.get(index) {
            Some(entry) => !self.entries[index + 1..].iter().any(|e| e.side == entry.side),
            None => false,
        }
    }

    /// Shift unresolved entries. Positions clamp at 0.
    ///
    /// Returns `false`, leaving the queue untouched, when every delta is
    /// zero or nothing is left to shift.
    pub fn apply_timeline_changes(&mut self, current: Option<usize>, changes: TimelineChanges) -> bool {
        if changes.is_noop() || self.entries.is_empty() {
            return false;
        }
        let start = self.unresolved_start(current);
        if start >= self.entries.len() {
            return false;
        }

        let suffix = &mut self.entries[start..];
        for entry in suffix.iter_mut() {
            entry.sp = match entry.side {
                Side::Player => entry.sp.saturating_sub(changes.advance_player),
                Side::Opponent => entry.sp.saturating_add(changes.push_enemy),
            }
            .max(0);
        }
        if changes.push_last_enemy != 0 {
            if let Some(last) = suffix.iter_mut().rev().find(|e| e.side == Side::Opponent) {
                last.sp = last.sp.saturating_add(changes.push_last_enemy).max(0);
            }
        }

        self.sort_from(start);
        self.mark_adjacency(start);
        tracing::debug!(?changes, from = start, "timeline shifted");
        true
    }

    /// Add entries at explicit positions after `after`.
    ///
    /// Each entry's side is its actor's side, and its speed cost is
    /// adjusted by that side's agility. Returns how many were added.
    pub fn insert_cards(
        &mut self,
        catalog: &Catalog,
        after: Option<usize>,
        agility: &SideMap<i32>,
        cards: impl IntoIterator<Item = (PlannedCard, i32)>,
    ) -> usize {
        let start = self.unresolved_start(after);
        let before = self.entries.len();
        for (plan, sp) in cards {
            let Some(card) = catalog.card(plan.card) else {
                tracing::warn!(card = %plan.card, "unknown card not inserted");
                continue;
            };
            let side = plan.actor.side();
            let cost = apply_agility(card.speed_cost, agility[side]);
            self.push(side, plan, cost, sp.max(0), false);
        }
        let added = self.entries.len() - before;
        if added > 0 {
            self.sort_from(start);
            self.mark_adjacency(start);
        }
        added
    }

    /// Echo every unresolved, not-yet-echoed player entry after `current`.
    ///
    /// Echoes are placed past the current maximum position in their
    /// originals' order, so they always run after every original.
    pub fn duplicate_player_cards(&mut self, current: Option<usize>) -> usize {
        let start = self.unresolved_start(current);
        let originals: Vec<QueueEntry> = self.entries[start..]
            .iter()
            .filter(|e| e.side == Side::Player && !e.duplicated)
            .copied()
            .collect();
        if originals.is_empty() {
            return 0;
        }

        let max_sp = self.entries.iter().map(|e| e.sp).max().unwrap_or(0);
        for (offset, original) in (1..).zip(&originals) {
            let plan = PlannedCard::new(original.actor, original.card);
            self.push(Side::Player, plan, original.speed_cost, max_sp.saturating_add(offset), true);
        }
        self.sort_from(start);
        self.mark_adjacency(start);
        tracing::debug!(count = originals.len(), "player entries echoed");
        originals.len()
    }

    /// Remove every unresolved player entry with `DestroyOnCollision` that
    /// shares its exact position with an unresolved opponent entry, along
    /// with that opponent entry. Returns the destroyed pairs.
    pub fn resolve_collisions(&mut self, catalog: &Catalog, current: Option<usize>) -> Vec<(QueueEntry, QueueEntry)> {
        let start = self.unresolved_start(current);
        let mut doomed: Vec<usize> = Vec::new();
        let mut pairs = Vec::new();

        for i in start..self.entries.len() {
            let entry = self.entries[i];
            if entry.side != Side::Player {
                continue;
            }
            let destroys = catalog
                .card(entry.card)
                .is_some_and(|card| card.has_trait(CardTrait::DestroyOnCollision));
            if !destroys {
                continue;
            }
            let partner = (start..self.entries.len()).find(|&j| {
                let other = &self.entries[j];
                other.side == Side::Opponent && other.sp == entry.sp && !doomed.contains(&j)
            });
            if let Some(j) = partner {
                doomed.push(i);
                doomed.push(j);
                pairs.push((entry, self.entries[j]));
            }
        }

        if pairs.is_empty() {
            return pairs;
        }
        let mut index = 0;
        self.entries.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
        self.mark_adjacency(start);
        tracing::debug!(collisions = pairs.len(), "colliding entries destroyed");
        pairs
    }

    fn sort_from(&mut self, start: usize) {
        self.entries[start..].sort_by(|a, b| a.sp.cmp(&b.sp).then(a.side.cmp(&b.side)));
    }

    fn mark_adjacency(&mut self, start: usize) {
        let flags: Vec<bool> = self.entries[start..]
            .iter()
            .map(|entry| {
                self.entries[start..]
                    .iter()
                    .any(|other| other.side != entry.side && other.sp == entry.sp)
            })
            .collect();
        for (entry, crossed) in self.entries[start..].iter_mut().zip(flags) {
            entry.crossed = crossed;
        }
    }
}

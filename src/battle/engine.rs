//! The turn driver.
//!
//! ## Turn structure
//!
//! 1. Both sides draw to hand size
//! 2. The opponent may spend grace on its ability
//! 3. The opponent commits cards, then the player (seeing them with insight)
//! 4. Timeline scheduled, collisions removed
//! 5. Entries resolve front to back; card traits rewrite the unresolved
//!    suffix and anchored tokens expire as the timeline passes them
//! 6. Combos detected, ether settled, overkill converted to player tokens
//! 7. Turn tokens cleared, block reset (unless configured to persist)
//!
//! A battle is single-threaded and owns everything it mutates; only the
//! catalog is shared.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::catalog::{CardDef, CardId, CardTrait, Catalog, EnemyDef, TokenEffect, TokenId};
use crate::combat::{apply_action, BattleContext, Combatants, Stats};
use crate::combo::{detect_combo, DeflationTracker};
use crate::core::{BattleConfig, BattleEvent, BattleRng, CombatantId, Side, SideMap, Winner};
use crate::ether::{convert_overkill, transfer, EtherState, GraceAbility, TransferInput};
use crate::timeline::{PlannedCard, QueueEntry, Timeline, TimelineChanges};
use crate::tokens::{TimelinePoint, TokenEvent};

use super::deck::{repair_deck, Deck};
use super::policy::{BattleView, CardPolicy};
use super::result::BattleResult;

/// One battle between the player and an encounter.
///
/// ```
/// use std::sync::Arc;
/// use ether_battle::battle::{Battle, ComboPolicy};
/// use ether_battle::catalog::{standard::enemies, Catalog};
/// use ether_battle::core::{BattleConfig, BattleRng};
///
/// let catalog = Arc::new(Catalog::standard());
/// let goblin = catalog.enemy(enemies::GOBLIN).unwrap().clone();
/// let mut battle = Battle::new(catalog, &goblin, BattleConfig::default(), BattleRng::new(42));
///
/// let result = battle.run(&mut ComboPolicy::player(), &mut ComboPolicy::new(goblin.ai_mode));
/// assert!(result.turns >= 1);
/// ```
#[derive(Clone, Debug)]
pub struct Battle {
    catalog: Arc<Catalog>,
    config: BattleConfig,
    grace_ability: Option<GraceAbility>,
    enemy_soul: u32,
    combatants: Combatants,
    decks: SideMap<Deck>,
    ether: EtherState,
    deflation: SideMap<DeflationTracker>,
    rng: BattleRng,
    turn: u32,
    log: im::Vector<BattleEvent>,
    fallen: SmallVec<[CombatantId; 4]>,
    damage_dealt: u64,
    damage_taken: u64,
    card_usage: FxHashMap<CardId, u32>,
    winner: Option<Winner>,
}

impl Battle {
    /// Set up a battle against `enemy` with the catalog's starter deck.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, enemy: &EnemyDef, config: BattleConfig, mut rng: BattleRng) -> Self {
        let combatants = Combatants::for_encounter(config.player_max_hp, Stats::default(), enemy);
        let player_deck = repair_deck(&catalog, "player", catalog.starter_deck(), &[]);
        let enemy_deck = repair_deck(&catalog, &enemy.name, &enemy.deck, &[]);
        let decks = SideMap::from_pair(Deck::new(player_deck, &mut rng), Deck::new(enemy_deck, &mut rng));
        let deflation = SideMap::new(|_| DeflationTracker::new(config.deflation_rate, config.deflation_floor));

        Self {
            catalog,
            grace_ability: enemy.grace_ability,
            enemy_soul: enemy.soul,
            combatants,
            decks,
            ether: EtherState::new(enemy.soul),
            deflation,
            rng,
            turn: 0,
            log: im::Vector::new(),
            fallen: SmallVec::new(),
            damage_dealt: 0,
            damage_taken: 0,
            card_usage: FxHashMap::default(),
            winner: None,
            config,
        }
    }

    #[must_use]
    pub fn with_player_stats(mut self, stats: Stats) -> Self {
        self.combatants.player_mut().stats = stats;
        self
    }

    /// Replace the player's deck. Unknown cards are dropped; an empty
    /// result keeps the starter deck.
    #[must_use]
    pub fn with_player_deck(mut self, deck: &[CardId]) -> Self {
        let deck = repair_deck(&self.catalog, "player", deck, self.catalog.starter_deck());
        self.decks[Side::Player] = Deck::new(deck, &mut self.rng);
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn combatants(&self) -> &Combatants {
        &self.combatants
    }

    /// Direct state access for debug tooling.
    pub fn combatants_mut(&mut self) -> &mut Combatants {
        &mut self.combatants
    }

    #[must_use]
    pub fn ether(&self) -> &EtherState {
        &self.ether
    }

    /// Direct pool access for debug tooling.
    pub fn ether_mut(&mut self) -> &mut EtherState {
        &mut self.ether
    }

    #[must_use]
    pub fn deck(&self, side: Side) -> &Deck {
        &self.decks[side]
    }

    /// Every event so far. Cloning the vector is O(1).
    #[must_use]
    pub fn events(&self) -> &im::Vector<BattleEvent> {
        &self.log
    }

    #[must_use]
    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Add tokens through the normal ledger rules.
    pub fn inject_tokens(&mut self, target: CombatantId, token: TokenId, stacks: u32) -> Vec<TokenEvent> {
        let events = self.combatants.add_token(&self.catalog, target, token, stacks, None);
        self.emit_all(BattleEvent::tokens(target, events.clone()));
        events
    }

    /// End the battle immediately.
    pub fn force_outcome(&mut self, winner: Winner) {
        if self.winner.is_none() {
            self.finish(winner);
        }
    }

    /// Play turns until the battle ends.
    pub fn run(&mut self, player: &mut dyn CardPolicy, opponent: &mut dyn CardPolicy) -> BattleResult {
        while self.winner.is_none() {
            self.play_turn(player, opponent);
        }
        self.result()
    }

    /// Summary so far. An unfinished battle reports a draw.
    #[must_use]
    pub fn result(&self) -> BattleResult {
        BattleResult {
            winner: self.winner.unwrap_or(Winner::Draw),
            turns: self.turn,
            damage_dealt: self.damage_dealt,
            damage_taken: self.damage_taken,
            card_usage: self.card_usage.clone(),
            final_soul: self.ether.soul,
        }
    }

    /// Play one full turn. Returns the winner once the battle is decided.
    pub fn play_turn(&mut self, player: &mut dyn CardPolicy, opponent: &mut dyn CardPolicy) -> Option<Winner> {
        if self.winner.is_some() {
            return self.winner;
        }
        self.turn += 1;
        self.emit(BattleEvent::TurnStarted { turn: self.turn });

        for side in Side::BOTH {
            let (count, reshuffled) = self.decks[side].draw_to(self.config.hand_size, &mut self.rng);
            self.emit(BattleEvent::CardsDrawn {
                side,
                count,
                reshuffled,
            });
        }

        self.use_grace_ability();

        let opponent_picks = opponent.choose(&self.view(Side::Opponent, None));
        let opponent_cards = self.commit(Side::Opponent, &opponent_picks);
        let revealed = (self.combatants.player().stats.insight > 0).then_some(opponent_cards.as_slice());
        let player_picks = player.choose(&self.view(Side::Player, revealed));
        let player_cards = self.commit(Side::Player, &player_picks);

        for card in &player_cards {
            *self.card_usage.entry(*card).or_insert(0) += 1;
        }
        let played = SideMap::from_pair(player_cards, opponent_cards);

        let mut timeline = self.schedule(&played);
        self.resolve_timeline(&mut timeline, &played);
        self.settle_ether(&played);
        self.end_turn_cleanup();

        if let Some(winner) = self.decide() {
            self.finish(winner);
        }
        self.winner
    }

    fn view<'a>(&'a self, side: Side, revealed: Option<&'a [CardId]>) -> BattleView<'a> {
        BattleView {
            side,
            turn: self.turn,
            hand: self.decks[side].hand(),
            action_points: self.config.action_points,
            catalog: &self.catalog,
            combatants: &self.combatants,
            ether: &self.ether,
            revealed,
        }
    }

    /// Keep the picks that are valid and fit the action budget, in hand
    /// order, and move them out of the hand.
    fn commit(&mut self, side: Side, picks: &[usize]) -> Vec<CardId> {
        let hand = self.decks[side].hand();
        let mut sorted: Vec<usize> = picks.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut budget = self.config.action_points;
        let mut legal = Vec::with_capacity(sorted.len());
        for index in sorted {
            let Some(&id) = hand.get(index) else {
                tracing::warn!(side = %side, index, "pick outside the hand ignored");
                continue;
            };
            let Some(card) = self.catalog.card(id) else {
                tracing::warn!(side = %side, card = %id, "unknown card in hand ignored");
                continue;
            };
            if card.action_cost > budget {
                tracing::warn!(side = %side, card = %id, budget, "pick over the action budget dropped");
                continue;
            }
            budget -= card.action_cost;
            legal.push(index);
        }
        self.decks[side].play(&legal)
    }

    fn use_grace_ability(&mut self) {
        let Some(ability) = self.grace_ability else {
            return;
        };
        let wanted = match ability {
            GraceAbility::Ward { .. } => self.ether.shield.map_or(true, |s| s.is_depleted()),
            GraceAbility::Mend { heal, .. } => self
                .combatants
                .living_opponents()
                .any(|unit| unit.max_hp - unit.hp >= heal.max(1)),
        };
        if !wanted || !self.ether.spend_grace(ability.cost()) {
            return;
        }

        match ability {
            GraceAbility::Ward { shield, .. } => self.ether.raise_shield(shield),
            GraceAbility::Mend { heal, .. } => {
                let wounded = self
                    .combatants
                    .living_opponents()
                    .max_by_key(|unit| unit.max_hp - unit.hp)
                    .map(|unit| unit.id);
                if let Some(unit) = wounded.and_then(|id| self.combatants.get_mut(id)) {
                    let amount = unit.heal(heal);
                    let target = unit.id;
                    self.emit(BattleEvent::Healed { target, amount });
                }
            }
        }
        self.emit(BattleEvent::GraceAbilityUsed {
            ability,
            grace_left: self.ether.grace,
        });
    }

    fn schedule(&mut self, played: &SideMap<Vec<CardId>>) -> Timeline {
        let living: Vec<CombatantId> = self.combatants.living_opponents().map(|unit| unit.id).collect();
        let opponent_actor = |i: usize| match living.len() {
            0 => CombatantId::PRIMARY_OPPONENT,
            n => living[i % n],
        };

        let planned = SideMap::from_pair(
            played[Side::Player]
                .iter()
                .map(|card| PlannedCard::new(CombatantId::PLAYER, *card))
                .collect(),
            played[Side::Opponent]
                .iter()
                .enumerate()
                .map(|(i, card)| PlannedCard::new(opponent_actor(i), *card))
                .collect(),
        );
        let opponent_agility = self
            .combatants
            .living_opponents()
            .next()
            .map_or(0, |unit| unit.stats.agility);
        let agility = SideMap::from_pair(self.combatants.player().stats.agility, opponent_agility);

        let mut timeline = Timeline::schedule(&self.catalog, &planned, &agility);
        for (player, opponent) in timeline.resolve_collisions(&self.catalog, None) {
            self.emit(BattleEvent::EntriesCollided {
                player: player.id,
                opponent: opponent.id,
                sp: player.sp,
            });
        }
        timeline
    }

    fn resolve_timeline(&mut self, timeline: &mut Timeline, played: &SideMap<Vec<CardId>>) {
        let catalog = Arc::clone(&self.catalog);
        let attacks_played = SideMap::new(|side| count_attacks(&catalog, &played[side]));
        let unused_attacks = SideMap::new(|side| count_attacks(&catalog, self.decks[side].hand()));

        let mut index = 0;
        while let Some(entry) = timeline.get(index).copied() {
            match catalog.card(entry.card) {
                Some(card) => {
                    let ctx = BattleContext::at(TimelinePoint::new(self.turn, entry.sp))
                        .with_last_card(timeline.is_last_for_side(index))
                        .with_attacks(attacks_played[entry.side], unused_attacks[entry.side]);
                    self.resolve_entry(timeline, index, entry, card, &ctx);
                }
                None => tracing::warn!(card = %entry.card, "unknown card on the timeline skipped"),
            }

            let now = TimelinePoint::new(self.turn, entry.sp);
            let expired: Vec<BattleEvent> = self
                .combatants
                .iter_mut()
                .flat_map(|unit| BattleEvent::tokens(unit.id, unit.tokens.expire_by_timeline(now)).collect::<Vec<_>>())
                .collect();
            self.emit_all(expired);

            if self.record_defeats() {
                break;
            }
            index += 1;
        }
    }

    fn resolve_entry(
        &mut self,
        timeline: &mut Timeline,
        index: usize,
        entry: QueueEntry,
        card: &CardDef,
        ctx: &BattleContext,
    ) {
        if !self.combatants.get(entry.actor).is_some_and(|unit| unit.is_alive()) {
            tracing::debug!(actor = %entry.actor, card = %entry.card, "actor is down, entry skipped");
            return;
        }
        let target = match entry.side {
            Side::Player => self.combatants.front_opponent(),
            Side::Opponent => Some(CombatantId::PLAYER),
        };
        let Some(target) = target else {
            return;
        };

        self.emit(BattleEvent::CardResolved {
            actor: entry.actor,
            card: entry.card,
            sp: entry.sp,
        });
        let catalog = Arc::clone(&self.catalog);
        let outcome = apply_action(&mut self.combatants, &catalog, entry.actor, target, card, ctx, &mut self.rng);

        let (dealt, taken) = (u64::from(outcome.dealt.unsigned_abs()), u64::from(outcome.taken.unsigned_abs()));
        match entry.side {
            Side::Player => {
                self.damage_dealt += dealt;
                self.damage_taken += taken;
            }
            Side::Opponent => {
                self.damage_taken += dealt;
                self.damage_dealt += taken;
            }
        }
        self.emit_all(outcome.events);

        for &effect in &card.traits {
            let changes = match (effect, entry.side) {
                (CardTrait::Swift(n), Side::Player) => TimelineChanges::advance_player(n),
                (CardTrait::Swift(n), Side::Opponent) => TimelineChanges::push_enemy(-n),
                (CardTrait::Stagger(n), Side::Player) => TimelineChanges::push_enemy(n),
                (CardTrait::Stagger(n), Side::Opponent) => TimelineChanges::advance_player(-n),
                (CardTrait::Knockback(n), Side::Player) => TimelineChanges::push_last_enemy(n),
                (CardTrait::Echo, Side::Player) => {
                    let count = timeline.duplicate_player_cards(Some(index));
                    if count > 0 {
                        self.emit(BattleEvent::CardsDuplicated { count });
                    }
                    continue;
                }
                _ => continue,
            };
            if timeline.apply_timeline_changes(Some(index), changes) {
                self.emit(BattleEvent::TimelineShifted { card: card.id, effect });
            }
        }
    }

    /// Announce newly fallen units. True once either side is wiped out.
    fn record_defeats(&mut self) -> bool {
        let newly: SmallVec<[CombatantId; 4]> = self
            .combatants
            .iter()
            .filter(|unit| !unit.is_alive() && !self.fallen.contains(&unit.id))
            .map(|unit| unit.id)
            .collect();
        for unit in newly {
            self.fallen.push(unit);
            self.emit(BattleEvent::UnitDefeated { unit });
        }
        !self.combatants.player().is_alive() || self.combatants.all_opponents_down()
    }

    fn settle_ether(&mut self, played: &SideMap<Vec<CardId>>) {
        let catalog = Arc::clone(&self.catalog);
        let mut gains = SideMap::with_value(0u32);

        for side in Side::BOTH {
            let cards: Vec<&CardDef> = played[side].iter().filter_map(|id| catalog.card(*id)).collect();
            let Some(combo) = detect_combo(cards.iter().copied()) else {
                continue;
            };
            self.emit(BattleEvent::ComboDetected {
                side,
                kind: combo.kind,
                multiplier: combo.multiplier,
            });
            let deflation = self.deflation[side].record(combo.kind);
            let points: u32 = cards
                .iter()
                .map(|card| card.ether_points(self.config.base_card_ether))
                .sum();
            let token_factor = self.ether_gain_factor(side);
            gains[side] = (f64::from(points) * combo.multiplier * deflation * token_factor).floor() as u32;
        }

        let mut input = TransferInput::new(
            gains[Side::Player],
            gains[Side::Opponent],
            self.ether.soul,
            self.ether.opponent_soul,
            self.combatants.opponent_hp(),
        );
        if let Some(shield) = self.ether.shield {
            input = input.with_shield(shield);
        }
        let outcome = transfer(input);
        self.ether.apply(&outcome);

        self.emit(BattleEvent::EtherSettled {
            player_gain: gains[Side::Player],
            opponent_gain: gains[Side::Opponent],
            moved: outcome.moved,
            grace_gain: outcome.opponent_grace_gain,
            shield_blocked: outcome.shield_blocked,
            overkill: outcome.overkill,
        });
        if outcome.inherited > 0 {
            self.emit(BattleEvent::SoulInherited {
                amount: outcome.inherited,
            });
        }

        if outcome.overkill > 0 {
            let reward = convert_overkill(
                outcome.overkill,
                self.config.overkill_threshold,
                self.config.overkill_growth,
                &catalog.reward_tokens(),
                &mut self.rng,
            );
            if !reward.is_empty() {
                for &(token, stacks) in &reward.tokens {
                    let events = self
                        .combatants
                        .add_token(&catalog, CombatantId::PLAYER, token, stacks, None);
                    self.emit_all(BattleEvent::tokens(CombatantId::PLAYER, events));
                }
                self.emit(BattleEvent::OverkillRewarded {
                    slots: reward.slots,
                    tokens: reward.tokens,
                });
            }
        }
    }

    /// Product of ether-gain tokens on `side`'s living combatants; usage
    /// tokens among them are consumed.
    fn ether_gain_factor(&mut self, side: Side) -> f64 {
        let catalog = Arc::clone(&self.catalog);
        let mut factor = 1.0;
        let mut events = Vec::new();
        for unit in self.combatants.iter_mut().filter(|u| u.side() == side && u.is_alive()) {
            let used: SmallVec<[(TokenId, f64); 2]> = unit
                .tokens
                .iter()
                .filter_map(|instance| match catalog.token(instance.id)?.effect {
                    TokenEffect::EtherGain(m) => Some((instance.id, m)),
                    _ => None,
                })
                .collect();
            for (token, m) in used {
                factor *= m;
                if let Some(event) = unit.tokens.consume(token) {
                    events.push(BattleEvent::Token { target: unit.id, event });
                }
            }
        }
        self.emit_all(events);
        factor
    }

    fn end_turn_cleanup(&mut self) {
        let turn = self.turn;
        let reset_block = !self.config.block_persists;
        let mut events = Vec::new();
        for unit in self.combatants.iter_mut() {
            let id = unit.id;
            events.extend(BattleEvent::tokens(id, unit.tokens.clear_turn_tokens()));
            events.extend(BattleEvent::tokens(id, unit.tokens.expire_overdue(turn)));
            if reset_block {
                unit.block = 0;
            }
        }
        self.emit_all(events);
    }

    fn decide(&self) -> Option<Winner> {
        let player_down = !self.combatants.player().is_alive();
        let opponents_down = self.combatants.all_opponents_down();
        match (player_down, opponents_down) {
            (true, true) => Some(Winner::Draw),
            (true, false) => Some(Winner::Opponent),
            (false, true) => Some(Winner::Player),
            _ if self.config.ether_victory && self.enemy_soul > 0 && self.ether.opponent_soul == 0 => {
                Some(Winner::Player)
            }
            _ if self.turn >= self.config.max_turns => Some(Winner::Draw),
            _ => None,
        }
    }

    fn finish(&mut self, winner: Winner) {
        self.winner = Some(winner);
        self.emit(BattleEvent::BattleEnded {
            winner,
            turns: self.turn,
        });
        tracing::info!(
            winner = %winner,
            turns = self.turn,
            dealt = self.damage_dealt,
            taken = self.damage_taken,
            soul = self.ether.soul,
            "battle finished"
        );
    }

    fn emit(&mut self, event: BattleEvent) {
        self.log.push_back(event);
    }

    fn emit_all(&mut self, events: impl IntoIterator<Item = BattleEvent>) {
        self.log.extend(events);
    }
}

fn count_attacks(catalog: &Catalog, cards: &[CardId]) -> u32 {
    cards
        .iter()
        .filter_map(|id| catalog.card(*id))
        .filter(|card| card.kind.is_attack())
        .count() as u32
}

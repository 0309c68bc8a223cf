//! Card resolution: one card applied by one actor to one target.
//!
//! ## Attack order
//!
//! 1. Special-effect preprocessing (block clearing, execute, hit count,
//!    flat bonuses)
//! 2. Base damage: card damage x hits + strength + flat token damage
//! 3. Attacker's outgoing multipliers
//! 4. Defender's dodge roll; a dodge ends resolution with 0 damage
//! 5. Defender's incoming multipliers
//! 6. Block absorbs first unless the card ignores block
//! 7. Remaining damage comes off hp, clamped to `[0, max_hp]`
//! 8. Counter tokens reflect damage back at the attacker
//!
//! Multipliers are applied once per token present (not per stack) and
//! rounded down. Usage-class tokens that modified the action lose a stack.

use smallvec::SmallVec;

use crate::catalog::{
    CardDef, CardKind, Catalog, DurationClass, GrantTarget, SpecialEffect, TokenEffect, TokenId,
};
use crate::core::{BattleEvent, BattleRng, CombatantId};
use crate::tokens::{TimelinePoint, TokenLedger};

use super::arena::Combatants;
use super::state::CombatantState;

/// Where in the battle an action happens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BattleContext {
    /// Timeline coordinate of the resolving entry.
    pub point: TimelinePoint,
    /// No later entry of the actor's side remains this turn.
    pub is_last_card: bool,
    /// Attack cards the actor's side played this turn, this one included.
    pub attacks_played: u32,
    /// Attack cards left unplayed in the actor's side's hand.
    pub unused_attacks: u32,
}

impl BattleContext {
    #[must_use]
    pub fn at(point: TimelinePoint) -> Self {
        Self {
            point,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_last_card(mut self, last: bool) -> Self {
        self.is_last_card = last;
        self
    }

    #[must_use]
    pub fn with_attacks(mut self, played: u32, unused: u32) -> Self {
        self.attacks_played = played;
        self.unused_attacks = unused;
        self
    }
}

/// Result of one resolved card.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionOutcome {
    /// Hp the target lost.
    pub dealt: i32,
    /// Hp the actor lost to counters.
    pub taken: i32,
    pub dodged: bool,
    pub events: Vec<BattleEvent>,
}

/// Apply `card`, played by `actor`, aimed at `target`.
///
/// Missing or dead actors and targets make this a logged no-op.
///
/// ```
/// use ether_battle::catalog::{CardDef, CardId, Catalog};
/// use ether_battle::combat::{apply_action, BattleContext, Combatants, Stats};
/// use ether_battle::core::{BattleRng, CombatantId};
///
/// let catalog = Catalog::standard();
/// let mut arena = Combatants::new(100, Stats::new(5, 0, 0));
/// let enemy = arena.spawn("Dummy", 100, Stats::default());
/// let card = CardDef::attack(CardId::new(900), "Test Strike", 20);
///
/// let outcome = apply_action(
///     &mut arena,
///     &catalog,
///     CombatantId::PLAYER,
///     enemy,
///     &card,
///     &BattleContext::default(),
///     &mut BattleRng::new(1),
/// );
/// assert_eq!(outcome.dealt, 25);
/// assert_eq!(arena.get(enemy).map(|u| u.hp), Some(75));
/// ```
pub fn apply_action(
    arena: &mut Combatants,
    catalog: &Catalog,
    actor: CombatantId,
    target: CombatantId,
    card: &CardDef,
    ctx: &BattleContext,
    rng: &mut BattleRng,
) -> ActionOutcome {
    let mut out = ActionOutcome::default();

    match arena.get(actor) {
        Some(unit) if unit.is_alive() => {}
        Some(_) => {
            tracing::debug!(actor = %actor, card = %card.id, "actor is down, card fizzles");
            return out;
        }
        None => {
            tracing::warn!(actor = %actor, card = %card.id, "no such actor, card ignored");
            return out;
        }
    }

    match card.kind {
        CardKind::Attack => resolve_attack(arena, catalog, actor, target, card, ctx, rng, &mut out),
        CardKind::Defense => resolve_defense(arena, catalog, actor, card, &mut out),
        CardKind::Support => {}
    }

    if card.heal > 0 {
        if let Some(unit) = arena.get_mut(actor) {
            let amount = unit.heal(card.heal);
            out.events.push(BattleEvent::Healed { target: actor, amount });
        }
    }

    for grant in &card.grants {
        let recipient = match grant.target {
            GrantTarget::User => actor,
            GrantTarget::Target => target,
        };
        let events = arena.add_token(catalog, recipient, grant.token, grant.stacks, None);
        out.events.extend(BattleEvent::tokens(recipient, events));
    }

    tracing::debug!(
        actor = %actor,
        target = %target,
        card = %card.id,
        dealt = out.dealt,
        taken = out.taken,
        dodged = out.dodged,
        "card resolved"
    );
    out
}

#[allow(clippy::too_many_arguments)]
fn resolve_attack(
    arena: &mut Combatants,
    catalog: &Catalog,
    actor: CombatantId,
    target: CombatantId,
    card: &CardDef,
    ctx: &BattleContext,
    rng: &mut BattleRng,
    out: &mut ActionOutcome,
) {
    let Some((attacker, defender)) = arena.pair_mut(actor, target) else {
        tracing::warn!(actor = %actor, target = %target, "attack needs two distinct combatants");
        return;
    };
    if !defender.is_alive() {
        tracing::debug!(target = %target, "target already down");
        return;
    }
    let special = card.special;

    if special == Some(SpecialEffect::ClearAllBlock) && defender.block > 0 {
        out.events.push(BattleEvent::BlockCleared {
            target,
            amount: defender.block,
        });
        defender.block = 0;
    }

    if special == Some(SpecialEffect::Execute) && defender.hp.saturating_mul(10) < defender.max_hp {
        out.dealt = defender.lose_hp(defender.hp);
        out.events.push(BattleEvent::Executed { target });
        return;
    }

    let ignore_block = special == Some(SpecialEffect::IgnoreBlock);
    let was_unblocked = defender.block == 0;

    let mut card_damage = card.damage;
    if special == Some(SpecialEffect::DoubleIfSoloAttack) && ctx.attacks_played <= 1 {
        card_damage = card_damage.saturating_mul(2);
    }

    let mut hits = clamp_count(card.hits);
    match special {
        Some(SpecialEffect::RepeatOnLastCard) if ctx.is_last_card => hits = hits.saturating_add(1),
        Some(SpecialEffect::RepeatPerUnusedAttack) => hits = hits.saturating_add(clamp_count(ctx.unused_attacks)),
        _ => {}
    }

    let mut flat = attacker.stats.strength;
    if special == Some(SpecialEffect::AgilityBonus) {
        flat = flat.saturating_add(attacker.stats.agility);
    }
    flat = flat.saturating_add(flat_damage(catalog, attacker, &mut out.events));

    let base = card_damage.saturating_mul(hits).saturating_add(flat).max(0);
    let outgoing = multiplier(catalog, attacker, &mut out.events, |effect| match effect {
        TokenEffect::Outgoing(m) => Some(m),
        _ => None,
    });
    let mut damage = scale(base, outgoing);

    if roll_dodge(catalog, defender, rng, &mut out.events) {
        out.dodged = true;
        out.events.push(BattleEvent::Dodged {
            attacker: actor,
            defender: target,
        });
        return;
    }

    let incoming = multiplier(catalog, defender, &mut out.events, |effect| match effect {
        TokenEffect::Incoming(m) => Some(m),
        _ => None,
    });
    damage = scale(damage, incoming);

    let mut blocked = 0;
    if !ignore_block {
        blocked = damage.min(defender.block);
        defender.block -= blocked;
        damage -= blocked;
    }

    out.dealt = defender.lose_hp(damage);
    out.events.push(BattleEvent::DamageDealt {
        attacker: actor,
        defender: target,
        amount: out.dealt,
        blocked,
    });

    if let Some(reflect) = counter_value(catalog, &defender.tokens) {
        let amount = reflect.saturating_add(defender.stats.strength);
        out.taken = attacker.lose_hp(amount);
        out.events.push(BattleEvent::CounterDamage {
            source: target,
            target: actor,
            amount: out.taken,
        });
    }

    let (recipient, token, granted_at) = match special {
        Some(SpecialEffect::VulnerableIfUnblocked) if was_unblocked => (&mut *defender, TokenId::Vulnerable, None),
        Some(SpecialEffect::PersistentStrike) => (&mut *attacker, TokenId::PersistentStrike, Some(ctx.point)),
        Some(SpecialEffect::HalveEtherGain) => (&mut *defender, TokenId::HalfEther, None),
        _ => return,
    };
    let events = recipient.tokens.add(catalog, token, 1, granted_at);
    out.events.extend(BattleEvent::tokens(recipient.id, events));
}

fn resolve_defense(
    arena: &mut Combatants,
    catalog: &Catalog,
    actor: CombatantId,
    card: &CardDef,
    out: &mut ActionOutcome,
) {
    let Some(user) = arena.get_mut(actor) else {
        return;
    };
    let gain_multiplier = multiplier(catalog, user, &mut out.events, |effect| match effect {
        TokenEffect::BlockGain(m) => Some(m),
        _ => None,
    });
    let amount = scale(card.block, gain_multiplier);
    user.gain_block(amount);
    out.events.push(BattleEvent::BlockGained { target: actor, amount });
}

fn clamp_count(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Float-to-int casts saturate, so huge products pin at `i32::MAX`.
fn scale(value: i32, factor: f64) -> i32 {
    ((value as f64) * factor).floor().max(0.0) as i32
}

/// Product of every matching multiplier on `owner`; usage tokens that
/// contributed lose a stack.
fn multiplier(
    catalog: &Catalog,
    owner: &mut CombatantState,
    events: &mut Vec<BattleEvent>,
    pick: impl Fn(TokenEffect) -> Option<f64>,
) -> f64 {
    let mut product = 1.0;
    let mut used: SmallVec<[TokenId; 4]> = SmallVec::new();
    for instance in owner.tokens.iter() {
        let Some(def) = catalog.token(instance.id) else {
            continue;
        };
        if let Some(m) = pick(def.effect) {
            product *= m;
            if def.duration == DurationClass::Usage {
                used.push(instance.id);
            }
        }
    }
    consume_all(owner, &used, events);
    product
}

fn flat_damage(catalog: &Catalog, owner: &mut CombatantState, events: &mut Vec<BattleEvent>) -> i32 {
    let mut total: i32 = 0;
    let mut used: SmallVec<[TokenId; 4]> = SmallVec::new();
    for instance in owner.tokens.iter() {
        let Some(def) = catalog.token(instance.id) else {
            continue;
        };
        if let TokenEffect::FlatDamage(per_stack) = def.effect {
            total = total.saturating_add(per_stack.saturating_mul(clamp_count(instance.stacks())));
            if def.duration == DurationClass::Usage {
                used.push(instance.id);
            }
        }
    }
    consume_all(owner, &used, events);
    total
}

/// Combined dodge chance is `1 - product(1 - p)`. No roll happens, and no
/// random number is drawn, when the defender has no dodge token.
fn roll_dodge(
    catalog: &Catalog,
    defender: &mut CombatantState,
    rng: &mut BattleRng,
    events: &mut Vec<BattleEvent>,
) -> bool {
    let mut miss = 1.0;
    let mut any = false;
    let mut used: SmallVec<[TokenId; 4]> = SmallVec::new();
    for instance in defender.tokens.iter() {
        let Some(def) = catalog.token(instance.id) else {
            continue;
        };
        if let TokenEffect::Dodge(p) = def.effect {
            any = true;
            miss *= 1.0 - p.clamp(0.0, 1.0);
            if def.duration == DurationClass::Usage {
                used.push(instance.id);
            }
        }
    }
    if !any {
        return false;
    }
    consume_all(defender, &used, events);
    rng.chance(1.0 - miss)
}

fn counter_value(catalog: &Catalog, ledger: &TokenLedger) -> Option<i32> {
    ledger
        .iter()
        .filter_map(|instance| match catalog.token(instance.id)?.effect {
            TokenEffect::Counter(value) => Some(value.saturating_mul(clamp_count(instance.stacks()))),
            _ => None,
        })
        .reduce(i32::saturating_add)
}

fn consume_all(owner: &mut CombatantState, used: &[TokenId], events: &mut Vec<BattleEvent>) {
    for &id in used {
        if let Some(event) = owner.tokens.consume(id) {
            events.push(BattleEvent::Token { target: owner.id, event });
        }
    }
}

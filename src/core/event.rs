//! Battle event stream.
//!
//! Every state transition returns the events it produced instead of
//! formatting log text itself. A UI renders them (the `Display` impl is a
//! plain-text rendering); the simulator ignores them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::{CardId, CardTrait, TokenId};
use crate::combo::ComboKind;
use crate::ether::GraceAbility;
use crate::tokens::TokenEvent;

use super::id::{CombatantId, EntryId};
use super::side::Side;

/// How a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Winner {
    Player,
    Opponent,
    Draw,
}

impl Winner {
    #[must_use]
    pub const fn from_side(side: Side) -> Self {
        match side {
            Side::Player => Winner::Player,
            Side::Opponent => Winner::Opponent,
        }
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Player => write!(f, "player"),
            Winner::Opponent => write!(f, "opponent"),
            Winner::Draw => write!(f, "draw"),
        }
    }
}

/// Something that happened during a battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BattleEvent {
    TurnStarted {
        turn: u32,
    },
    CardsDrawn {
        side: Side,
        count: usize,
        reshuffled: bool,
    },
    GraceAbilityUsed {
        ability: GraceAbility,
        grace_left: u32,
    },
    EntriesCollided {
        player: EntryId,
        opponent: EntryId,
        sp: i32,
    },
    TimelineShifted {
        card: CardId,
        effect: CardTrait,
    },
    CardsDuplicated {
        count: usize,
    },
    CardResolved {
        actor: CombatantId,
        card: CardId,
        sp: i32,
    },
    Dodged {
        attacker: CombatantId,
        defender: CombatantId,
    },
    DamageDealt {
        attacker: CombatantId,
        defender: CombatantId,
        amount: i32,
        blocked: i32,
    },
    BlockCleared {
        target: CombatantId,
        amount: i32,
    },
    Executed {
        target: CombatantId,
    },
    BlockGained {
        target: CombatantId,
        amount: i32,
    },
    Healed {
        target: CombatantId,
        amount: i32,
    },
    CounterDamage {
        source: CombatantId,
        target: CombatantId,
        amount: i32,
    },
    Token {
        target: CombatantId,
        event: TokenEvent,
    },
    ComboDetected {
        side: Side,
        kind: ComboKind,
        multiplier: f64,
    },
    EtherSettled {
        player_gain: u32,
        opponent_gain: u32,
        moved: u32,
        grace_gain: u32,
        shield_blocked: u32,
        overkill: u32,
    },
    SoulInherited {
        amount: u32,
    },
    OverkillRewarded {
        slots: u32,
        tokens: SmallVec<[(TokenId, u32); 2]>,
    },
    UnitDefeated {
        unit: CombatantId,
    },
    BattleEnded {
        winner: Winner,
        turns: u32,
    },
}

impl BattleEvent {
    /// Wrap ledger events for the stream.
    pub fn tokens(target: CombatantId, events: impl IntoIterator<Item = TokenEvent>) -> impl Iterator<Item = Self> {
        events.into_iter().map(move |event| BattleEvent::Token { target, event })
    }
}

impl std::fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BattleEvent::TurnStarted { turn } => write!(f, "--- turn {turn} ---"),
            BattleEvent::CardsDrawn {
                side,
                count,
                reshuffled,
            } => {
                write!(f, "{side} draws {count}")?;
                if *reshuffled {
                    write!(f, " (discard reshuffled)")?;
                }
                Ok(())
            }
            BattleEvent::GraceAbilityUsed { ability, grace_left } => {
                write!(f, "opponent spends grace on {ability} ({grace_left} left)")
            }
            BattleEvent::EntriesCollided { player, opponent, sp } => {
                write!(f, "{player} and {opponent} collide at {sp} and are destroyed")
            }
            BattleEvent::TimelineShifted { card, effect } => write!(f, "{card} shifts the timeline ({effect:?})"),
            BattleEvent::CardsDuplicated { count } => write!(f, "{count} player cards echo"),
            BattleEvent::CardResolved { actor, card, sp } => write!(f, "{actor} plays {card} at {sp}"),
            BattleEvent::Dodged { attacker, defender } => write!(f, "{defender} dodges {attacker}"),
            BattleEvent::DamageDealt {
                attacker,
                defender,
                amount,
                blocked,
            } => write!(f, "{attacker} hits {defender} for {amount} ({blocked} blocked)"),
            BattleEvent::BlockCleared { target, amount } => write!(f, "{target} loses {amount} block"),
            BattleEvent::Executed { target } => write!(f, "{target} is executed"),
            BattleEvent::BlockGained { target, amount } => write!(f, "{target} gains {amount} block"),
            BattleEvent::Healed { target, amount } => write!(f, "{target} heals {amount}"),
            BattleEvent::CounterDamage { source, target, amount } => {
                write!(f, "{source} counters {target} for {amount}")
            }
            BattleEvent::Token { target, event } => write!(f, "{target} {event}"),
            BattleEvent::ComboDetected { side, kind, multiplier } => {
                write!(f, "{side} combo: {kind} (x{multiplier})")
            }
            BattleEvent::EtherSettled {
                player_gain,
                opponent_gain,
                moved,
                grace_gain,
                shield_blocked,
                overkill,
            } => write!(
                f,
                "ether {player_gain} vs {opponent_gain}: moved {moved}, grace +{grace_gain}, shield {shield_blocked}, overkill {overkill}"
            ),
            BattleEvent::SoulInherited { amount } => write!(f, "player claims {amount} remaining soul"),
            BattleEvent::OverkillRewarded { slots, tokens } => {
                write!(f, "overkill x{slots}:")?;
                for (token, stacks) in tokens {
                    write!(f, " {stacks} {token}")?;
                }
                Ok(())
            }
            BattleEvent::UnitDefeated { unit } => write!(f, "{unit} is defeated"),
            BattleEvent::BattleEnded { winner, turns } => write!(f, "battle over after {turns} turns: {winner}"),
        }
    }
}

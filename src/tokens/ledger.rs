//! Per-combatant token storage and the stacking rules.
//!
//! ## Buckets
//!
//! Tokens are kept in three small vectors, one per duration class. Each
//! bucket holds at most one instance per token id; adding more of the
//! same token raises that instance's stack count.
//!
//! ## Add pipeline
//!
//! 1. Unknown token (no catalog definition): warn, no change.
//! 2. Immunity: a negative token is absorbed by one immunity stack.
//! 3. Per-id rules: `Jammed` never stacks and evicts `Focus`; `Focus`
//!    cannot be added while jammed.
//! 4. Cancellation: stacks cancel 1:1 against the registered opposite,
//!    wherever it is stored. Only the surplus side survives.
//! 5. Insert the surplus into the bucket of the token's duration class.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::num::NonZeroU32;

use crate::catalog::{Catalog, DurationClass, TokenId};

use super::instance::{TimelinePoint, TokenInstance};

/// Storage for one duration class.
pub type TokenBucket = SmallVec<[TokenInstance; 4]>;

/// Why an add did not happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockReason {
    Immunity,
    Jammed,
    AlreadyPresent,
}

/// Why stacks left the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemovalReason {
    /// Used up by the action it modified.
    Consumed,
    /// Removed by an explicit caller.
    Removed,
    /// Cancelled by an incoming opposite.
    Cancelled,
    /// Pushed out by a per-id rule.
    Evicted,
    /// Turn-boundary expiry.
    TurnEnd,
    /// Timeline-position expiry.
    Timeline,
}

/// Outcome of a ledger mutation, for the event stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TokenEvent {
    Added {
        token: TokenId,
        stacks: u32,
        total: u32,
    },
    Cancelled {
        incoming: TokenId,
        opposing: TokenId,
        cancelled: u32,
    },
    Blocked {
        token: TokenId,
        reason: BlockReason,
    },
    Removed {
        token: TokenId,
        stacks: u32,
        reason: RemovalReason,
    },
}

impl std::fmt::Display for TokenEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenEvent::Added { token, stacks, total } => {
                write!(f, "gains {stacks} {token} ({total} total)")
            }
            TokenEvent::Cancelled {
                incoming,
                opposing,
                cancelled,
            } => write!(f, "{incoming} cancels {cancelled} {opposing}"),
            TokenEvent::Blocked { token, reason } => write!(f, "{token} blocked ({reason:?})"),
            TokenEvent::Removed { token, stacks, reason } => {
                write!(f, "loses {stacks} {token} ({reason:?})")
            }
        }
    }
}

/// All tokens on one combatant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenLedger {
    usage: TokenBucket,
    turn: TokenBucket,
    permanent: TokenBucket,
}

impl TokenLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bucket(&self, class: DurationClass) -> &[TokenInstance] {
        match class {
            DurationClass::Usage => &self.usage,
            DurationClass::Turn => &self.turn,
            DurationClass::Permanent => &self.permanent,
        }
    }

    fn bucket_mut(&mut self, class: DurationClass) -> &mut TokenBucket {
        match class {
            DurationClass::Usage => &mut self.usage,
            DurationClass::Turn => &mut self.turn,
            DurationClass::Permanent => &mut self.permanent,
        }
    }

    /// Every instance, usage bucket first.
    pub fn iter(&self) -> impl Iterator<Item = &TokenInstance> {
        self.usage.iter().chain(self.turn.iter()).chain(self.permanent.iter())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.usage.is_empty() && self.turn.is_empty() && self.permanent.is_empty()
    }

    #[must_use]
    pub fn has(&self, id: TokenId) -> bool {
        self.iter().any(|t| t.id == id)
    }

    /// Total stacks of `id` across all buckets.
    #[must_use]
    pub fn stacks(&self, id: TokenId) -> u32 {
        self.iter().filter(|t| t.id == id).map(TokenInstance::stacks).sum()
    }

    /// Add `stacks` of `id`, running immunity, per-id rules and
    /// cancellation first.
    pub fn add(
        &mut self,
        catalog: &Catalog,
        id: TokenId,
        stacks: u32,
        granted_at: Option<TimelinePoint>,
    ) -> Vec<TokenEvent> {
        let mut events = Vec::new();
        let Some(def) = catalog.token(id) else {
            tracing::warn!(token = %id, "token has no catalog definition, add ignored");
            return events;
        };
        if stacks == 0 {
            return events;
        }

        if def.is_negative() && self.has(TokenId::Immunity) {
            self.take_anywhere(TokenId::Immunity, 1);
            events.push(TokenEvent::Blocked {
                token: id,
                reason: BlockReason::Immunity,
            });
            events.push(TokenEvent::Removed {
                token: TokenId::Immunity,
                stacks: 1,
                reason: RemovalReason::Consumed,
            });
            return events;
        }

        let mut incoming = stacks;
        match id {
            TokenId::Jammed => {
                if self.has(TokenId::Jammed) {
                    events.push(TokenEvent::Blocked {
                        token: id,
                        reason: BlockReason::AlreadyPresent,
                    });
                    return events;
                }
                let evicted = self.take_anywhere(TokenId::Focus, u32::MAX);
                if evicted > 0 {
                    events.push(TokenEvent::Removed {
                        token: TokenId::Focus,
                        stacks: evicted,
                        reason: RemovalReason::Evicted,
                    });
                }
                incoming = 1;
            }
            TokenId::Focus if self.has(TokenId::Jammed) => {
                events.push(TokenEvent::Blocked {
                    token: id,
                    reason: BlockReason::Jammed,
                });
                return events;
            }
            _ => {}
        }

        if let Some(opposing) = catalog.opposite(id) {
            let present = self.stacks(opposing);
            if present > 0 {
                let cancelled = incoming.min(present);
                self.take_anywhere(opposing, cancelled);
                events.push(TokenEvent::Cancelled {
                    incoming: id,
                    opposing,
                    cancelled,
                });
                if cancelled == present {
                    events.push(TokenEvent::Removed {
                        token: opposing,
                        stacks: present,
                        reason: RemovalReason::Cancelled,
                    });
                }
                incoming -= cancelled;
                if incoming == 0 {
                    return events;
                }
            }
        }

        let total = self.insert(def.duration, id, incoming, granted_at);
        events.push(TokenEvent::Added {
            token: id,
            stacks: incoming,
            total,
        });
        events
    }

    /// Remove up to `stacks` of `id` from one bucket.
    pub fn remove(&mut self, id: TokenId, class: DurationClass, stacks: u32) -> Vec<TokenEvent> {
        let taken = take_from(self.bucket_mut(class), id, stacks);
        if taken == 0 {
            return Vec::new();
        }
        vec![TokenEvent::Removed {
            token: id,
            stacks: taken,
            reason: RemovalReason::Removed,
        }]
    }

    /// Use up one stack of a usage-class token.
    pub fn consume(&mut self, id: TokenId) -> Option<TokenEvent> {
        let taken = take_from(&mut self.usage, id, 1);
        (taken > 0).then_some(TokenEvent::Removed {
            token: id,
            stacks: taken,
            reason: RemovalReason::Consumed,
        })
    }

    /// Drop every turn-class token that has no timeline anchor.
    pub fn clear_turn_tokens(&mut self) -> Vec<TokenEvent> {
        self.expire_turn_where(RemovalReason::TurnEnd, |t| t.granted_at.is_none())
    }

    /// Drop turn-class tokens whose anchor the timeline has passed.
    pub fn expire_by_timeline(&mut self, now: TimelinePoint) -> Vec<TokenEvent> {
        self.expire_turn_where(RemovalReason::Timeline, |t| {
            t.granted_at.is_some_and(|granted| now.has_passed(granted))
        })
    }

    /// Drop anchored tokens that survived a whole turn after the one they
    /// were granted in, because that turn's timeline never reached their
    /// position.
    pub fn expire_overdue(&mut self, ending_turn: u32) -> Vec<TokenEvent> {
        self.expire_turn_where(RemovalReason::Timeline, |t| {
            t.granted_at.is_some_and(|granted| ending_turn > granted.turn)
        })
    }

    fn expire_turn_where(
        &mut self,
        reason: RemovalReason,
        expired: impl Fn(&TokenInstance) -> bool,
    ) -> Vec<TokenEvent> {
        let mut events = Vec::new();
        self.turn.retain(|t| {
            if expired(t) {
                events.push(TokenEvent::Removed {
                    token: t.id,
                    stacks: t.stacks(),
                    reason,
                });
                false
            } else {
                true
            }
        });
        events
    }

    fn insert(
        &mut self,
        class: DurationClass,
        id: TokenId,
        stacks: u32,
        granted_at: Option<TimelinePoint>,
    ) -> u32 {
        let bucket = self.bucket_mut(class);
        if let Some(existing) = bucket.iter_mut().find(|t| t.id == id) {
            existing.stacks = existing.stacks.saturating_add(stacks);
            if granted_at.is_some() {
                existing.granted_at = granted_at;
            }
            return existing.stacks();
        }
        if let Some(instance) = TokenInstance::new(id, stacks, granted_at) {
            bucket.push(instance);
        }
        stacks
    }

    /// Take up to `wanted` stacks of `id`, usage bucket first.
    fn take_anywhere(&mut self, id: TokenId, wanted: u32) -> u32 {
        let mut taken = 0;
        for class in [DurationClass::Usage, DurationClass::Turn, DurationClass::Permanent] {
            if taken == wanted {
                break;
            }
            taken += take_from(self.bucket_mut(class), id, wanted - taken);
        }
        taken
    }
}

fn take_from(bucket: &mut TokenBucket, id: TokenId, wanted: u32) -> u32 {
    let Some(pos) = bucket.iter().position(|t| t.id == id) else {
        return 0;
    };
    let have = bucket[pos].stacks();
    let taken = have.min(wanted);
    match NonZeroU32::new(have - taken) {
        Some(left) => bucket[pos].stacks = left,
        None => {
            bucket.remove(pos);
        }
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogData, DurationClass, TokenCategory, TokenDef, TokenEffect};

    fn catalog() -> Catalog {
        Catalog::standard()
    }

    #[test]
    fn test_add_and_stack() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();

        ledger.add(&catalog, TokenId::Attack, 2, None);
        let events = ledger.add(&catalog, TokenId::Attack, 1, None);

        assert_eq!(ledger.stacks(TokenId::Attack), 3);
        assert_eq!(ledger.bucket(DurationClass::Usage).len(), 1);
        assert_eq!(
            events,
            vec![TokenEvent::Added {
                token: TokenId::Attack,
                stacks: 1,
                total: 3
            }]
        );
    }

    #[test]
    fn test_tokens_land_in_their_duration_bucket() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();

        ledger.add(&catalog, TokenId::Dodge, 1, None);
        ledger.add(&catalog, TokenId::Counter, 1, None);
        ledger.add(&catalog, TokenId::Focus, 1, None);

        assert_eq!(ledger.bucket(DurationClass::Usage)[0].id, TokenId::Dodge);
        assert_eq!(ledger.bucket(DurationClass::Turn)[0].id, TokenId::Counter);
        assert_eq!(ledger.bucket(DurationClass::Permanent)[0].id, TokenId::Focus);
    }

    #[test]
    fn test_cancellation_incoming_surplus() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();
        ledger.add(&catalog, TokenId::Dull, 2, None);

        ledger.add(&catalog, TokenId::Attack, 5, None);

        assert_eq!(ledger.stacks(TokenId::Attack), 3);
        assert!(!ledger.has(TokenId::Dull));
    }

    #[test]
    fn test_cancellation_opposing_surplus() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();
        ledger.add(&catalog, TokenId::Dull, 4, None);

        let events = ledger.add(&catalog, TokenId::Attack, 1, None);

        assert_eq!(ledger.stacks(TokenId::Dull), 3);
        assert!(!ledger.has(TokenId::Attack));
        assert_eq!(
            events,
            vec![TokenEvent::Cancelled {
                incoming: TokenId::Attack,
                opposing: TokenId::Dull,
                cancelled: 1
            }]
        );
    }

    #[test]
    fn test_cancellation_exact() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();
        ledger.add(&catalog, TokenId::Guarded, 2, None);

        ledger.add(&catalog, TokenId::Vulnerable, 2, None);

        assert!(ledger.is_empty());
    }

    #[test]
    fn test_immunity_absorbs_negative() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();
        ledger.add(&catalog, TokenId::Immunity, 1, None);

        let events = ledger.add(&catalog, TokenId::Vulnerable, 3, None);

        assert!(!ledger.has(TokenId::Vulnerable));
        assert!(!ledger.has(TokenId::Immunity));
        assert!(matches!(
            events[0],
            TokenEvent::Blocked {
                reason: BlockReason::Immunity,
                ..
            }
        ));
    }

    #[test]
    fn test_immunity_ignores_positive() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();
        ledger.add(&catalog, TokenId::Immunity, 1, None);

        ledger.add(&catalog, TokenId::Attack, 1, None);

        assert_eq!(ledger.stacks(TokenId::Immunity), 1);
        assert_eq!(ledger.stacks(TokenId::Attack), 1);
    }

    #[test]
    fn test_immunity_runs_before_cancellation() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();
        ledger.add(&catalog, TokenId::Attack, 2, None);
        ledger.add(&catalog, TokenId::Immunity, 1, None);

        ledger.add(&catalog, TokenId::Dull, 1, None);

        // The dull stack never reached cancellation.
        assert_eq!(ledger.stacks(TokenId::Attack), 2);
    }

    #[test]
    fn test_jammed_is_single_and_evicts_focus() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();
        ledger.add(&catalog, TokenId::Focus, 3, None);

        let events = ledger.add(&catalog, TokenId::Jammed, 4, None);
        assert_eq!(ledger.stacks(TokenId::Jammed), 1);
        assert!(!ledger.has(TokenId::Focus));
        assert!(events.contains(&TokenEvent::Removed {
            token: TokenId::Focus,
            stacks: 3,
            reason: RemovalReason::Evicted
        }));

        let again = ledger.add(&catalog, TokenId::Jammed, 1, None);
        assert_eq!(ledger.stacks(TokenId::Jammed), 1);
        assert!(matches!(
            again[0],
            TokenEvent::Blocked {
                reason: BlockReason::AlreadyPresent,
                ..
            }
        ));

        ledger.add(&catalog, TokenId::Focus, 2, None);
        assert!(!ledger.has(TokenId::Focus));
    }

    #[test]
    fn test_unknown_token_is_noop() {
        let data = CatalogData {
            tokens: vec![TokenDef::new(
                TokenId::Attack,
                DurationClass::Usage,
                TokenCategory::Positive,
                TokenEffect::Outgoing(1.5),
            )],
            ..CatalogData::default()
        };
        let catalog = Catalog::from_data(data).unwrap();
        let mut ledger = TokenLedger::new();

        let events = ledger.add(&catalog, TokenId::Blur, 1, None);

        assert!(events.is_empty());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_remove_and_consume() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();
        ledger.add(&catalog, TokenId::Attack, 2, None);

        assert!(ledger.remove(TokenId::Attack, DurationClass::Turn, 1).is_empty());
        assert_eq!(ledger.remove(TokenId::Attack, DurationClass::Usage, 1).len(), 1);
        assert_eq!(ledger.stacks(TokenId::Attack), 1);

        assert!(ledger.consume(TokenId::Attack).is_some());
        assert!(!ledger.has(TokenId::Attack));
        assert!(ledger.consume(TokenId::Attack).is_none());
    }

    #[test]
    fn test_remove_more_than_present() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();
        ledger.add(&catalog, TokenId::Focus, 2, None);

        let events = ledger.remove(TokenId::Focus, DurationClass::Permanent, 10);

        assert!(!ledger.has(TokenId::Focus));
        assert_eq!(
            events,
            vec![TokenEvent::Removed {
                token: TokenId::Focus,
                stacks: 2,
                reason: RemovalReason::Removed
            }]
        );
    }

    #[test]
    fn test_clear_turn_tokens_keeps_anchored() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();
        ledger.add(&catalog, TokenId::Counter, 1, None);
        ledger.add(&catalog, TokenId::PersistentStrike, 1, Some(TimelinePoint::new(1, 8)));
        ledger.add(&catalog, TokenId::Focus, 1, None);

        let events = ledger.clear_turn_tokens();

        assert_eq!(events.len(), 1);
        assert!(!ledger.has(TokenId::Counter));
        assert!(ledger.has(TokenId::PersistentStrike));
        assert!(ledger.has(TokenId::Focus));
    }

    #[test]
    fn test_expire_by_timeline() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();
        ledger.add(&catalog, TokenId::PersistentStrike, 1, Some(TimelinePoint::new(1, 8)));

        assert!(ledger.expire_by_timeline(TimelinePoint::new(1, 20)).is_empty());
        assert!(ledger.expire_by_timeline(TimelinePoint::new(2, 7)).is_empty());
        assert_eq!(ledger.expire_by_timeline(TimelinePoint::new(2, 8)).len(), 1);
        assert!(!ledger.has(TokenId::PersistentStrike));
    }

    #[test]
    fn test_expire_overdue() {
        let catalog = catalog();
        let mut ledger = TokenLedger::new();
        ledger.add(&catalog, TokenId::PersistentStrike, 1, Some(TimelinePoint::new(3, 30)));

        assert!(ledger.expire_overdue(3).is_empty());
        assert_eq!(ledger.expire_overdue(4).len(), 1);
    }
}

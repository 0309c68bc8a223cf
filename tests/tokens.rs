//! Token ledger integration tests against the standard token catalog.

use ether_battle::catalog::{Catalog, DurationClass, TokenId};
use ether_battle::tokens::{BlockReason, RemovalReason, TimelinePoint, TokenEvent, TokenLedger};

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_opposites_cancel_stack_for_stack() {
    let catalog = Catalog::standard();
    let mut ledger = TokenLedger::new();
    ledger.add(&catalog, TokenId::Attack, 2, None);

    let events = ledger.add(&catalog, TokenId::Dull, 3, None);

    assert_eq!(
        events,
        vec![
            TokenEvent::Cancelled {
                incoming: TokenId::Dull,
                opposing: TokenId::Attack,
                cancelled: 2,
            },
            TokenEvent::Removed {
                token: TokenId::Attack,
                stacks: 2,
                reason: RemovalReason::Cancelled,
            },
            TokenEvent::Added {
                token: TokenId::Dull,
                stacks: 1,
                total: 1,
            },
        ]
    );
    assert!(!ledger.has(TokenId::Attack));
    assert_eq!(ledger.stacks(TokenId::Dull), 1);
}

#[test]
fn test_smaller_incoming_is_absorbed() {
    let catalog = Catalog::standard();
    let mut ledger = TokenLedger::new();
    ledger.add(&catalog, TokenId::Guarded, 3, None);

    let events = ledger.add(&catalog, TokenId::Vulnerable, 1, None);

    assert_eq!(events.len(), 1);
    assert_eq!(ledger.stacks(TokenId::Guarded), 2);
    assert!(!ledger.has(TokenId::Vulnerable));
}

// =============================================================================
// Immunity
// =============================================================================

#[test]
fn test_immunity_blocks_one_negative_add() {
    let catalog = Catalog::standard();
    let mut ledger = TokenLedger::new();
    ledger.add(&catalog, TokenId::Immunity, 1, None);
    ledger.add(&catalog, TokenId::Attack, 1, None);

    let blocked = ledger.add(&catalog, TokenId::Dull, 1, None);
    assert!(blocked.contains(&TokenEvent::Blocked {
        token: TokenId::Dull,
        reason: BlockReason::Immunity,
    }));
    // Immunity intercepts before cancellation: Attack survives.
    assert_eq!(ledger.stacks(TokenId::Attack), 1);
    assert!(!ledger.has(TokenId::Immunity));

    ledger.add(&catalog, TokenId::Vulnerable, 1, None);
    assert_eq!(ledger.stacks(TokenId::Vulnerable), 1);
}

#[test]
fn test_immunity_ignores_positive_tokens() {
    let catalog = Catalog::standard();
    let mut ledger = TokenLedger::new();
    ledger.add(&catalog, TokenId::Immunity, 1, None);

    ledger.add(&catalog, TokenId::Dodge, 1, None);

    assert_eq!(ledger.stacks(TokenId::Immunity), 1);
    assert_eq!(ledger.stacks(TokenId::Dodge), 1);
}

// =============================================================================
// Focus and Jammed
// =============================================================================

#[test]
fn test_jammed_evicts_and_locks_out_focus() {
    let catalog = Catalog::standard();
    let mut ledger = TokenLedger::new();
    ledger.add(&catalog, TokenId::Focus, 2, None);
    ledger.add(&catalog, TokenId::Focus, 1, None);
    assert_eq!(ledger.stacks(TokenId::Focus), 3);

    let events = ledger.add(&catalog, TokenId::Jammed, 4, None);
    assert!(events.contains(&TokenEvent::Removed {
        token: TokenId::Focus,
        stacks: 3,
        reason: RemovalReason::Evicted,
    }));
    assert_eq!(ledger.stacks(TokenId::Jammed), 1);

    let refused = ledger.add(&catalog, TokenId::Focus, 1, None);
    assert_eq!(
        refused,
        vec![TokenEvent::Blocked {
            token: TokenId::Focus,
            reason: BlockReason::Jammed,
        }]
    );

    let again = ledger.add(&catalog, TokenId::Jammed, 1, None);
    assert_eq!(
        again,
        vec![TokenEvent::Blocked {
            token: TokenId::Jammed,
            reason: BlockReason::AlreadyPresent,
        }]
    );

    // Jammed is turn-scoped; once it clears, Focus can accumulate again.
    ledger.clear_turn_tokens();
    ledger.add(&catalog, TokenId::Focus, 1, None);
    assert_eq!(ledger.stacks(TokenId::Focus), 1);
}

// =============================================================================
// Expiry
// =============================================================================

#[test]
fn test_duration_buckets() {
    let catalog = Catalog::standard();
    let mut ledger = TokenLedger::new();
    ledger.add(&catalog, TokenId::Attack, 1, None);
    ledger.add(&catalog, TokenId::Blur, 1, None);
    ledger.add(&catalog, TokenId::Focus, 1, None);

    assert_eq!(ledger.bucket(DurationClass::Usage).len(), 1);
    assert_eq!(ledger.bucket(DurationClass::Turn).len(), 1);
    assert_eq!(ledger.bucket(DurationClass::Permanent).len(), 1);

    let cleared = ledger.clear_turn_tokens();
    assert_eq!(cleared.len(), 1);
    assert!(ledger.has(TokenId::Attack));
    assert!(!ledger.has(TokenId::Blur));
    assert!(ledger.has(TokenId::Focus));
}

#[test]
fn test_anchored_token_expires_by_timeline() {
    let catalog = Catalog::standard();
    let mut ledger = TokenLedger::new();
    ledger.add(&catalog, TokenId::PersistentStrike, 1, Some(TimelinePoint::new(1, 5)));

    assert!(ledger.clear_turn_tokens().is_empty());
    assert!(ledger.expire_by_timeline(TimelinePoint::new(1, 9)).is_empty());
    assert!(ledger.expire_by_timeline(TimelinePoint::new(2, 4)).is_empty());

    let expired = ledger.expire_by_timeline(TimelinePoint::new(2, 5));
    assert_eq!(
        expired,
        vec![TokenEvent::Removed {
            token: TokenId::PersistentStrike,
            stacks: 1,
            reason: RemovalReason::Timeline,
        }]
    );
    assert!(ledger.is_empty());
}

#[test]
fn test_anchor_not_reached_expires_at_next_turn_end() {
    let catalog = Catalog::standard();
    let mut ledger = TokenLedger::new();
    ledger.add(&catalog, TokenId::PersistentStrike, 2, Some(TimelinePoint::new(3, 20)));

    assert!(ledger.expire_overdue(3).is_empty());
    assert_eq!(ledger.expire_overdue(4).len(), 1);
    assert!(ledger.is_empty());
}

#[test]
fn test_consume_only_touches_usage_bucket() {
    let catalog = Catalog::standard();
    let mut ledger = TokenLedger::new();
    ledger.add(&catalog, TokenId::Dodge, 2, None);
    ledger.add(&catalog, TokenId::Blur, 1, None);

    assert!(ledger.consume(TokenId::Dodge).is_some());
    assert_eq!(ledger.stacks(TokenId::Dodge), 1);
    assert!(ledger.consume(TokenId::Blur).is_none());

    ledger.consume(TokenId::Dodge);
    assert!(!ledger.has(TokenId::Dodge));
    assert!(ledger.iter().all(|t| t.stacks() > 0));
}

//! Stacking status effects.
//!
//! A `TokenLedger` belongs to one combatant and enforces:
//!
//! - stacks are always >= 1 while a token exists (`NonZeroU32`)
//! - opposite pairs cancel 1:1 on add, never leaving both present
//! - immunity blocks the next negative add before cancellation
//! - turn tokens expire at turn end, or at a timeline point when anchored

pub mod instance;
pub mod ledger;

pub use instance::{TimelinePoint, TokenInstance};
pub use ledger::{BlockReason, RemovalReason, TokenBucket, TokenEvent, TokenLedger};

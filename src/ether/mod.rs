//! Soul/grace economy.
//!
//! ## Key Types
//!
//! - `transfer`: turn-end settlement with shields, overkill and the
//!   defeated-opponent remainder
//! - `convert_overkill`: overkill slots into reward tokens
//! - `EtherState`: the battle's pools and the opponent's `GraceAbility`

pub mod overkill;
pub mod state;
pub mod transfer;

pub use overkill::{convert_overkill, overkill_slots, OverkillReward};
pub use state::{EtherState, GraceAbility};
pub use transfer::{transfer, ShieldState, TransferInput, TransferOutcome};

//! # ether-battle
//!
//! Turn-resolution core of a timeline card battler, plus a headless
//! balance simulator that replays it in bulk.
//!
//! ## Design Principles
//!
//! 1. **Explicit catalog**: Card, token and encounter tables live in an
//!    immutable `Catalog` passed to every entry point. Nothing global.
//!
//! 2. **Degrade, don't fail**: Bad ids and missing definitions during a
//!    battle are logged with `tracing` and skipped. Only catalog loading
//!    returns errors.
//!
//! 3. **Seeded randomness**: Each battle owns a `BattleRng`; the same seed
//!    replays the same battle.
//!
//! ## Modules
//!
//! - `core`: Sides, handles, RNG, configuration, the event stream
//! - `catalog`: Static card/token/enemy data and JSON loading
//! - `tokens`: Status-effect instances and the per-combatant ledger
//! - `combat`: Combatant state and single-card resolution
//! - `timeline`: Speed timeline scheduling and rewriting
//! - `combo`: Poker-style combos, hand scoring, deflation
//! - `ether`: Soul/grace settlement, shields, overkill
//! - `battle`: Turn driver and card-choosing policies
//! - `sim`: Parallel balance simulation

pub mod battle;
pub mod catalog;
pub mod combat;
pub mod combo;
pub mod core;
pub mod ether;
pub mod sim;
pub mod timeline;
pub mod tokens;

// Re-export commonly used types
pub use crate::core::{BattleConfig, BattleEvent, BattleRng, CombatantId, Side, SideMap, Winner};

pub use crate::catalog::{CardDef, CardId, Catalog, CatalogError, EnemyDef, EnemyId, TokenDef, TokenId};

pub use crate::tokens::{TimelinePoint, TokenEvent, TokenInstance, TokenLedger};

pub use crate::combat::{apply_action, BattleContext, CombatantState, Combatants, Stats};

pub use crate::timeline::{QueueEntry, Timeline, TimelineChanges};

pub use crate::combo::{detect_combo, score_with_combo, AiMode, ComboKind, ComboResult, DeflationTracker};

pub use crate::ether::{transfer, EtherState, TransferInput, TransferOutcome};

pub use crate::battle::{Battle, BattleResult, CardPolicy, ComboPolicy, RandomPolicy};

pub use crate::sim::{BalanceSimulator, SimConfig, SimReport};

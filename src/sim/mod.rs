//! Offline balance simulator.
//!
//! ## Key Types
//!
//! - `BalanceSimulator`: runs seeded battles in parallel with rayon
//! - `SimReport`: win/loss/draw counts, averages, per-card win rates and
//!   the overpowered-card list
//! - `SweepReport`: win rate as one player stat is varied
//!
//! Battles share nothing but an `Arc<Catalog>`. Battle `i` of a batch is
//! always seeded `seed_offset + i`.

pub mod config;
pub mod report;
pub mod runner;

pub use config::SimConfig;
pub use report::{CardStats, SimReport, StatKind, SweepPoint, SweepReport};
pub use runner::BalanceSimulator;

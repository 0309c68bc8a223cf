//! Combo detection, hand scoring and deflation.
//!
//! ## Key Types
//!
//! - `ComboKind`: high card < pair < two pair < triple < flush <
//!   full house < four of a kind < five of a kind
//! - `detect_combo`: classify a played set of cards
//! - `score_with_combo` / `choose_hand`: AI hand ranking under an action budget
//! - `DeflationTracker`: diminishing returns per combo kind

pub mod deflation;
pub mod detect;
pub mod score;

pub use deflation::DeflationTracker;
pub use detect::{detect_combo, ComboKind, ComboResult};
pub use score::{choose_hand, score_with_combo, AiMode, ScoreOptions};

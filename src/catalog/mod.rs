//! Static data: cards, tokens, encounters and cancellation pairs.
//!
//! ## Key Types
//!
//! - `CardDef`: Immutable card template
//! - `TokenDef`: Duration class, category and numeric effect of a token
//! - `EnemyDef`: An encounter (units, deck, pools, AI temperament)
//! - `Catalog`: Validated, read-only tables passed explicitly to every
//!   entry point
//!
//! Special effects, traits and token ids are closed enums: a typo in a
//! catalog file fails JSON parsing instead of silently doing nothing.

pub mod card;
pub mod enemy;
pub mod error;
pub mod registry;
pub mod standard;
pub mod token;

pub use card::{CardDef, CardId, CardKind, CardTrait, GrantTarget, SpecialEffect, TokenGrant};
pub use enemy::{EnemyDef, EnemyId, UnitDef};
pub use error::CatalogError;
pub use registry::{Catalog, CatalogData};
pub use token::{DurationClass, TokenCategory, TokenDef, TokenEffect, TokenId};

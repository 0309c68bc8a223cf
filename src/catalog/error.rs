//! Static-data loading errors.
//!
//! Loading the catalog is the only place the crate can fail hard. Once a
//! `Catalog` exists, every battle operation degrades to a logged no-op
//! instead of returning an error.

use super::card::CardId;
use super::enemy::EnemyId;
use super::token::TokenId;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("card {0} is defined more than once")]
    DuplicateCard(CardId),

    #[error("enemy {0} is defined more than once")]
    DuplicateEnemy(EnemyId),

    #[error("token {0} is defined more than once")]
    DuplicateToken(TokenId),

    #[error("{owner} references unknown card {card}")]
    UnknownCard { owner: String, card: CardId },

    #[error("{owner} references token {token} which has no definition")]
    UndefinedToken { owner: String, token: TokenId },

    #[error("enemy {0} has no units")]
    EmptyEncounter(EnemyId),

    #[error("token {0} is paired as its own opposite")]
    SelfOpposite(TokenId),

    #[error("no encounter named {0:?}")]
    UnknownEnemy(String),
}

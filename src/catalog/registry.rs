//! The immutable catalog threaded through every entry point.
//!
//! A `Catalog` is built once (from the standard set or from JSON),
//! validated, and then shared read-only, typically behind an `Arc`, by
//! every battle the simulator runs.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::{CardDef, CardId};
use super::enemy::{EnemyDef, EnemyId};
use super::error::CatalogError;
use super::token::{TokenDef, TokenId};

/// Serialized shape of a catalog file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub cards: Vec<CardDef>,
    pub tokens: Vec<TokenDef>,
    pub enemies: Vec<EnemyDef>,
    /// Cancelling pairs; each pair works in both directions.
    pub opposites: Vec<(TokenId, TokenId)>,
    /// The player's deck when a battle does not supply one.
    pub starter_deck: Vec<CardId>,
}

/// Read-only card, token and enemy tables.
///
/// ```
/// use ether_battle::catalog::{Catalog, TokenId};
///
/// let catalog = Catalog::standard();
/// assert_eq!(catalog.opposite(TokenId::Attack), Some(TokenId::Dull));
/// assert_eq!(catalog.opposite(TokenId::Dull), Some(TokenId::Attack));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    cards: FxHashMap<CardId, CardDef>,
    tokens: FxHashMap<TokenId, TokenDef>,
    enemies: FxHashMap<EnemyId, EnemyDef>,
    opposites: FxHashMap<TokenId, TokenId>,
    starter_deck: Vec<CardId>,
}

impl Catalog {
    /// Build and validate a catalog.
    pub fn from_data(data: CatalogData) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for token in data.tokens {
            if catalog.tokens.contains_key(&token.id) {
                return Err(CatalogError::DuplicateToken(token.id));
            }
            catalog.tokens.insert(token.id, token);
        }

        for (a, b) in data.opposites {
            if a == b {
                return Err(CatalogError::SelfOpposite(a));
            }
            for id in [a, b] {
                if !catalog.tokens.contains_key(&id) {
                    return Err(CatalogError::UndefinedToken {
                        owner: "opposite pair".to_string(),
                        token: id,
                    });
                }
            }
            catalog.opposites.insert(a, b);
            catalog.opposites.insert(b, a);
        }

        for card in data.cards {
            if catalog.cards.contains_key(&card.id) {
                return Err(CatalogError::DuplicateCard(card.id));
            }
            for grant in &card.grants {
                if !catalog.tokens.contains_key(&grant.token) {
                    return Err(CatalogError::UndefinedToken {
                        owner: card.name.clone(),
                        token: grant.token,
                    });
                }
            }
            catalog.cards.insert(card.id, card);
        }

        for enemy in data.enemies {
            if catalog.enemies.contains_key(&enemy.id) {
                return Err(CatalogError::DuplicateEnemy(enemy.id));
            }
            if enemy.units.is_empty() {
                return Err(CatalogError::EmptyEncounter(enemy.id));
            }
            catalog.check_deck(&enemy.name, &enemy.deck)?;
            catalog.enemies.insert(enemy.id, enemy);
        }

        catalog.check_deck("starter deck", &data.starter_deck)?;
        catalog.starter_deck = data.starter_deck;

        Ok(catalog)
    }

    /// Parse and validate a JSON catalog.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Read, parse and validate a JSON catalog file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn check_deck(&self, owner: &str, deck: &[CardId]) -> Result<(), CatalogError> {
        match deck.iter().find(|id| !self.cards.contains_key(id)) {
            Some(&card) => Err(CatalogError::UnknownCard {
                owner: owner.to_string(),
                card,
            }),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&CardDef> {
        self.cards.get(&id)
    }

    #[must_use]
    pub fn token(&self, id: TokenId) -> Option<&TokenDef> {
        self.tokens.get(&id)
    }

    #[must_use]
    pub fn enemy(&self, id: EnemyId) -> Option<&EnemyDef> {
        self.enemies.get(&id)
    }

    /// Case-insensitive lookup by encounter name.
    #[must_use]
    pub fn enemy_by_name(&self, name: &str) -> Option<&EnemyDef> {
        self.enemies.values().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// The token that cancels against `id`, if any.
    #[must_use]
    pub fn opposite(&self, id: TokenId) -> Option<TokenId> {
        self.opposites.get(&id).copied()
    }

    #[must_use]
    pub fn starter_deck(&self) -> &[CardId] {
        &self.starter_deck
    }

    /// All card templates, in id order.
    pub fn cards(&self) -> impl Iterator<Item = &CardDef> {
        let mut cards: Vec<_> = self.cards.values().collect();
        cards.sort_by_key(|c| c.id);
        cards.into_iter()
    }

    /// All encounters, in id order.
    pub fn enemies(&self) -> impl Iterator<Item = &EnemyDef> {
        let mut enemies: Vec<_> = self.enemies.values().collect();
        enemies.sort_by_key(|e| e.id);
        enemies.into_iter()
    }

    /// Tokens that overkill conversion may hand out, in id order.
    #[must_use]
    pub fn reward_tokens(&self) -> Vec<TokenId> {
        let mut ids: Vec<_> = self
            .tokens
            .values()
            .filter(|t| t.reward)
            .map(|t| t.id)
            .collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CardKind, DurationClass, TokenCategory, TokenEffect};
    use crate::combat::Stats;

    fn attack_token() -> TokenDef {
        TokenDef::new(TokenId::Attack, DurationClass::Usage, TokenCategory::Positive, TokenEffect::Outgoing(1.5))
    }

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = Catalog::standard();
        assert!(catalog.card_count() > 10);
        assert!(!catalog.starter_deck().is_empty());
        for token in TokenId::ALL {
            assert!(catalog.token(token).is_some(), "{token} has no definition");
        }
        assert!(catalog.enemy_by_name("GOBLIN").is_some());
    }

    #[test]
    fn test_duplicate_card_rejected() {
        let data = CatalogData {
            cards: vec![
                CardDef::attack(CardId::new(1), "A", 5),
                CardDef::attack(CardId::new(1), "B", 6),
            ],
            ..CatalogData::default()
        };

        assert!(matches!(
            Catalog::from_data(data),
            Err(CatalogError::DuplicateCard(CardId(1)))
        ));
    }

    #[test]
    fn test_unknown_deck_card_rejected() {
        let data = CatalogData {
            enemies: vec![EnemyDef::new(EnemyId(1), "Ghost")
                .with_unit("Ghost", 10, Stats::default())
                .with_deck([CardId::new(99)])],
            ..CatalogData::default()
        };

        let err = Catalog::from_data(data).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCard { card: CardId(99), .. }));
        assert!(err.to_string().contains("Ghost"));
    }

    #[test]
    fn test_opposite_requires_definitions() {
        let data = CatalogData {
            tokens: vec![attack_token()],
            opposites: vec![(TokenId::Attack, TokenId::Dull)],
            ..CatalogData::default()
        };

        assert!(matches!(
            Catalog::from_data(data),
            Err(CatalogError::UndefinedToken { token: TokenId::Dull, .. })
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "cards": [{"id": 1, "name": "Jab", "kind": "attack", "damage": 4, "speed_cost": 2, "action_cost": 1}],
            "starter_deck": [1, 1]
        }"#;

        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.card(CardId::new(1)).map(|c| c.kind), Some(CardKind::Attack));
        assert_eq!(catalog.starter_deck().len(), 2);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(Catalog::from_json("{"), Err(CatalogError::Json(_))));
    }
}

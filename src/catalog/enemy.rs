//! Enemy encounter templates.

use serde::{Deserialize, Serialize};

use super::card::CardId;
use crate::combat::Stats;
use crate::combo::AiMode;
use crate::ether::GraceAbility;

/// Identifier for an enemy encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

impl std::fmt::Display for EnemyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Enemy({})", self.0)
    }
}

/// One body on the opponent side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitDef {
    pub name: String,
    pub hp: i32,
    #[serde(default)]
    pub stats: Stats,
}

/// An encounter: the units, their shared deck, pools and AI temperament.
///
/// The first unit is the primary one; the encounter is over when every
/// unit is down.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub id: EnemyId,
    pub name: String,
    pub units: Vec<UnitDef>,
    pub deck: Vec<CardId>,

    /// Opponent soul-equivalent pool the player can drain.
    #[serde(default)]
    pub soul: u32,

    #[serde(default)]
    pub ai_mode: AiMode,

    #[serde(default)]
    pub grace_ability: Option<GraceAbility>,
}

impl EnemyDef {
    #[must_use]
    pub fn new(id: EnemyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            units: Vec::new(),
            deck: Vec::new(),
            soul: 0,
            ai_mode: AiMode::default(),
            grace_ability: None,
        }
    }

    #[must_use]
    pub fn with_unit(mut self, name: impl Into<String>, hp: i32, stats: Stats) -> Self {
        self.units.push(UnitDef {
            name: name.into(),
            hp,
            stats,
        });
        self
    }

    #[must_use]
    pub fn with_deck(mut self, deck: impl IntoIterator<Item = CardId>) -> Self {
        self.deck = deck.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_soul(mut self, soul: u32) -> Self {
        self.soul = soul;
        self
    }

    #[must_use]
    pub fn with_ai_mode(mut self, mode: AiMode) -> Self {
        self.ai_mode = mode;
        self
    }

    #[must_use]
    pub fn with_grace_ability(mut self, ability: GraceAbility) -> Self {
        self.grace_ability = Some(ability);
        self
    }
}

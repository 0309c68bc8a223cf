//! Card templates - static card data.
//!
//! `CardDef` holds the immutable properties of a card: its kind, base
//! numbers, timeline cost, combo rank and any special behaviour. Runtime
//! data (which side played it, where it sits on the timeline) lives in
//! `timeline::QueueEntry`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::token::TokenId;

/// Unique identifier for a card template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// What a card does when it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardKind {
    Attack,
    Defense,
    Support,
}

impl CardKind {
    /// Combo suit: attacks form one suit, everything else the other.
    #[must_use]
    pub const fn is_attack(self) -> bool {
        matches!(self, CardKind::Attack)
    }
}

/// Special behaviour an attack card can carry.
///
/// Applied as preprocessing before base damage is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpecialEffect {
    /// Damage skips the defender's block entirely.
    IgnoreBlock,
    /// Defender's block is set to 0 before damage lands.
    ClearAllBlock,
    /// Card damage doubles when it is the only attack its side played this turn.
    DoubleIfSoloAttack,
    /// Attacker's agility is added as flat damage.
    AgilityBonus,
    /// A defender below 10% of max hp is reduced to 0.
    Execute,
    /// One extra hit when this is its side's last card of the turn.
    RepeatOnLastCard,
    /// One extra hit per attack card left unplayed in hand.
    RepeatPerUnusedAttack,
    /// Defender becomes vulnerable if it had no block when hit.
    VulnerableIfUnblocked,
    /// Attacker gains a persistent-strike stack anchored to this timeline point.
    PersistentStrike,
    /// Defender's next ether gain is halved.
    HalveEtherGain,
}

/// Timeline-facing traits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardTrait {
    /// Destroys itself and an opponent entry scheduled at the exact same position.
    DestroyOnCollision,
    /// Pulls its side's remaining entries earlier by the given amount.
    Swift(i32),
    /// Pushes every remaining enemy entry later by the given amount.
    Stagger(i32),
    /// Pushes only the last remaining enemy entry later.
    Knockback(i32),
    /// Duplicates the player's remaining entries after everything else.
    Echo,
}

/// Who receives a granted token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GrantTarget {
    /// The card's user.
    User,
    /// The card's target.
    Target,
}

/// A token a card hands out when it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenGrant {
    pub token: TokenId,
    pub stacks: u32,
    pub target: GrantTarget,
}

fn one() -> u32 {
    1
}

/// Static card template.
///
/// ```
/// use ether_battle::catalog::{CardDef, CardId, CardKind};
///
/// let slash = CardDef::attack(CardId::new(1), "Slash", 12)
///     .with_speed(4)
///     .with_cost(2);
///
/// assert_eq!(slash.kind, CardKind::Attack);
/// assert_eq!(slash.speed_cost, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDef {
    pub id: CardId,
    pub name: String,
    pub kind: CardKind,

    #[serde(default)]
    pub damage: i32,

    #[serde(default)]
    pub block: i32,

    #[serde(default = "one")]
    pub hits: u32,

    #[serde(default)]
    pub heal: i32,

    /// Distance this card occupies on its side's timeline.
    pub speed_cost: i32,

    /// Resource cost to play; doubles as the combo rank.
    pub action_cost: u32,

    /// Ether points yielded at settlement. 0 falls back to the configured base.
    #[serde(default)]
    pub ether: u32,

    #[serde(default)]
    pub special: Option<SpecialEffect>,

    #[serde(default)]
    pub traits: SmallVec<[CardTrait; 2]>,

    #[serde(default)]
    pub grants: SmallVec<[TokenGrant; 2]>,
}

impl CardDef {
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, kind: CardKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            damage: 0,
            block: 0,
            hits: 1,
            heal: 0,
            speed_cost: 5,
            action_cost: 1,
            ether: 0,
            special: None,
            traits: SmallVec::new(),
            grants: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn attack(id: CardId, name: impl Into<String>, damage: i32) -> Self {
        let mut card = Self::new(id, name, CardKind::Attack);
        card.damage = damage;
        card
    }

    #[must_use]
    pub fn defense(id: CardId, name: impl Into<String>, block: i32) -> Self {
        let mut card = Self::new(id, name, CardKind::Defense);
        card.block = block;
        card
    }

    #[must_use]
    pub fn support(id: CardId, name: impl Into<String>) -> Self {
        Self::new(id, name, CardKind::Support)
    }

    #[must_use]
    pub fn with_speed(mut self, speed_cost: i32) -> Self {
        self.speed_cost = speed_cost;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, action_cost: u32) -> Self {
        self.action_cost = action_cost;
        self
    }

    #[must_use]
    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = hits;
        self
    }

    #[must_use]
    pub fn with_heal(mut self, heal: i32) -> Self {
        self.heal = heal;
        self
    }

    #[must_use]
    pub fn with_ether(mut self, ether: u32) -> Self {
        self.ether = ether;
        self
    }

    #[must_use]
    pub fn with_special(mut self, special: SpecialEffect) -> Self {
        self.special = Some(special);
        self
    }

    #[must_use]
    pub fn with_trait(mut self, card_trait: CardTrait) -> Self {
        self.traits.push(card_trait);
        self
    }

    #[must_use]
    pub fn with_grant(mut self, token: TokenId, stacks: u32, target: GrantTarget) -> Self {
        self.grants.push(TokenGrant {
            token,
            stacks,
            target,
        });
        self
    }

    #[must_use]
    pub fn has_trait(&self, wanted: CardTrait) -> bool {
        self.traits.contains(&wanted)
    }

    /// Ether points this card contributes, falling back to `base`.
    #[must_use]
    pub fn ether_points(&self, base: u32) -> u32 {
        if self.ether == 0 {
            base
        } else {
            self.ether
        }
    }
}

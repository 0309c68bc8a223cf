//! Token templates.
//!
//! Token ids form a closed set; what each one does numerically comes
//! from its `TokenDef` in the catalog, so balance passes can retune
//! values without touching code.

use serde::{Deserialize, Serialize};

/// Every status effect the engine knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenId {
    Attack,
    Dull,
    Defense,
    Shaken,
    Guarded,
    Vulnerable,
    Dodge,
    Blur,
    Counter,
    Immunity,
    Focus,
    Jammed,
    PersistentStrike,
    HalfEther,
}

impl TokenId {
    pub const ALL: [TokenId; 14] = [
        TokenId::Attack,
        TokenId::Dull,
        TokenId::Defense,
        TokenId::Shaken,
        TokenId::Guarded,
        TokenId::Vulnerable,
        TokenId::Dodge,
        TokenId::Blur,
        TokenId::Counter,
        TokenId::Immunity,
        TokenId::Focus,
        TokenId::Jammed,
        TokenId::PersistentStrike,
        TokenId::HalfEther,
    ];
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// How long a token lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DurationClass {
    /// Loses a stack each time it modifies an action.
    Usage,
    /// Expires at turn end, or at a timeline point when one was recorded.
    Turn,
    /// Stays until explicitly removed.
    Permanent,
}

/// Buff or debuff. Immunity only intercepts negative tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenCategory {
    Positive,
    Negative,
}

/// What a token does while present.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum TokenEffect {
    /// Multiplies the owner's outgoing attack damage.
    Outgoing(f64),
    /// Multiplies damage the owner receives.
    Incoming(f64),
    /// Multiplies block the owner gains.
    BlockGain(f64),
    /// Chance to avoid an attack entirely.
    Dodge(f64),
    /// Flat damage reflected at attackers.
    Counter(i32),
    /// Flat damage added to the owner's attacks, per stack.
    FlatDamage(i32),
    /// Multiplies the owner's next ether gain.
    EtherGain(f64),
    /// Absorbs the next negative token.
    Immunity,
    /// No numeric effect; handled by per-id rules.
    Marker,
}

/// Static token definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenDef {
    pub id: TokenId,
    pub duration: DurationClass,
    pub category: TokenCategory,
    pub effect: TokenEffect,

    /// Eligible as an overkill reward.
    #[serde(default)]
    pub reward: bool,
}

impl TokenDef {
    #[must_use]
    pub fn new(id: TokenId, duration: DurationClass, category: TokenCategory, effect: TokenEffect) -> Self {
        Self {
            id,
            duration,
            category,
            effect,
            reward: false,
        }
    }

    #[must_use]
    pub fn rewardable(mut self) -> Self {
        self.reward = true;
        self
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.category == TokenCategory::Negative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_exhaustive_and_unique() {
        let mut ids = TokenId::ALL.to_vec();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), TokenId::ALL.len());
    }

    #[test]
    fn test_effect_json_shape() {
        let json = serde_json::to_string(&TokenEffect::Outgoing(1.5)).unwrap();
        assert_eq!(json, r#"{"type":"outgoing","value":1.5}"#);

        let marker: TokenEffect = serde_json::from_str(r#"{"type":"marker"}"#).unwrap();
        assert_eq!(marker, TokenEffect::Marker);
    }
}

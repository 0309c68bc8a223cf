//! Battle configuration.
//!
//! Every tunable number of the turn driver and the ether economy lives
//! here rather than in the code that uses it, so the balance simulator
//! can sweep them without touching the catalog.

use serde::{Deserialize, Serialize};

/// Tunables for one battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Cards each side holds after drawing at turn start.
    pub hand_size: usize,

    /// Action points per turn; a card costs its `action_cost`.
    pub action_points: u32,

    /// Turn limit. Reaching it ends the battle in a draw.
    pub max_turns: u32,

    /// Player hp at battle start.
    pub player_max_hp: i32,

    /// Keep block across turn boundaries instead of resetting it.
    pub block_persists: bool,

    /// Ether points a card yields when its own `ether` field is zero.
    pub base_card_ether: u32,

    /// Per-use decay of a combo's ether gain (diminishing returns).
    pub deflation_rate: f64,

    /// Lowest multiplier deflation can reach.
    pub deflation_floor: f64,

    /// Overkill below this yields nothing; it is also the first slot's cost.
    pub overkill_threshold: u32,

    /// Geometric growth of each further overkill slot's cost.
    pub overkill_growth: f64,

    /// Emptying the opponent's soul pool wins the battle.
    pub ether_victory: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            hand_size: 5,
            action_points: 6,
            max_turns: 30,
            player_max_hp: 100,
            block_persists: false,
            base_card_ether: 10,
            deflation_rate: 0.8,
            deflation_floor: 0.2,
            overkill_threshold: 80,
            overkill_growth: 1.1,
            ether_victory: true,
        }
    }
}

impl BattleConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    #[must_use]
    pub fn with_action_points(mut self, points: u32) -> Self {
        self.action_points = points;
        self
    }

    #[must_use]
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    #[must_use]
    pub fn with_player_max_hp(mut self, hp: i32) -> Self {
        self.player_max_hp = hp;
        self
    }

    #[must_use]
    pub fn with_block_persists(mut self, persists: bool) -> Self {
        self.block_persists = persists;
        self
    }

    #[must_use]
    pub fn with_deflation(mut self, rate: f64, floor: f64) -> Self {
        self.deflation_rate = rate;
        self.deflation_floor = floor;
        self
    }

    #[must_use]
    pub fn with_ether_victory(mut self, enabled: bool) -> Self {
        self.ether_victory = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BattleConfig::default();
        assert_eq!(config.hand_size, 5);
        assert_eq!(config.overkill_threshold, 80);
        assert!((config.overkill_growth - 1.1).abs() < 1e-9);
        assert!(!config.block_persists);
    }

    #[test]
    fn test_builder_pattern() {
        let config = BattleConfig::new()
            .with_hand_size(3)
            .with_max_turns(10)
            .with_deflation(0.5, 0.1);

        assert_eq!(config.hand_size, 3);
        assert_eq!(config.max_turns, 10);
        assert_eq!(config.deflation_rate, 0.5);
        assert_eq!(config.deflation_floor, 0.1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BattleConfig = serde_json::from_str(r#"{"max_turns": 12}"#).unwrap();
        assert_eq!(config.max_turns, 12);
        assert_eq!(config.action_points, 6);
    }
}

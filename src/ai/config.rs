//! Decision engine configuration.

use serde::{Deserialize, Serialize};

/// Weights and limits for the move search and leaf heuristic.
///
/// Every value is caller-tunable; the defaults only make the engine usable
/// out of the box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AIConfig {
    /// Penalty per enemy piece next to the engine's own Flag.
    pub flag_at_risk_multiplier: f32,

    /// Weight of each legal move (mobility).
    pub openness_multiplier: f32,

    /// Weight of each capture, scaled by `2 * win_chance - 1`.
    pub aggression_multiplier: f32,

    /// Bonus for a plain step toward the enemy baseline.
    pub forward_bonus: f32,

    /// Added to the branch in which a capture succeeds.
    pub winning_battle_bonus: f32,

    /// Subtracted from the branch in which a capture fails.
    pub losing_battle_penalty: f32,

    /// Plies searched below each root move (0 = leaf heuristic only).
    pub max_depth: u32,

    /// Magnitude returned for certain-loss captures and finished games.
    pub certain_loss_value: f32,

    /// Spawn heuristic settings.
    pub spawn: SpawnConfig,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            flag_at_risk_multiplier: 50.0,
            openness_multiplier: 0.1,
            aggression_multiplier: 1.0,
            forward_bonus: 0.25,
            winning_battle_bonus: 3.0,
            losing_battle_penalty: 3.0,
            max_depth: 2,
            certain_loss_value: 1000.0,
            spawn: SpawnConfig::default(),
        }
    }
}

impl AIConfig {
    /// Create a new config with custom search depth.
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Create a new config with custom mobility and aggression weights.
    pub fn with_weights(mut self, openness: f32, aggression: f32) -> Self {
        self.openness_multiplier = openness;
        self.aggression_multiplier = aggression;
        self
    }

    /// Create a new config with custom battle bonus and penalty.
    pub fn with_battle_terms(mut self, bonus: f32, penalty: f32) -> Self {
        self.winning_battle_bonus = bonus;
        self.losing_battle_penalty = penalty;
        self
    }

    /// Create a new config with a custom forward bonus.
    pub fn with_forward_bonus(mut self, bonus: f32) -> Self {
        self.forward_bonus = bonus;
        self
    }

    /// Create a new config with a custom flag-at-risk penalty.
    pub fn with_flag_at_risk(mut self, multiplier: f32) -> Self {
        self.flag_at_risk_multiplier = multiplier;
        self
    }

    /// Create a new config with custom spawn settings.
    pub fn with_spawn(mut self, spawn: SpawnConfig) -> Self {
        self.spawn = spawn;
        self
    }
}

/// Probabilities used by the spawn heuristic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Chance the Flag goes on the back row rather than the second row.
    pub back_row_probability: f64,

    /// Chance of the blitz strategy rather than the conservative one.
    pub blitz_probability: f64,

    /// Chance a blitz piece goes to the target flank.
    pub blitz_concentration: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            back_row_probability: 0.75,
            blitz_probability: 0.5,
            blitz_concentration: 0.8,
        }
    }
}

//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

/// Difficulty tiers. Each maps to an iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Search iterations spent per AI move
    pub fn iterations(self) -> u32 {
        match self {
            Difficulty::Easy => 500,
            Difficulty::Medium => 1500,
            Difficulty::Hard => 3000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Parse a tier name, case-insensitive
    pub fn parse(s: &str) -> Option<Difficulty> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Number of select/expand/simulate/backpropagate iterations per search.
    pub iterations: u32,

    /// Exploration constant `c` of the UCB1 term.
    pub exploration: f64,

    /// Weight of the learned Q-value in the selection score.
    pub q_weight: f64,

    /// Q-learning rate (alpha).
    pub learning_rate: f64,

    /// Discount applied to the best child's Q-value (gamma).
    pub discount: f64,

    /// Maximum plies played in one rollout before it is scored by the evaluator.
    pub rollout_depth: u32,

    /// Candidate moves considered per rollout ply.
    pub rollout_candidates: usize,

    /// Iterations between progress reports and cooperative yields.
    pub progress_interval: u32,

    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: Difficulty::Medium.iterations(),
            exploration: std::f64::consts::SQRT_2,
            q_weight: 0.1,
            learning_rate: 0.1,
            discount: 0.9,
            rollout_depth: 50,
            rollout_candidates: 10,
            progress_interval: 50,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// Config whose budget matches a difficulty tier.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::default().with_iterations(difficulty.iterations())
    }

    /// Create a fast, deterministic config for testing.
    pub fn for_testing() -> Self {
        Self {
            iterations: 60,
            rollout_depth: 12,
            progress_interval: 10,
            seed: Some(7),
            ..Self::default()
        }
    }

    /// Builder pattern: set the iteration budget.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder pattern: set the rollout ply cap.
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    /// Builder pattern: set the progress/yield interval.
    pub fn with_progress_interval(mut self, interval: u32) -> Self {
        self.progress_interval = interval;
        self
    }
}

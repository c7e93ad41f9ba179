//! Artifact scoring: heuristic sub-scores and goal-weighted composites

pub mod heuristic;
pub mod weights;

pub use heuristic::{radiation_penalty, HeuristicScore, HeuristicScorer, ScoreBreakdown};
pub use weights::{GoalWeights, WeightTable};

use serde::{Deserialize, Serialize};

/// Tunables for the heuristic scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Missing resistance points that add 1.0 to a kind's importance.
    ///
    /// At 100, importance runs from 1.0 (saturated) to 2.0 (no resistance).
    pub importance_divisor: f64,

    /// Per-goal coefficients
    pub weights: WeightTable,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            importance_divisor: 100.0,
            weights: WeightTable::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.importance_divisor.is_finite() || self.importance_divisor <= 0.0 {
            return Err(format!(
                "importance_divisor must be a positive number (got {})",
                self.importance_divisor
            ));
        }
        self.weights.validate()
    }
}

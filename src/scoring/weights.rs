//! Goal-specific coefficients for combining sub-scores
//!
//! These values are tuning parameters. What must hold is the ordering: each
//! named goal weighs its own sub-score above every other coefficient, and
//! the radiation penalty always subtracts.

use serde::{Deserialize, Serialize};

use super::heuristic::ScoreBreakdown;
use crate::core::types::BuildGoal;

/// Coefficients for one build goal. `radiation_penalty` is a magnitude and is
/// subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalWeights {
    #[serde(default)]
    pub protection: f64,
    #[serde(default)]
    pub endurance: f64,
    #[serde(default)]
    pub durability: f64,
    #[serde(default)]
    pub bleed: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub radiation_penalty: f64,
}

impl GoalWeights {
    pub fn combine(&self, b: &ScoreBreakdown) -> f64 {
        self.protection * b.protection
            + self.endurance * b.endurance
            + self.durability * b.durability
            + self.bleed * b.bleed
            + self.weight * b.weight
            - self.radiation_penalty * b.radiation_penalty
    }

    fn coefficients(&self) -> [(&'static str, f64); 6] {
        [
            ("protection", self.protection),
            ("endurance", self.endurance),
            ("durability", self.durability),
            ("bleed", self.bleed),
            ("weight", self.weight),
            ("radiation_penalty", self.radiation_penalty),
        ]
    }
}

/// Coefficients for every goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub balanced: GoalWeights,
    pub anomaly_protections: GoalWeights,
    pub endurance: GoalWeights,
    pub bleed_resistance: GoalWeights,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            // Moderate mix, protection slightly favoured
            balanced: GoalWeights {
                protection: 1.3,
                endurance: 1.2,
                durability: 1.0,
                bleed: 1.0,
                weight: 1.0,
                radiation_penalty: 0.8,
            },
            anomaly_protections: GoalWeights {
                protection: 2.5,
                endurance: 0.25,
                durability: 0.25,
                bleed: 0.0,
                weight: 0.25,
                radiation_penalty: 0.7,
            },
            endurance: GoalWeights {
                protection: 0.8,
                endurance: 2.0,
                durability: 1.2,
                bleed: 0.0,
                weight: 0.7,
                radiation_penalty: 0.7,
            },
            bleed_resistance: GoalWeights {
                protection: 0.8,
                endurance: 0.5,
                durability: 0.5,
                bleed: 2.0,
                weight: 0.7,
                radiation_penalty: 0.7,
            },
        }
    }
}

impl WeightTable {
    pub fn for_goal(&self, goal: BuildGoal) -> &GoalWeights {
        match goal {
            BuildGoal::Balanced => &self.balanced,
            BuildGoal::AnomalyProtections => &self.anomaly_protections,
            BuildGoal::Endurance => &self.endurance,
            BuildGoal::BleedResistance => &self.bleed_resistance,
        }
    }

    /// Check coefficient signs and that each named goal favours its own
    /// sub-score.
    pub fn validate(&self) -> Result<(), String> {
        for goal in BuildGoal::ALL {
            let weights = self.for_goal(goal);
            for (name, value) in weights.coefficients() {
                if !value.is_finite() || value < 0.0 {
                    return Err(format!(
                        "{} weight for {} must be finite and >= 0 (got {})",
                        name, goal, value
                    ));
                }
            }
            if weights.radiation_penalty <= 0.0 {
                return Err(format!("radiation_penalty weight for {} must be > 0", goal));
            }
        }

        let dominant = [
            (BuildGoal::AnomalyProtections, "protection"),
            (BuildGoal::Endurance, "endurance"),
            (BuildGoal::BleedResistance, "bleed"),
        ];
        for (goal, favoured) in dominant {
            let coefficients = self.for_goal(goal).coefficients();
            let favoured_value = coefficients
                .iter()
                .find(|(name, _)| *name == favoured)
                .map(|(_, v)| *v)
                .unwrap_or(0.0);
            if let Some((name, value)) = coefficients
                .iter()
                .filter(|(name, _)| *name != favoured)
                .find(|(_, v)| *v >= favoured_value)
            {
                return Err(format!(
                    "{} goal must weigh {} ({}) above {} ({})",
                    goal, favoured, favoured_value, name, value
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        assert!(WeightTable::default().validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut table = WeightTable::default();
        table.balanced.weight = -1.0;
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_dominance_enforced() {
        let mut table = WeightTable::default();
        table.endurance.durability = 3.0;
        let err = table.validate().unwrap_err();
        assert!(err.contains("endurance"));
    }

    #[test]
    fn test_zero_radiation_weight_rejected() {
        let mut table = WeightTable::default();
        table.bleed_resistance.radiation_penalty = 0.0;
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_combine_subtracts_radiation() {
        let weights = GoalWeights {
            protection: 1.0,
            endurance: 0.0,
            durability: 0.0,
            bleed: 0.0,
            weight: 0.0,
            radiation_penalty: 0.5,
        };
        let breakdown = ScoreBreakdown {
            protection: 10.0,
            radiation_penalty: 30.0,
            ..Default::default()
        };
        assert_eq!(weights.combine(&breakdown), -5.0);
    }
}

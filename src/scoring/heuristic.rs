//! Heuristic artifact scoring
//!
//! An artifact is scored against the armor's *current* resistances so that a
//! protection stat is worth more where the armor is weak. The six sub-scores
//! are kept alongside the composite: the selector needs the radiation
//! penalty for lead-container assignment and the result view shows all six.

use serde::{Deserialize, Serialize};

use super::ScoringConfig;
use crate::core::types::{BuildGoal, ResistanceKind, Resistances};
use crate::gear::{ArtifactStats, StatKey};

/// Resistance at which a kind counts as saturated
pub const RESISTANCE_CAP: i32 = 100;

/// Additive sub-scores of one artifact
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub protection: f64,
    pub endurance: f64,
    pub durability: f64,
    pub bleed: f64,
    pub weight: f64,
    pub radiation_penalty: f64,
}

/// Composite score plus the breakdown it was built from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicScore {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Scores artifacts with the configured weight table
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    config: ScoringConfig,
}

impl HeuristicScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, stats: &ArtifactStats, current: &Resistances, goal: BuildGoal) -> HeuristicScore {
        let breakdown = self.breakdown(stats, current);
        let score = self.config.weights.for_goal(goal).combine(&breakdown);
        HeuristicScore { score, breakdown }
    }

    pub fn breakdown(&self, stats: &ArtifactStats, current: &Resistances) -> ScoreBreakdown {
        ScoreBreakdown {
            protection: self.protection_score(stats, current),
            endurance: f64::from(stats.bonus(StatKey::Endurance)),
            durability: f64::from(stats.bonus(StatKey::IncreasedDurability)),
            bleed: f64::from(stats.bonus(StatKey::BleedingResistance)),
            weight: f64::from(stats.bonus(StatKey::Weight)),
            radiation_penalty: radiation_penalty(stats),
        }
    }

    /// How much missing resistance an artifact would cover, weighted by how
    /// far below the cap each kind currently is.
    ///
    /// Within one kind only the best feeding stat counts; a second stat on
    /// the same artifact mapping to that kind does not stack here.
    pub fn protection_score(&self, stats: &ArtifactStats, current: &Resistances) -> f64 {
        ResistanceKind::PROTECTABLE
            .into_iter()
            .map(|kind| {
                // widened so extreme negative resistances cannot overflow
                let missing = (i64::from(RESISTANCE_CAP) - i64::from(current[kind])).max(0) as f64;
                let importance = 1.0 + missing / self.config.importance_divisor;
                let best = StatKey::ALL
                    .into_iter()
                    .filter(|key| key.protects() == Some(kind))
                    .map(|key| stats.bonus(key))
                    .max()
                    .unwrap_or(0);
                f64::from(best) * importance
            })
            .sum()
    }
}

/// Radiation emitted beyond what the artifact itself absorbs. Never negative.
pub fn radiation_penalty(stats: &ArtifactStats) -> f64 {
    f64::from((stats.bonus(StatKey::Radiation) - stats.bonus(StatKey::RadioProtection)).max(0))
}

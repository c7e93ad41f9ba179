//! Build generation: select artifacts for an armor and report the outcome
//!
//! [`run_model`] is the entry point the CLI uses. It reads the global config
//! and the process-wide predictor. [`Optimizer`] is the same pipeline with
//! every dependency passed in, which is what tests and benches use.

pub mod result;

pub use result::{unshielded_radiation_balance, BuildResult, RadiationVerdict};

use crate::core::config::{config, OptimizerConfig};
use crate::core::types::BuildGoal;
use crate::gear::{ArmorConfig, Artifact};
use crate::predictor::{global_predictor, PredictorCache};
use crate::scoring::{HeuristicScorer, ScoringConfig};
use crate::selection::{SelectionStrategy, Selector};

pub struct Optimizer<'a> {
    scorer: HeuristicScorer,
    predictor: Option<&'a PredictorCache>,
    strategy: SelectionStrategy,
}

impl<'a> Optimizer<'a> {
    /// Heuristic-only optimizer with the canonical strategy
    pub fn new(scoring: ScoringConfig) -> Self {
        Self {
            scorer: HeuristicScorer::new(scoring),
            predictor: None,
            strategy: SelectionStrategy::default(),
        }
    }

    /// Scoring and strategy from config. The predictor is attached separately.
    pub fn from_config(cfg: &OptimizerConfig) -> Self {
        Self::new(cfg.scoring.clone()).with_strategy(cfg.selection.strategy)
    }

    pub fn with_predictor(mut self, predictor: &'a PredictorCache) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Run with a raw goal label; unknown labels mean Balanced
    pub fn run(&self, armor_config: &ArmorConfig, artifacts: &[Artifact], build_goal: &str) -> BuildResult {
        self.run_goal(armor_config, artifacts, BuildGoal::parse(build_goal))
    }

    pub fn run_goal(&self, armor_config: &ArmorConfig, artifacts: &[Artifact], goal: BuildGoal) -> BuildResult {
        let mut selector = Selector::new(&self.scorer).with_strategy(self.strategy);
        if let Some(predictor) = self.predictor {
            selector = selector.with_predictor(predictor);
        }

        let chosen = selector.select(
            &armor_config.armor,
            artifacts,
            armor_config.slots_selected,
            armor_config.lead_containers_selected,
            goal,
        );
        let result = BuildResult::aggregate(armor_config, goal, chosen);
        tracing::info!(
            armor = %armor_config.armor.name,
            goal = %goal,
            chosen = result.chosen.len(),
            shielded = result.shielded().count(),
            radiation_balance = result.radiation_balance,
            verdict = %result.verdict,
            "generated build"
        );
        result
    }
}

/// Generate a build using the global config and the shared predictor
pub fn run_model(armor_config: &ArmorConfig, artifacts: &[Artifact], build_goal: &str) -> BuildResult {
    Optimizer::from_config(config())
        .with_predictor(global_predictor())
        .run(armor_config, artifacts, build_goal)
}

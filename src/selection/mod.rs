//! Artifact selection for a limited number of slots
//!
//! The canonical strategy is greedy with state: each slot is filled by the
//! best-scoring remaining artifact against the resistances already reached,
//! so later picks stop stacking protection that earlier picks covered.
//! After the slots are filled, the worst radiation emitters go into the
//! lead containers.

use serde::{Deserialize, Serialize};

use crate::core::types::{BuildGoal, Resistances};
use crate::gear::{Armor, Artifact};
use crate::predictor::{FeatureVector, PredictorCache};
use crate::resistance::{apply_artifacts, base_resistances};
use crate::scoring::{HeuristicScorer, ScoreBreakdown};

/// How slots are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Re-score every remaining artifact after each pick
    #[default]
    Iterative,
    /// Score once against the bare armor and take the top N
    OneShot,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub strategy: SelectionStrategy,
}

/// Which scorer produced a candidate's composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Heuristic,
    Predictor,
}

/// An artifact with the score it was picked on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub artifact: Artifact,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub source: ScoreSource,
    /// Placed in a lead container; its radiation is contained
    pub shielded: bool,
}

pub struct Selector<'a> {
    scorer: &'a HeuristicScorer,
    predictor: Option<&'a PredictorCache>,
    strategy: SelectionStrategy,
}

impl<'a> Selector<'a> {
    pub fn new(scorer: &'a HeuristicScorer) -> Self {
        Self {
            scorer,
            predictor: None,
            strategy: SelectionStrategy::default(),
        }
    }

    pub fn with_predictor(mut self, predictor: &'a PredictorCache) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Heuristic breakdown, with the composite replaced by the model's
    /// prediction when one is available.
    pub fn score_candidate(&self, artifact: &Artifact, current: &Resistances, goal: BuildGoal) -> ScoredCandidate {
        let heuristic = self.scorer.score(&artifact.stats, current, goal);
        let predicted = self
            .predictor
            .and_then(|p| p.predict(&FeatureVector::build(current, &artifact.stats, goal)));

        let (score, source) = match predicted {
            Some(score) => (score, ScoreSource::Predictor),
            None => (heuristic.score, ScoreSource::Heuristic),
        };
        ScoredCandidate {
            artifact: artifact.clone(),
            score,
            breakdown: heuristic.breakdown,
            source,
            shielded: false,
        }
    }

    /// Pick at most `min(slots, candidates.len())` artifacts and shield at
    /// most `min(containers, picked)` of them.
    pub fn select(
        &self,
        armor: &Armor,
        candidates: &[Artifact],
        slots: i64,
        containers: i64,
        goal: BuildGoal,
    ) -> Vec<ScoredCandidate> {
        if slots <= 0 || candidates.is_empty() {
            return Vec::new();
        }
        let picks = usize::try_from(slots).unwrap_or(usize::MAX).min(candidates.len());

        let mut chosen = match self.strategy {
            SelectionStrategy::Iterative => self.select_iterative(armor, candidates, picks, goal),
            SelectionStrategy::OneShot => self.select_one_shot(armor, candidates, picks, goal),
        };
        assign_lead_containers(&mut chosen, containers);
        chosen
    }

    fn select_iterative(
        &self,
        armor: &Armor,
        candidates: &[Artifact],
        picks: usize,
        goal: BuildGoal,
    ) -> Vec<ScoredCandidate> {
        let mut current = base_resistances(armor);
        let mut remaining: Vec<&Artifact> = candidates.iter().collect();
        let mut chosen = Vec::with_capacity(picks);

        for slot in 0..picks {
            let mut best: Option<(usize, ScoredCandidate)> = None;
            for (idx, artifact) in remaining.iter().enumerate() {
                let scored = self.score_candidate(artifact, &current, goal);
                // strictly greater: the earliest candidate wins a tie
                if best.as_ref().map_or(true, |(_, b)| scored.score > b.score) {
                    best = Some((idx, scored));
                }
            }
            let Some((idx, pick)) = best else {
                break;
            };

            remaining.remove(idx);
            current = apply_artifacts(&current, [&pick.artifact]);
            tracing::debug!(
                slot,
                artifact = %pick.artifact.name,
                score = pick.score,
                source = ?pick.source,
                "filled slot"
            );
            chosen.push(pick);
        }
        chosen
    }

    fn select_one_shot(
        &self,
        armor: &Armor,
        candidates: &[Artifact],
        picks: usize,
        goal: BuildGoal,
    ) -> Vec<ScoredCandidate> {
        let base = base_resistances(armor);
        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|artifact| self.score_candidate(artifact, &base, goal))
            .collect();
        // stable, so equal scores keep input order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(picks);
        scored
    }
}

/// Shield the chosen artifacts with the highest radiation penalty.
///
/// Ties keep pick order. The chosen list itself is not reordered.
pub fn assign_lead_containers(chosen: &mut [ScoredCandidate], containers: i64) {
    if containers <= 0 || chosen.is_empty() {
        return;
    }
    let slots = usize::try_from(containers).unwrap_or(usize::MAX).min(chosen.len());

    let mut by_radiation: Vec<usize> = (0..chosen.len()).collect();
    by_radiation.sort_by(|&a, &b| {
        chosen[b]
            .breakdown
            .radiation_penalty
            .total_cmp(&chosen[a].breakdown.radiation_penalty)
    });
    for idx in by_radiation.into_iter().take(slots) {
        chosen[idx].shielded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ResistanceKind;
    use crate::gear::{ArtifactStats, StatKey};
    use crate::predictor::ScoreModel;
    use std::sync::Arc;

    fn armor() -> Armor {
        Armor::new("Exo", Resistances::from_fn(|_| 40)).with_slots(1, 5)
    }

    fn art(name: &str, stats: ArtifactStats) -> Artifact {
        Artifact::new(name, stats)
    }

    #[test]
    fn test_zero_slots_or_candidates() {
        let scorer = HeuristicScorer::default();
        let selector = Selector::new(&scorer);
        let items = vec![art("A", ArtifactStats::new().with(StatKey::Weight, 1))];
        assert!(selector.select(&armor(), &items, 0, 1, BuildGoal::Balanced).is_empty());
        assert!(selector.select(&armor(), &items, -3, 1, BuildGoal::Balanced).is_empty());
        assert!(selector.select(&armor(), &[], 3, 1, BuildGoal::Balanced).is_empty());
    }

    #[test]
    fn test_slots_capped_by_candidates() {
        let scorer = HeuristicScorer::default();
        let items = vec![
            art("A", ArtifactStats::new().with(StatKey::Weight, 1)),
            art("B", ArtifactStats::new().with(StatKey::Weight, 2)),
        ];
        let chosen = Selector::new(&scorer).select(&armor(), &items, 10, 0, BuildGoal::Balanced);
        assert_eq!(chosen.len(), 2);
        assert_eq!(chosen[0].artifact.name, "B");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let scorer = HeuristicScorer::default();
        let stats = ArtifactStats::new().with(StatKey::Endurance, 3);
        let items = vec![art("First", stats), art("Second", stats), art("Third", stats)];
        for strategy in [SelectionStrategy::Iterative, SelectionStrategy::OneShot] {
            let chosen = Selector::new(&scorer)
                .with_strategy(strategy)
                .select(&armor(), &items, 2, 0, BuildGoal::Endurance);
            let names: Vec<_> = chosen.iter().map(|c| c.artifact.name.as_str()).collect();
            assert_eq!(names, ["First", "Second"]);
        }
    }

    #[test]
    fn test_iterative_avoids_redundant_stacking() {
        // armor weak in thermal and chemical; two thermal artifacts and an
        // equally strong chemical one listed last
        let mut res = Resistances::from_fn(|_| 100);
        res[ResistanceKind::Thermal] = 0;
        res[ResistanceKind::Chemical] = 0;
        let armor = Armor::new("Suit", res);
        let items = vec![
            art("Flame A", ArtifactStats::new().with(StatKey::ThermalProtection, 5)),
            art("Flame B", ArtifactStats::new().with(StatKey::ThermalProtection, 5)),
            art("Acid", ArtifactStats::new().with(StatKey::ChemicalProtection, 5)),
        ];
        let scorer = HeuristicScorer::default();
        let goal = BuildGoal::AnomalyProtections;

        let iterative = Selector::new(&scorer).select(&armor, &items, 2, 0, goal);
        let names: Vec<_> = iterative.iter().map(|c| c.artifact.name.as_str()).collect();
        assert_eq!(names, ["Flame A", "Acid"]);

        let one_shot = Selector::new(&scorer)
            .with_strategy(SelectionStrategy::OneShot)
            .select(&armor, &items, 2, 0, goal);
        let names: Vec<_> = one_shot.iter().map(|c| c.artifact.name.as_str()).collect();
        assert_eq!(names, ["Flame A", "Flame B"]);
    }

    #[test]
    fn test_lead_containers_take_worst_emitters() {
        let scorer = HeuristicScorer::default();
        let items = vec![
            art("Clean", ArtifactStats::new().with(StatKey::Weight, 5)),
            art("Warm", ArtifactStats::new().with(StatKey::Weight, 4).with(StatKey::Radiation, 1)),
            art("Hot", ArtifactStats::new().with(StatKey::Weight, 3).with(StatKey::Radiation, 5)),
        ];
        let chosen = Selector::new(&scorer).select(&armor(), &items, 3, 2, BuildGoal::Balanced);
        let shielded: Vec<_> = chosen
            .iter()
            .filter(|c| c.shielded)
            .map(|c| c.artifact.name.as_str())
            .collect();
        assert_eq!(shielded.len(), 2);
        assert!(shielded.contains(&"Hot"));
        assert!(shielded.contains(&"Warm"));
    }

    #[test]
    fn test_containers_capped_by_chosen() {
        let scorer = HeuristicScorer::default();
        let items = vec![art("A", ArtifactStats::new().with(StatKey::Radiation, 2))];
        let chosen = Selector::new(&scorer).select(&armor(), &items, 1, 5, BuildGoal::Balanced);
        assert_eq!(chosen.iter().filter(|c| c.shielded).count(), 1);
    }

    #[test]
    fn test_radiation_ties_keep_pick_order() {
        let scorer = HeuristicScorer::default();
        let stats = ArtifactStats::new().with(StatKey::Endurance, 1);
        let items = vec![art("A", stats), art("B", stats)];
        let chosen = Selector::new(&scorer).select(&armor(), &items, 2, 1, BuildGoal::Balanced);
        assert!(chosen[0].shielded);
        assert!(!chosen[1].shielded);
    }

    struct PreferWeight;

    impl ScoreModel for PreferWeight {
        fn predict(&self, features: &FeatureVector) -> crate::core::error::Result<f64> {
            // bonus(weight) sits at index 13
            Ok(features.0[13])
        }
    }

    #[test]
    fn test_predictor_overrides_composite_only() {
        let scorer = HeuristicScorer::default();
        let predictor = PredictorCache::preloaded(Arc::new(PreferWeight));
        let items = vec![
            art("Armored", ArtifactStats::new().with(StatKey::ThermalProtection, 5)),
            art("Light", ArtifactStats::new().with(StatKey::Weight, 1).with(StatKey::Radiation, 3)),
        ];
        let chosen = Selector::new(&scorer)
            .with_predictor(&predictor)
            .select(&armor(), &items, 1, 0, BuildGoal::AnomalyProtections);
        assert_eq!(chosen[0].artifact.name, "Light");
        assert_eq!(chosen[0].score, 10.0);
        assert_eq!(chosen[0].source, ScoreSource::Predictor);
        // breakdown is still the heuristic one
        assert_eq!(chosen[0].breakdown.radiation_penalty, 20.0);
    }
}

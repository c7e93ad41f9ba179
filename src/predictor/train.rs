//! Offline fitting of the score model
//!
//! There is no record of real user choices, so the training set is
//! synthesized: every armor × artifact × goal combination is scored by the
//! heuristic, and a bagged forest of regression trees learns to approximate
//! it.

use ordered_float::OrderedFloat;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::features::{FeatureVector, FEATURE_COUNT};
use super::forest::{RegressionForest, RegressionTree, TreeNode};
use crate::core::error::{OptimizerError, Result};
use crate::core::types::BuildGoal;
use crate::gear::{Armor, Artifact};
use crate::resistance::base_resistances;
use crate::scoring::HeuristicScorer;

/// Variance below which a node is treated as pure
const PURE_NODE_SSE: f64 = 1e-12;

#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub features: Vec<FeatureVector>,
    pub targets: Vec<f64>,
}

impl TrainingSet {
    /// One row per armor × artifact × goal, scored against the armor's base
    /// resistances.
    pub fn synthesize(armors: &[Armor], artifacts: &[Artifact], scorer: &HeuristicScorer) -> Self {
        let rows = armors.len() * artifacts.len() * BuildGoal::ALL.len();
        let mut set = TrainingSet {
            features: Vec::with_capacity(rows),
            targets: Vec::with_capacity(rows),
        };
        for armor in armors {
            let base = base_resistances(armor);
            for artifact in artifacts {
                for goal in BuildGoal::ALL {
                    set.features.push(FeatureVector::build(&base, &artifact.stats, goal));
                    set.targets.push(scorer.score(&artifact.stats, &base, goal).score);
                }
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Bagged CART regression forest trainer
#[derive(Debug, Clone)]
pub struct ForestTrainer {
    pub n_trees: usize,
    /// `None` grows until leaves are pure or too small to split
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestTrainer {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

impl ForestTrainer {
    /// Fit a forest. Same seed and data give the same forest.
    pub fn fit(&self, data: &TrainingSet) -> Result<RegressionForest> {
        if data.is_empty() {
            return Err(OptimizerError::ModelError("training set is empty".into()));
        }
        if self.n_trees == 0 {
            return Err(OptimizerError::ModelError("n_trees must be at least 1".into()));
        }
        tracing::info!(rows = data.len(), trees = self.n_trees, seed = self.seed, "fitting score model");

        let n = data.len();
        let trees: Vec<RegressionTree> = (0..self.n_trees)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(i as u64));
                let mut sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let mut builder = TreeBuilder {
                    data,
                    max_depth: self.max_depth,
                    min_samples_split: self.min_samples_split.max(2),
                    nodes: Vec::new(),
                };
                builder.grow(&mut sample, 0);
                RegressionTree { nodes: builder.nodes }
            })
            .collect();

        Ok(RegressionForest::new(trees, n))
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    sse: f64,
}

struct TreeBuilder<'a> {
    data: &'a TrainingSet,
    max_depth: Option<usize>,
    min_samples_split: usize,
    nodes: Vec<TreeNode>,
}

impl TreeBuilder<'_> {
    /// Append the subtree for `rows` in preorder and return its root index
    fn grow(&mut self, rows: &mut [usize], depth: usize) -> usize {
        let node = self.nodes.len();
        let (sum, sum_sq) = rows.iter().fold((0.0, 0.0), |(s, sq), &r| {
            let y = self.data.targets[r];
            (s + y, sq + y * y)
        });
        let count = rows.len() as f64;
        let mean = sum / count;
        let sse = sum_sq - sum * sum / count;

        let depth_reached = self.max_depth.is_some_and(|max| depth >= max);
        if rows.len() < self.min_samples_split || depth_reached || sse <= PURE_NODE_SSE {
            self.nodes.push(TreeNode::Leaf { value: mean });
            return node;
        }

        let Some(split) = self.best_split(rows).filter(|s| s.sse < sse - PURE_NODE_SSE) else {
            self.nodes.push(TreeNode::Leaf { value: mean });
            return node;
        };

        // reserve the slot; children are appended after it
        self.nodes.push(TreeNode::Leaf { value: mean });
        let data = self.data;
        rows.sort_by_key(|&r| OrderedFloat(data.features[r].0[split.feature]));
        let mid = rows.partition_point(|&r| data.features[r].0[split.feature] <= split.threshold);
        let (left_rows, right_rows) = rows.split_at_mut(mid);
        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);
        self.nodes[node] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node
    }

    /// Lowest combined SSE over every feature and every cut between two
    /// distinct consecutive values.
    fn best_split(&self, rows: &[usize]) -> Option<Split> {
        let mut best: Option<Split> = None;
        let mut order = rows.to_vec();
        let total_sum: f64 = rows.iter().map(|&r| self.data.targets[r]).sum();
        let total_sq: f64 = rows.iter().map(|&r| self.data.targets[r].powi(2)).sum();
        let n = rows.len();

        for feature in 0..FEATURE_COUNT {
            let x = |r: usize| self.data.features[r].0[feature];
            order.sort_by_key(|&r| OrderedFloat(x(r)));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 1..n {
                let y = self.data.targets[order[k - 1]];
                left_sum += y;
                left_sq += y * y;

                let (lo, hi) = (x(order[k - 1]), x(order[k]));
                if lo >= hi {
                    continue;
                }
                let left_n = k as f64;
                let right_n = (n - k) as f64;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / left_n)
                    + (right_sq - right_sum * right_sum / right_n);

                if best.as_ref().map_or(true, |b| sse < b.sse) {
                    best = Some(Split {
                        feature,
                        threshold: (lo + hi) / 2.0,
                        sse,
                    });
                }
            }
        }
        best
    }
}

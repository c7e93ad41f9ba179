//! Serialized regression forest
//!
//! A forest is a list of binary regression trees stored as flat node arrays.
//! Split nodes send a sample left when `x[feature] <= threshold`. Children
//! always sit after their parent in the array, which bounds every walk by
//! the tree size. The forest prediction is the mean of the tree predictions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, FEATURE_COUNT};
use super::ScoreModel;
use crate::core::error::{OptimizerError, Result};

/// Bumped whenever the file layout or feature order changes
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        let mut idx = 0;
        // children come after parents, so a valid walk takes at most len steps
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    let value = x.get(*feature).ok_or_else(|| {
                        OptimizerError::ModelError(format!("feature {} out of range", feature))
                    })?;
                    idx = if *value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(OptimizerError::ModelError(format!("node {} out of range", idx)));
                }
            }
        }
        Err(OptimizerError::ModelError("tree walk did not reach a leaf".into()))
    }

    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".into());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(format!("node {} splits on unknown feature {}", idx, feature));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", idx));
                    }
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            return Err(format!("node {} links to invalid child {}", idx, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("node {} has a non-finite leaf value", idx));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionForest {
    pub version: u32,
    pub n_features: usize,
    /// Rows the forest was fitted on
    #[serde(default)]
    pub n_samples: usize,
    pub trees: Vec<RegressionTree>,
}

impl RegressionForest {
    pub fn new(trees: Vec<RegressionTree>, n_samples: usize) -> Self {
        Self {
            version: MODEL_FORMAT_VERSION,
            n_features: FEATURE_COUNT,
            n_samples,
            trees,
        }
    }

    /// Read and validate a model file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let forest: RegressionForest = serde_json::from_str(&contents)?;
        forest.validate().map_err(OptimizerError::ModelError)?;
        tracing::info!(
            path = %path.display(),
            trees = forest.trees.len(),
            samples = forest.n_samples,
            "loaded score model"
        );
        Ok(forest)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.version != MODEL_FORMAT_VERSION {
            return Err(format!(
                "model format version {} (expected {})",
                self.version, MODEL_FORMAT_VERSION
            ));
        }
        if self.n_features != FEATURE_COUNT {
            return Err(format!(
                "model expects {} features (runtime provides {})",
                self.n_features, FEATURE_COUNT
            ));
        }
        if self.trees.is_empty() {
            return Err("model has no trees".into());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    pub fn predict_slice(&self, x: &[f64]) -> Result<f64> {
        if x.len() != self.n_features {
            return Err(OptimizerError::ModelError(format!(
                "got {} features, model expects {}",
                x.len(),
                self.n_features
            )));
        }
        if self.trees.is_empty() {
            return Err(OptimizerError::ModelError("model has no trees".into()));
        }
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.predict(x)?;
        }
        Ok(total / self.trees.len() as f64)
    }
}

impl ScoreModel for RegressionForest {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        self.predict_slice(features.as_slice())
    }
}

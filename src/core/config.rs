//! Optimizer configuration
//!
//! Every field has a default, so an empty TOML file (or none at all) gives
//! the canonical behavior. Sections mirror the subsystems they tune.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{OptimizerError, Result};
use crate::catalog::CatalogConfig;
use crate::predictor::PredictorConfig;
use crate::scoring::ScoringConfig;
use crate::selection::SelectionConfig;

/// Top-level configuration, one table per subsystem
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    // === DATA SOURCES ===
    /// Where armor and artifact catalogs come from
    pub catalog: CatalogConfig,

    // === SCORE MODEL ===
    /// Optional learned override of the composite score
    pub predictor: PredictorConfig,

    // === SELECTION ===
    pub selection: SelectionConfig,

    // === HEURISTIC ===
    /// Importance scaling and per-goal weight tables
    pub scoring: ScoringConfig,
}

impl OptimizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: OptimizerConfig = toml::from_str(contents)?;
        config.validate().map_err(OptimizerError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.catalog.validate().map_err(|e| format!("[catalog] {}", e))?;
        self.scoring.validate().map_err(|e| format!("[scoring] {}", e))?;

        if self.predictor.enabled && self.predictor.model_path.as_os_str().is_empty() {
            return Err("[predictor] model_path must be set when the predictor is enabled".into());
        }

        Ok(())
    }
}

// === PROCESS-WIDE SETTINGS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<OptimizerConfig> = OnceLock::new();

/// Settings read by `run_model` and the shared predictor. Falls back to
/// `OptimizerConfig::default()` when the binary installed nothing.
pub fn config() -> &'static OptimizerConfig {
    CONFIG.get_or_init(OptimizerConfig::default)
}

/// Install the settings the CLI loaded. Must happen before anything reads
/// `config()`; the rejected value is handed back otherwise.
pub fn set_config(config: OptimizerConfig) -> std::result::Result<(), OptimizerConfig> {
    CONFIG.set(config)
}

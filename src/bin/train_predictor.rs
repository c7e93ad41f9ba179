//! Score Model Trainer
//!
//! Synthesizes a training set from the catalogs by scoring every armor ×
//! artifact × goal with the heuristic, fits a regression forest to it and
//! writes the model where the optimizer looks for it.

use std::path::PathBuf;

use artifact_optimizer::catalog::Catalog;
use artifact_optimizer::core::config::OptimizerConfig;
use artifact_optimizer::core::error::{OptimizerError, Result};
use artifact_optimizer::predictor::{feature_names, ForestTrainer, TrainingSet};
use artifact_optimizer::scoring::HeuristicScorer;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Score Model Trainer - fit the learned scorer from catalog data
#[derive(Parser, Debug)]
#[command(name = "train_predictor")]
#[command(about = "Fit a regression forest to heuristic scores and save it as JSON")]
struct Args {
    /// TOML config file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Local armor catalog instead of the remote one
    #[arg(long)]
    armor_catalog: Option<PathBuf>,

    /// Local artifact catalog instead of the remote one
    #[arg(long)]
    artifact_catalog: Option<PathBuf>,

    /// Output path (defaults to the configured model path)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 200)]
    trees: usize,

    /// Random seed for bootstrap sampling
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Maximum tree depth (unlimited when omitted)
    #[arg(long)]
    max_depth: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => OptimizerConfig::load(path)?,
        None => OptimizerConfig::default(),
    };
    if let Some(path) = args.armor_catalog {
        cfg.catalog.armor_path = Some(path);
    }
    if let Some(path) = args.artifact_catalog {
        cfg.catalog.artifact_path = Some(path);
    }
    cfg.validate().map_err(OptimizerError::InvalidConfig)?;

    let catalog = Catalog::load(&cfg.catalog)?;
    let scorer = HeuristicScorer::new(cfg.scoring.clone());
    let data = TrainingSet::synthesize(&catalog.armors, &catalog.artifacts, &scorer);
    tracing::info!(
        armors = catalog.armors.len(),
        artifacts = catalog.artifacts.len(),
        rows = data.len(),
        "synthesized training set"
    );
    tracing::debug!(features = ?feature_names(), "feature order");

    let trainer = ForestTrainer {
        n_trees: args.trees,
        max_depth: args.max_depth,
        seed: args.seed,
        ..Default::default()
    };
    let forest = trainer.fit(&data)?;

    let out = args.out.unwrap_or_else(|| cfg.predictor.model_path.clone());
    forest.save(&out)?;
    tracing::info!(path = %out.display(), trees = forest.trees.len(), "saved score model");

    Ok(())
}

//! Artifact Build Optimizer - command-line entry point
//!
//! Lists the armor and artifact catalogs and generates builds. Logs go to
//! stderr so `--json` output can be piped.

use std::path::PathBuf;

use artifact_optimizer::catalog::Catalog;
use artifact_optimizer::core::config::{set_config, OptimizerConfig};
use artifact_optimizer::core::error::{OptimizerError, Result};
use artifact_optimizer::core::types::ResistanceKind;
use artifact_optimizer::gear::{ArmorConfig, Artifact};
use artifact_optimizer::optimizer::{run_model, BuildResult};
use artifact_optimizer::resistance::artifact_resistance_bonus;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Artifact Build Optimizer - pick artifacts for an armor's slots
#[derive(Parser, Debug)]
#[command(name = "artifact-optimizer")]
#[command(about = "Choose artifacts for an armor build and check its radiation balance")]
struct Cli {
    /// TOML config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Local armor catalog instead of the remote one
    #[arg(long, global = true)]
    armor_catalog: Option<PathBuf>,

    /// Local artifact catalog instead of the remote one
    #[arg(long, global = true)]
    artifact_catalog: Option<PathBuf>,

    /// Score with the heuristic only
    #[arg(long, global = true)]
    no_predictor: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List armors with their slot ranges and resistance bars
    Armor,

    /// List artifacts with their stat levels
    Artifacts,

    /// Generate a build
    Generate {
        /// Armor name (case-insensitive)
        #[arg(long)]
        armor: String,

        /// Artifact slots to fill (defaults to the armor's base)
        #[arg(long)]
        slots: Option<i64>,

        /// Lead containers to use (defaults to the armor's base)
        #[arg(long)]
        containers: Option<i64>,

        /// Balanced, Anomaly Protections, Endurance or Bleed Resistance
        #[arg(long, default_value = "Balanced")]
        goal: String,

        /// Candidate artifact; repeat for several. Omit to consider the whole catalog
        #[arg(long = "artifact")]
        artifacts: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => OptimizerConfig::load(path)?,
        None => OptimizerConfig::default(),
    };
    if let Some(path) = cli.armor_catalog.clone() {
        cfg.catalog.armor_path = Some(path);
    }
    if let Some(path) = cli.artifact_catalog.clone() {
        cfg.catalog.artifact_path = Some(path);
    }
    if cli.no_predictor {
        cfg.predictor.enabled = false;
    }
    cfg.validate().map_err(OptimizerError::InvalidConfig)?;

    let catalog = Catalog::load(&cfg.catalog)?;
    set_config(cfg).map_err(|_| OptimizerError::InvalidConfig("config already initialised".into()))?;

    match cli.command {
        Command::Armor => list_armor(&catalog),
        Command::Artifacts => list_artifacts(&catalog),
        Command::Generate {
            armor,
            slots,
            containers,
            goal,
            artifacts,
            json,
        } => {
            let armor = catalog.find_armor(&armor)?.clone();
            let slots = slots.unwrap_or(armor.slots_base);
            let containers = containers.unwrap_or(armor.lead_containers_base);
            let armor_config = ArmorConfig::validated(armor, slots, containers)?;

            let candidates: Vec<Artifact> = if artifacts.is_empty() {
                catalog.artifacts.clone()
            } else {
                catalog.find_artifacts(artifacts.as_slice())?
            };

            let result = run_model(&armor_config, &candidates, &goal);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_build(&result);
            }
        }
    }

    Ok(())
}

fn list_armor(catalog: &Catalog) {
    for armor in &catalog.armors {
        println!(
            "{}  slots {}-{}  lead containers {}-{}",
            armor.name,
            armor.slots_base,
            armor.slots_total,
            armor.lead_containers_base,
            armor.lead_containers_total
        );
        let bars = armor.resistance_bars();
        for kind in ResistanceKind::ALL {
            println!("    {:<11} {:>4} {}", kind.as_str(), armor.resistances[kind], bars[kind].gauge());
        }
    }
}

fn list_artifacts(catalog: &Catalog) {
    for artifact in &catalog.artifacts {
        let stats: Vec<String> = artifact
            .stats
            .present()
            .map(|(key, level)| format!("{} {}", key.as_str(), level.value()))
            .collect();
        let bonus = artifact_resistance_bonus(artifact);
        let protects: Vec<String> = bonus
            .iter()
            .filter(|(_, value)| **value > 0)
            .map(|(kind, value)| format!("+{} {}", value, kind))
            .collect();

        print!("{}  [{}]", artifact.name, stats.join(", "));
        if !protects.is_empty() {
            print!("  ({})", protects.join(", "));
        }
        println!();
    }
}

fn print_build(result: &BuildResult) {
    println!("=== {} / {} ===", result.armor.name, result.build_goal);
    println!(
        "slots {}  lead containers {}",
        result.slots, result.lead_containers
    );
    println!();

    if result.chosen.is_empty() {
        println!("No artifacts chosen");
    }
    for (i, pick) in result.chosen.iter().enumerate() {
        let marker = if pick.shielded { "  [lead]" } else { "" };
        println!(
            "{:>2}. {:<24} score {:>8.2} ({:?}){}",
            i + 1,
            pick.artifact.name,
            pick.score,
            pick.source,
            marker
        );
        let b = &pick.breakdown;
        println!(
            "    protection {:.1}  endurance {:.0}  durability {:.0}  bleed {:.0}  weight {:.0}  radiation -{:.0}",
            b.protection, b.endurance, b.durability, b.bleed, b.weight, b.radiation_penalty
        );
    }
    println!();

    let counts = result.bar_counts();
    for kind in ResistanceKind::ALL {
        println!(
            "{:<11} {:>4} {} {}/5",
            kind.as_str(),
            result.final_resistances[kind],
            result.final_bars[kind].gauge(),
            counts[kind]
        );
    }
    println!();
    println!(
        "Radiation balance {:+}  ({})",
        result.radiation_balance, result.verdict
    );
}

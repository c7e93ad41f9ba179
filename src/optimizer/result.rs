//! Folding a selection into the final build report

use derive_more::Display;
use serde::Serialize;

use crate::core::types::{BuildGoal, PerKind, Resistances};
use crate::gear::{Armor, ArmorConfig};
use crate::resistance::{
    apply_artifacts, base_resistances, effective_bar_counts, resistance_bars, ResistanceBars,
};
use crate::selection::ScoredCandidate;

/// Whether the unshielded artifacts leave the wearer irradiated
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiationVerdict {
    #[display(fmt = "safe")]
    Safe,
    #[display(fmt = "unsafe")]
    Unsafe,
}

impl RadiationVerdict {
    /// Unsafe when net unshielded radiation exceeds net protection, i.e. when
    /// the negated balance is positive.
    pub fn from_balance(radiation_balance: i32) -> Self {
        if -radiation_balance > 0 {
            RadiationVerdict::Unsafe
        } else {
            RadiationVerdict::Safe
        }
    }
}

/// Everything the presentation layer shows after "Generate"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildResult {
    pub armor: Armor,
    pub slots: i64,
    pub lead_containers: i64,
    pub build_goal: BuildGoal,
    /// In pick order
    pub chosen: Vec<ScoredCandidate>,
    pub final_resistances: Resistances,
    pub final_bars: PerKind<ResistanceBars>,
    /// Radio protection minus radiation over unshielded artifacts; positive
    /// is a protective surplus
    pub radiation_balance: i32,
    pub verdict: RadiationVerdict,
}

impl BuildResult {
    pub fn aggregate(config: &ArmorConfig, goal: BuildGoal, chosen: Vec<ScoredCandidate>) -> Self {
        let final_resistances = apply_artifacts(
            &base_resistances(&config.armor),
            chosen.iter().map(|c| &c.artifact),
        );
        let radiation_balance = unshielded_radiation_balance(&chosen);

        Self {
            armor: config.armor.clone(),
            slots: config.slots_selected,
            lead_containers: config.lead_containers_selected,
            build_goal: goal,
            final_bars: resistance_bars(&final_resistances),
            final_resistances,
            radiation_balance,
            verdict: RadiationVerdict::from_balance(radiation_balance),
            chosen,
        }
    }

    pub fn is_safe(&self) -> bool {
        self.verdict == RadiationVerdict::Safe
    }

    pub fn shielded(&self) -> impl Iterator<Item = &ScoredCandidate> {
        self.chosen.iter().filter(|c| c.shielded)
    }

    /// Whole-bar summary of the final resistances
    pub fn bar_counts(&self) -> PerKind<u8> {
        effective_bar_counts(&self.armor, self.chosen.iter().map(|c| &c.artifact))
    }
}

/// Net radiation over the chosen artifacts outside lead containers.
/// Shielded artifacts are left out entirely.
pub fn unshielded_radiation_balance(chosen: &[ScoredCandidate]) -> i32 {
    chosen
        .iter()
        .filter(|c| !c.shielded)
        .map(|c| c.artifact.stats.radiation_balance())
        .sum()
}

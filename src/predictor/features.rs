//! Fixed-order feature vector shared by the trainer and the runtime scorer
//!
//! The order is part of the model file format. Changing it invalidates every
//! trained model.

use crate::core::types::{BuildGoal, ResistanceKind, Resistances};
use crate::gear::{ArtifactStats, StatKey};

/// Width of the feature vector: 6 resistances + 10 stats + 4 goal flags
pub const FEATURE_COUNT: usize = 20;

/// Stats fed to the model, in order. Psi is not a feature.
pub const FEATURE_STATS: [StatKey; 10] = [
    StatKey::ThermalProtection,
    StatKey::ElectricalProtection,
    StatKey::ChemicalProtection,
    StatKey::PhysicalProtection,
    StatKey::Endurance,
    StatKey::IncreasedDurability,
    StatKey::BleedingResistance,
    StatKey::Weight,
    StatKey::Radiation,
    StatKey::RadioProtection,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn build(current: &Resistances, stats: &ArtifactStats, goal: BuildGoal) -> Self {
        let mut features = [0.0; FEATURE_COUNT];
        let resistances = ResistanceKind::ALL.map(|kind| f64::from(current[kind]));
        let bonuses = FEATURE_STATS.map(|key| f64::from(stats.bonus(key)));

        features[..6].copy_from_slice(&resistances);
        features[6..16].copy_from_slice(&bonuses);
        features[16..].copy_from_slice(&goal.one_hot());
        Self(features)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Human-readable names, index-aligned with the vector
pub fn feature_names() -> Vec<String> {
    ResistanceKind::ALL
        .iter()
        .map(|kind| format!("armor.{}", kind))
        .chain(FEATURE_STATS.iter().map(|key| format!("bonus.{}", key.as_str())))
        .chain(BuildGoal::ALL.iter().map(|goal| format!("goal.{}", goal)))
        .collect()
}

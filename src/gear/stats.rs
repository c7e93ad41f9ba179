//! Artifact stat keys and the level → bonus table
//!
//! Every numeric comparison in the optimizer starts here: an artifact's stat
//! level (0-5) is converted to a bonus magnitude before anything else
//! looks at it.

use ahash::AHashMap;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::core::types::{coerce_int, ResistanceKind};

/// Highest meaningful stat level
pub const MAX_LEVEL: u8 = 5;

/// Bonus for each level, indexed by level. Level 0 contributes nothing.
const LEVEL_BONUS: [i32; 6] = [0, 10, 15, 20, 25, 40];

/// Convert a raw stat level into its bonus magnitude.
///
/// Only levels 1-5 carry a bonus; anything else (negative, 0, above 5)
/// yields 0.
pub fn bonus_for_level(level: i64) -> i32 {
    if (1..=MAX_LEVEL as i64).contains(&level) {
        LEVEL_BONUS[level as usize]
    } else {
        0
    }
}

/// Stat keys an artifact may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatKey {
    ChemicalProtection,
    Psi,
    PhysicalProtection,
    ThermalProtection,
    ElectricalProtection,
    Endurance,
    IncreasedDurability,
    BleedingResistance,
    Weight,
    Radiation,
    RadioProtection,
}

impl StatKey {
    pub const ALL: [StatKey; 11] = [
        StatKey::ChemicalProtection,
        StatKey::Psi,
        StatKey::PhysicalProtection,
        StatKey::ThermalProtection,
        StatKey::ElectricalProtection,
        StatKey::Endurance,
        StatKey::IncreasedDurability,
        StatKey::BleedingResistance,
        StatKey::Weight,
        StatKey::Radiation,
        StatKey::RadioProtection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatKey::ChemicalProtection => "chemical_protection",
            StatKey::Psi => "psi",
            StatKey::PhysicalProtection => "physical_protection",
            StatKey::ThermalProtection => "thermal_protection",
            StatKey::ElectricalProtection => "electrical_protection",
            StatKey::Endurance => "endurance",
            StatKey::IncreasedDurability => "increased_durability",
            StatKey::BleedingResistance => "bleeding_resistance",
            StatKey::Weight => "weight",
            StatKey::Radiation => "radiation",
            StatKey::RadioProtection => "radio_protection",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stat| stat.as_str() == key)
    }

    /// The armor resistance this stat boosts, if any
    pub fn protects(&self) -> Option<ResistanceKind> {
        match self {
            StatKey::ChemicalProtection => Some(ResistanceKind::Chemical),
            StatKey::Psi => Some(ResistanceKind::Psi),
            StatKey::PhysicalProtection => Some(ResistanceKind::Physical),
            StatKey::ThermalProtection => Some(ResistanceKind::Thermal),
            StatKey::ElectricalProtection => Some(ResistanceKind::Electrical),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A validated stat level in 0..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct StatLevel(u8);

impl StatLevel {
    /// Out-of-range levels collapse to 0
    pub fn new(raw: i64) -> Self {
        if (0..=MAX_LEVEL as i64).contains(&raw) {
            Self(raw as u8)
        } else {
            Self(0)
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn bonus(&self) -> i32 {
        bonus_for_level(self.0 as i64)
    }
}

/// Per-artifact stat levels with every key present (unset keys are level 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArtifactStats {
    levels: [StatLevel; 11],
}

impl ArtifactStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests and fixtures
    pub fn with(mut self, key: StatKey, level: i64) -> Self {
        self.set(key, level);
        self
    }

    pub fn set(&mut self, key: StatKey, level: i64) {
        self.levels[key.index()] = StatLevel::new(level);
    }

    pub fn level(&self, key: StatKey) -> StatLevel {
        self.levels[key.index()]
    }

    pub fn bonus(&self, key: StatKey) -> i32 {
        self.level(key).bonus()
    }

    /// Stats with a non-zero level, in key order
    pub fn present(&self) -> impl Iterator<Item = (StatKey, StatLevel)> + '_ {
        StatKey::ALL
            .into_iter()
            .map(|key| (key, self.level(key)))
            .filter(|(_, level)| level.value() > 0)
    }

    /// Radio protection minus radiation, in bonus units
    pub fn radiation_balance(&self) -> i32 {
        self.bonus(StatKey::RadioProtection) - self.bonus(StatKey::Radiation)
    }
}

impl Serialize for ArtifactStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<_> = self.present().collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (key, level) in present {
            map.serialize_entry(key.as_str(), &level.value())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ArtifactStats {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<AHashMap<String, serde_json::Value>>::deserialize(deserializer)?
            .unwrap_or_default();
        let mut stats = ArtifactStats::default();
        for (key, value) in &raw {
            let Some(stat) = StatKey::from_key(key) else {
                tracing::debug!(key = %key, "ignoring unknown artifact stat");
                continue;
            };
            match coerce_int(value) {
                Some(level) => stats.set(stat, level),
                None => tracing::debug!(key = %key, value = %value, "unreadable stat level, using 0"),
            }
        }
        Ok(stats)
    }
}

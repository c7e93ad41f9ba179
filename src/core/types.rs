//! Core type definitions used throughout the codebase

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use ahash::AHashMap;
use derive_more::Display;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Armor resistance kinds. The set is closed: input keys outside it are dropped.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResistanceKind {
    #[display(fmt = "thermal")]
    Thermal,
    #[display(fmt = "electrical")]
    Electrical,
    #[display(fmt = "chemical")]
    Chemical,
    #[display(fmt = "radiation")]
    Radiation,
    #[display(fmt = "psi")]
    Psi,
    #[display(fmt = "physical")]
    Physical,
}

impl ResistanceKind {
    /// All kinds, in feature-vector order
    pub const ALL: [ResistanceKind; 6] = [
        ResistanceKind::Thermal,
        ResistanceKind::Electrical,
        ResistanceKind::Chemical,
        ResistanceKind::Radiation,
        ResistanceKind::Psi,
        ResistanceKind::Physical,
    ];

    /// Kinds that the protection sub-score weighs. Psi is left out because no
    /// build goal targets it.
    pub const PROTECTABLE: [ResistanceKind; 4] = [
        ResistanceKind::Thermal,
        ResistanceKind::Electrical,
        ResistanceKind::Chemical,
        ResistanceKind::Physical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResistanceKind::Thermal => "thermal",
            ResistanceKind::Electrical => "electrical",
            ResistanceKind::Chemical => "chemical",
            ResistanceKind::Radiation => "radiation",
            ResistanceKind::Psi => "psi",
            ResistanceKind::Physical => "physical",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One value per resistance kind, stored densely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerKind<T> {
    values: [T; 6],
}

/// Numeric resistances of an armor, before or after artifact bonuses
pub type Resistances = PerKind<i32>;

impl<T> PerKind<T> {
    pub fn from_fn(mut f: impl FnMut(ResistanceKind) -> T) -> Self {
        Self {
            values: ResistanceKind::ALL.map(&mut f),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResistanceKind, &T)> {
        ResistanceKind::ALL.into_iter().zip(self.values.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(ResistanceKind, &T) -> U) -> PerKind<U> {
        PerKind::from_fn(|kind| f(kind, &self.values[kind.index()]))
    }
}

impl<T> Index<ResistanceKind> for PerKind<T> {
    type Output = T;
    fn index(&self, kind: ResistanceKind) -> &T {
        &self.values[kind.index()]
    }
}

impl<T> IndexMut<ResistanceKind> for PerKind<T> {
    fn index_mut(&mut self, kind: ResistanceKind) -> &mut T {
        &mut self.values[kind.index()]
    }
}

impl<T: Serialize> Serialize for PerKind<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (kind, value) in self.iter() {
            map.serialize_entry(kind.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PerKind<i32> {
    /// Lenient: missing kinds read as 0 and unknown kinds are dropped. Values
    /// that cannot be read as integers become 0, and anything other than an
    /// object reads as all zero.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: AHashMap<String, serde_json::Value> = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            serde_json::Value::Null => AHashMap::new(),
            other => {
                tracing::debug!(value = %other, "resistances are not a map, reading as zero");
                AHashMap::new()
            }
        };
        let mut resistances = Resistances::default();
        for (key, value) in &raw {
            match ResistanceKind::from_key(key) {
                Some(kind) => {
                    resistances[kind] = coerce_int(value)
                        .map(|v| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
                        .unwrap_or(0);
                }
                None => tracing::debug!(key = %key, "ignoring unknown resistance kind"),
            }
        }
        Ok(resistances)
    }
}

/// Read a loosely typed record value as an integer.
///
/// Integers pass through, floats truncate toward zero, numeric strings parse.
/// Everything else yields `None`.
pub fn coerce_int(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// `deserialize_with` helper for integer record fields that may arrive as
/// strings or floats. Unreadable values become 0.
pub fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_int(&value).unwrap_or(0))
}

/// User-selected optimization target
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildGoal {
    #[default]
    #[display(fmt = "Balanced")]
    Balanced,
    #[display(fmt = "Anomaly Protections")]
    AnomalyProtections,
    #[display(fmt = "Endurance")]
    Endurance,
    #[display(fmt = "Bleed Resistance")]
    BleedResistance,
}

impl BuildGoal {
    /// All goals, in one-hot feature order
    pub const ALL: [BuildGoal; 4] = [
        BuildGoal::Balanced,
        BuildGoal::AnomalyProtections,
        BuildGoal::Endurance,
        BuildGoal::BleedResistance,
    ];

    /// Normalize user input. Matching trims whitespace and ignores case;
    /// anything unrecognized (including the empty string) is Balanced.
    pub fn parse(input: &str) -> Self {
        let wanted = input.trim();
        Self::ALL
            .into_iter()
            .find(|goal| goal.label().eq_ignore_ascii_case(wanted))
            .unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            BuildGoal::Balanced => "Balanced",
            BuildGoal::AnomalyProtections => "Anomaly Protections",
            BuildGoal::Endurance => "Endurance",
            BuildGoal::BleedResistance => "Bleed Resistance",
        }
    }

    pub fn one_hot(&self) -> [f64; 4] {
        Self::ALL.map(|goal| if goal == *self { 1.0 } else { 0.0 })
    }
}

impl FromStr for BuildGoal {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for BuildGoal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for BuildGoal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

impl fmt::Display for PerKind<i32> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(kind, value)| format!("{}={}", kind, value))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

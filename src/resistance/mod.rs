//! Resistance model: armor base values, artifact bonuses, display bars

pub mod bars;

pub use bars::{resistance_bars, value_to_bars, ResistanceBars, BAR_MAX, BAR_STEP};

use crate::core::types::{PerKind, Resistances};
use crate::gear::{Armor, Artifact, StatKey};

/// The armor's own resistances, before any artifact
pub fn base_resistances(armor: &Armor) -> Resistances {
    armor.resistances
}

/// Add every resistance-boosting stat of `items` onto `base`.
///
/// Stats without a resistance mapping are skipped. Returns a new value;
/// `base` is untouched.
pub fn apply_artifacts<'a>(
    base: &Resistances,
    items: impl IntoIterator<Item = &'a Artifact>,
) -> Resistances {
    let mut result = *base;
    for item in items {
        for (key, level) in item.stats.present() {
            if let Some(kind) = key.protects() {
                result[kind] = result[kind].saturating_add(level.bonus());
            }
        }
    }
    result
}

/// Scalar bar counts after applying `items` to the armor
pub fn effective_bar_counts<'a>(
    armor: &Armor,
    items: impl IntoIterator<Item = &'a Artifact>,
) -> PerKind<u8> {
    apply_artifacts(&base_resistances(armor), items).map(|_, value| value_to_bars(*value))
}

/// Bonus a single artifact adds to each resistance kind
pub fn artifact_resistance_bonus(item: &Artifact) -> Resistances {
    let mut bonus = Resistances::default();
    for key in StatKey::ALL {
        if let Some(kind) = key.protects() {
            bonus[kind] += item.bonus(key);
        }
    }
    bonus
}

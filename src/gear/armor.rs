//! Armor records and the user's slot/container choice for one build

use serde::{Deserialize, Serialize};

use crate::core::error::{OptimizerError, Result};
use crate::core::types::{lenient_int, PerKind, Resistances};
use crate::resistance::{resistance_bars, ResistanceBars};

/// An armor as published by the data source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Armor {
    pub name: String,
    pub resistances: Resistances,
    #[serde(deserialize_with = "lenient_int")]
    pub slots_base: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub slots_total: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub lead_containers_base: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub lead_containers_total: i64,
    /// Path relative to the data source's image directory
    pub image: String,
    /// Absolute image location, derived at ingestion
    pub image_url: String,
}

impl Armor {
    pub fn new(name: impl Into<String>, resistances: Resistances) -> Self {
        Self {
            name: name.into(),
            resistances,
            ..Default::default()
        }
    }

    pub fn with_slots(mut self, base: i64, total: i64) -> Self {
        self.slots_base = base;
        self.slots_total = total;
        self
    }

    pub fn with_lead_containers(mut self, base: i64, total: i64) -> Self {
        self.lead_containers_base = base;
        self.lead_containers_total = total;
        self
    }

    /// Repair capacity ranges so that `base <= total` and neither is negative.
    /// A missing total reads as 0 and is raised to the base.
    pub fn normalize(&mut self) {
        self.slots_base = self.slots_base.max(0);
        self.slots_total = self.slots_total.max(self.slots_base);
        self.lead_containers_base = self.lead_containers_base.max(0);
        self.lead_containers_total = self.lead_containers_total.max(self.lead_containers_base);
    }

    /// Display bars of the unmodified armor
    pub fn resistance_bars(&self) -> PerKind<ResistanceBars> {
        resistance_bars(&self.resistances)
    }
}

/// The armor plus the slot and lead-container counts chosen for a build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmorConfig {
    pub armor: Armor,
    pub slots_selected: i64,
    pub lead_containers_selected: i64,
}

impl ArmorConfig {
    /// Unchecked constructor. The optimizer clamps whatever it is given.
    pub fn new(armor: Armor, slots_selected: i64, lead_containers_selected: i64) -> Self {
        Self {
            armor,
            slots_selected,
            lead_containers_selected,
        }
    }

    /// Constructor for user input: counts must lie within the armor's ranges
    pub fn validated(armor: Armor, slots_selected: i64, lead_containers_selected: i64) -> Result<Self> {
        if !(armor.slots_base..=armor.slots_total).contains(&slots_selected) {
            return Err(OptimizerError::SlotsOutOfRange {
                selected: slots_selected,
                base: armor.slots_base,
                total: armor.slots_total,
            });
        }
        if !(armor.lead_containers_base..=armor.lead_containers_total)
            .contains(&lead_containers_selected)
        {
            return Err(OptimizerError::ContainersOutOfRange {
                selected: lead_containers_selected,
                base: armor.lead_containers_base,
                total: armor.lead_containers_total,
            });
        }
        Ok(Self::new(armor, slots_selected, lead_containers_selected))
    }
}

//! Five-bar display discretisation of resistance values
//!
//! Each bar stands for 20 points. Two forms exist: a scalar bar count used
//! by summary views, and a full/half/empty breakdown used by the build
//! result.

use serde::{Deserialize, Serialize};

use crate::core::types::{PerKind, Resistances};

/// Bars shown per resistance
pub const BAR_MAX: u8 = 5;

/// Resistance points per bar
pub const BAR_STEP: i32 = 20;

/// Remainder at which a half bar is drawn
const HALF_BAR_THRESHOLD: i32 = BAR_STEP / 2;

/// Collapse a resistance into a whole bar count in 0..=5
pub fn value_to_bars(value: i32) -> u8 {
    value.div_euclid(BAR_STEP).clamp(0, BAR_MAX as i32) as u8
}

/// Full/half/empty split of one resistance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResistanceBars {
    pub full: u32,
    pub half: u32,
    pub empty: u32,
}

impl ResistanceBars {
    /// `full` is not capped, so values above 100 may show more than five full
    /// bars; `empty` never goes negative. Negative values render as empty.
    pub fn from_value(value: i32) -> Self {
        let value = value.max(0);
        let full = (value / BAR_STEP) as u32;
        let half = u32::from(value % BAR_STEP >= HALF_BAR_THRESHOLD);
        let empty = (BAR_MAX as u32).saturating_sub(full + half);
        Self { full, half, empty }
    }

    /// Render as a fixed-width gauge, e.g. `██▌░░`
    pub fn gauge(&self) -> String {
        let mut out = String::with_capacity((self.full + self.half + self.empty) as usize * 3);
        out.extend(std::iter::repeat('█').take(self.full as usize));
        out.extend(std::iter::repeat('▌').take(self.half as usize));
        out.extend(std::iter::repeat('░').take(self.empty as usize));
        out
    }
}

/// Full/half/empty bars for every resistance kind
pub fn resistance_bars(resistances: &Resistances) -> PerKind<ResistanceBars> {
    resistances.map(|_, value| ResistanceBars::from_value(*value))
}

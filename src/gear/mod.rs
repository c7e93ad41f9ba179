pub mod armor;
pub mod artifact;
pub mod stats;

pub use armor::{Armor, ArmorConfig};
pub use artifact::Artifact;
pub use stats::{bonus_for_level, ArtifactStats, StatKey, StatLevel};

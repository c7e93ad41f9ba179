pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, OptimizerConfig};
pub use error::{OptimizerError, Result};
pub use types::{BuildGoal, PerKind, ResistanceKind, Resistances};

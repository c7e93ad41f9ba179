//! Artifact Build Optimizer - picks artifacts for an armor's slots
//!
//! Given an armor, a slot and lead-container budget, a candidate artifact
//! pool and a build goal, the optimizer fills the slots greedily, shields the
//! worst radiation emitters and reports the resulting resistances and
//! radiation verdict.

pub mod catalog;
pub mod core;
pub mod gear;
pub mod optimizer;
pub mod predictor;
pub mod resistance;
pub mod scoring;
pub mod selection;

pub use optimizer::{run_model, BuildResult, Optimizer};

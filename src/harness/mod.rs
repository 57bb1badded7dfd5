// Test-suite orchestration — argv builders, phase sequencing, scoped cleanup.

pub mod commands;
pub mod runner;
pub mod types;

pub use runner::Harness;
pub use types::{Action, RunPlan, RunStatus, plan};

//! packsmith library exports.
//!
//! The binary in `main.rs` is a thin CLI over these modules; integration
//! tests drive them directly.

pub mod clean;
pub mod commands;
pub mod config;
pub mod platform;
pub mod preflight;
pub mod process;
pub mod scaffold;
pub mod templates;
pub mod timing;
pub mod verify;
pub mod workflow;

pub use config::{ConfigError, FailurePolicy, ProjectConfig, ProjectLayout};
pub use workflow::{run, RunReport, Step, StepOutcome, StepStatus};

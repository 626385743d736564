//! Preflight checks for a packsmith run.
//!
//! Validates host tools and input files without touching the project
//! directory. Run with `packsmith preflight` before `packsmith init`.

mod host_tools;
mod inputs;
mod types;

use anyhow::{bail, Result};

use crate::config::ProjectConfig;

pub use types::{CheckResult, CheckStatus, PreflightReport};

/// Run all preflight checks.
pub fn run_preflight(config: &ProjectConfig) -> PreflightReport {
    let mut checks = Vec::new();

    println!("Running preflight checks...\n");

    println!("Checking host tools...");
    checks.extend(host_tools::check_host_tools(&config.tools));

    println!("Checking inputs...");
    checks.extend(inputs::check_inputs(config));

    println!();

    PreflightReport { checks }
}

/// Run preflight and bail if any checks fail.
pub fn run_preflight_or_fail(config: &ProjectConfig) -> Result<()> {
    let report = run_preflight(config);
    report.print();

    if !report.all_passed() {
        bail!(
            "Preflight failed: {} check(s) failed. Fix the issues above before running.",
            report.fail_count()
        );
    }

    println!("All preflight checks passed!\n");
    Ok(())
}

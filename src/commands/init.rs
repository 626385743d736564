//! Init command - scaffolds the project and runs the packaging tools.

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::config::{FailurePolicy, ProjectConfig};
use crate::process::SystemRunner;
use crate::workflow;

/// Flags accepted by `packsmith init`.
#[derive(Debug, Default)]
pub struct InitOptions {
    /// Substitute `{{key}}` placeholders while instantiating templates.
    pub render: bool,
    /// Stop after the first failed command.
    pub fail_fast: bool,
    /// Exit non-zero if any command failed.
    pub strict: bool,
    /// Write the run report as JSON here.
    pub report: Option<PathBuf>,
}

/// Execute the init command.
pub fn cmd_init(mut config: ProjectConfig, options: InitOptions) -> Result<()> {
    config.render_templates |= options.render;
    let policy = if options.fail_fast {
        FailurePolicy::Abort
    } else {
        config.on_failure
    };

    let report = workflow::run(&config, &mut SystemRunner, policy)?;

    if report.all_succeeded() {
        tracing::info!("{}", report.summary());
    } else {
        tracing::warn!("{}", report.summary());
    }

    if let Some(path) = &options.report {
        report.write_json(path)?;
        tracing::info!("Run report written to {}", path.display());
    }

    if options.strict && !report.all_succeeded() {
        bail!("Packaging incomplete: {}", report.summary());
    }
    Ok(())
}

//! Scaffold command - creates the project tree without running any tools.

use anyhow::Result;

use crate::config::ProjectConfig;
use crate::scaffold;

/// Execute the scaffold command.
pub fn cmd_scaffold(mut config: ProjectConfig, render: bool) -> Result<()> {
    config.render_templates |= render;
    let output = scaffold::scaffold(&config)?;
    tracing::info!(
        "Scaffolded {} ({} files)",
        config.layout().project_dir.display(),
        output.templates.len() + output.outputs.len()
    );
    Ok(())
}

//! Clean command - removes the project directory.

use anyhow::Result;

use crate::clean;
use crate::config::ProjectConfig;

/// Execute the clean command.
pub fn cmd_clean(config: &ProjectConfig) -> Result<()> {
    clean::clean_project(&config.layout().project_dir)?;
    Ok(())
}

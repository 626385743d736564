//! Show command - displays information.

use anyhow::Result;

use crate::config::ProjectConfig;
use crate::verify;

/// Show target for the show command.
pub enum ShowTarget {
    /// Show resolved configuration
    Config,
    /// Show what exists in the project directory
    Status,
}

/// Execute the show command.
pub fn cmd_show(config: &ProjectConfig, target: ShowTarget) -> Result<()> {
    match target {
        ShowTarget::Config => {
            config.print();
        }
        ShowTarget::Status => {
            let status = verify::inspect(config)?;
            status.print();
        }
    }
    Ok(())
}

//! Project directory cleaning.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Remove the project directory. Returns false if there was nothing to remove.
pub fn clean_project(project_dir: &Path) -> Result<bool> {
    if !project_dir.exists() {
        println!("No project directory at {}.", project_dir.display());
        return Ok(false);
    }

    println!("Removing {}...", project_dir.display());
    fs::remove_dir_all(project_dir)
        .with_context(|| format!("Failed to remove {}", project_dir.display()))?;
    println!("Clean complete.");
    Ok(true)
}

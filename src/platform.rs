//! Per-platform constants for locating tools inside a virtual environment.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Subdirectory of a virtual environment that holds its executables.
#[cfg(windows)]
pub const VENV_BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
pub const VENV_BIN_DIR: &str = "bin";

/// Interpreter used to create the virtual environment when none is configured.
#[cfg(windows)]
pub const DEFAULT_PYTHON: &str = "python";
#[cfg(not(windows))]
pub const DEFAULT_PYTHON: &str = "python3";

/// Inno Setup command-line compiler.
pub const DEFAULT_ISCC: &str = "ISCC";

/// Package installed into the environment to build the executable.
pub const DEFAULT_PACKAGER: &str = "pyinstaller";

/// Path of an executable inside the environment's bin directory.
///
/// `venv_exe(venv, "pip")` is `venv/bin/pip` on Unix and
/// `venv\Scripts\pip.exe` on Windows.
pub fn venv_exe(venv_dir: &Path, name: &str) -> PathBuf {
    venv_dir
        .join(VENV_BIN_DIR)
        .join(format!("{}{}", name, std::env::consts::EXE_SUFFIX))
}

/// Prepend `dir` to a search path, using the platform separator.
///
/// An empty or missing `existing` yields just `dir`.
pub fn prepend_search_path(dir: &Path, existing: Option<&OsString>) -> Result<OsString> {
    let mut entries = vec![dir.to_path_buf()];
    if let Some(existing) = existing {
        entries.extend(std::env::split_paths(existing).filter(|p| !p.as_os_str().is_empty()));
    }
    std::env::join_paths(entries)
        .with_context(|| format!("Cannot add {} to PATH", dir.display()))
}

//! Shared test utilities for packsmith tests.
#![allow(dead_code)]

use anyhow::{bail, Result};
use packsmith::process::{Cmd, CommandResult, CommandRunner};
use packsmith::ProjectConfig;
use std::collections::VecDeque;
use std::fs;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tempfile::TempDir;

/// Test environment with a temporary workspace and config file.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Root under which the project directory is created
    pub work_dir: PathBuf,
    /// Path of the written config file
    pub config_path: PathBuf,
}

impl TestEnv {
    /// Create a test environment with a minimal valid configuration.
    pub fn new() -> Self {
        Self::with_extra("")
    }

    /// Create a test environment, appending `extra` YAML to the config.
    pub fn with_extra(extra: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let work_dir = temp_dir.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create work dir");

        let config_path = temp_dir.path().join("config.yaml");
        let yaml = format!(
            "project_name: redzer\nproject_dir: {}\nvenv_dir: venv\nrequirements_file: requirements.txt\n{}",
            work_dir.display(),
            extra
        );
        fs::write(&config_path, yaml).expect("Failed to write config");

        Self {
            _temp_dir: temp_dir,
            work_dir,
            config_path,
        }
    }

    /// Directory containing the config file.
    pub fn root(&self) -> &Path {
        self._temp_dir.path()
    }

    /// Load the written config file.
    pub fn config(&self) -> ProjectConfig {
        ProjectConfig::load(&self.config_path).expect("Failed to load config")
    }

    /// `work_dir/redzer`
    pub fn project_dir(&self) -> PathBuf {
        self.work_dir.join("redzer")
    }
}

/// Command runner that records every command and replays scripted exit codes.
///
/// Commands beyond the script exit 0. A code of `None` simulates a program
/// that could not be started.
pub struct RecordingRunner {
    pub script: VecDeque<Option<i32>>,
    pub calls: Vec<Cmd>,
}

impl RecordingRunner {
    pub fn succeeding() -> Self {
        Self::scripted(&[])
    }

    pub fn scripted(codes: &[Option<i32>]) -> Self {
        Self {
            script: codes.iter().copied().collect(),
            calls: Vec::new(),
        }
    }

    /// Program names of the recorded calls, final path component only.
    pub fn programs(&self) -> Vec<String> {
        self.calls
            .iter()
            .map(|c| {
                Path::new(c.program())
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn execute(&mut self, cmd: &Cmd) -> Result<CommandResult> {
        self.calls.push(cmd.clone());
        match self.script.pop_front().unwrap_or(Some(0)) {
            Some(code) => Ok(CommandResult {
                status: ExitStatus::from_raw(code << 8),
                stdout: format!("ran {}", cmd.display()),
                stderr: if code == 0 {
                    String::new()
                } else {
                    "simulated failure".to_string()
                },
            }),
            None => bail!(
                "Failed to execute '{}'. Is it installed?",
                cmd.program().to_string_lossy()
            ),
        }
    }
}

/// Sorted names of the immediate subdirectories of `dir`.
pub fn subdir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read dir")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Assert that a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(path.is_file(), "Expected file to exist: {}", path.display());
}

/// Assert that two files have identical bytes.
pub fn assert_same_bytes(a: &Path, b: &Path) {
    let left = fs::read(a).unwrap_or_else(|_| panic!("Failed to read {}", a.display()));
    let right = fs::read(b).unwrap_or_else(|_| panic!("Failed to read {}", b.display()));
    assert!(
        left == right,
        "{} and {} differ",
        a.display(),
        b.display()
    );
}

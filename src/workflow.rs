//! The project initialization workflow.
//!
//! Scaffolds the project tree, then runs the five external commands in a
//! fixed order. A failing command is logged with its stderr and, under the
//! default [`FailurePolicy::Continue`], the next command still runs.

use anyhow::{Context, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{FailurePolicy, ProjectConfig, ProjectLayout};
use crate::platform;
use crate::process::{Cmd, CommandRunner};
use crate::scaffold;
use crate::templates::TemplateKind;
use crate::timing::Timer;

/// External command steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    CreateVenv,
    InstallRequirements,
    InstallPackager,
    Build,
    CompileInstaller,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Self::CreateVenv,
        Self::InstallRequirements,
        Self::InstallPackager,
        Self::Build,
        Self::CompileInstaller,
    ];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateVenv => "create virtual environment",
            Self::InstallRequirements => "install requirements",
            Self::InstallPackager => "install packager",
            Self::Build => "build executable",
            Self::CompileInstaller => "compile installer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Succeeded,
    Failed,
    /// Not attempted because an earlier step failed under `Abort`.
    Skipped,
}

/// What happened to one external command.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: Step,
    pub command: String,
    pub status: StepStatus,
    /// None if the program never started or the step was skipped.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

/// Outcome of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub project_dir: PathBuf,
    pub steps: Vec<StepOutcome>,
}

impl RunReport {
    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.status == StepStatus::Succeeded)
    }

    pub fn count(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|s| s.status == status).count()
    }

    pub fn status_of(&self, step: Step) -> Option<StepStatus> {
        self.steps.iter().find(|s| s.step == step).map(|s| s.status)
    }

    /// One-line summary for the log.
    pub fn summary(&self) -> String {
        format!(
            "{}/{} commands succeeded, {} failed, {} skipped",
            self.count(StepStatus::Succeeded),
            self.steps.len(),
            self.count(StepStatus::Failed),
            self.count(StepStatus::Skipped)
        )
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write run report {}", path.display()))?;
        Ok(())
    }
}

/// Environment overlay for commands that run inside the venv.
///
/// Sets `VIRTUAL_ENV` and puts the venv's executable directory first on
/// `PATH`, which is what activating the environment would do.
pub fn venv_overlay(layout: &ProjectLayout) -> Result<Vec<(OsString, OsString)>> {
    let path = platform::prepend_search_path(&layout.venv_bin, std::env::var_os("PATH").as_ref())?;
    Ok(vec![
        (
            OsString::from("VIRTUAL_ENV"),
            layout.venv_dir.as_os_str().to_os_string(),
        ),
        (OsString::from("PATH"), path),
    ])
}

/// Build the five commands for `config`, in execution order.
pub fn plan_commands(config: &ProjectConfig) -> Result<Vec<(Step, Cmd)>> {
    let layout = config.layout();
    let overlay = venv_overlay(&layout)?;
    let pip = platform::venv_exe(&layout.venv_dir, "pip");
    let packager = platform::venv_exe(&layout.venv_dir, &config.tools.packager);
    let name = &config.project_name;
    let spec = layout
        .project_dir
        .join(TemplateKind::BuildSpec.output_filename(name));
    let installer = layout
        .project_dir
        .join(TemplateKind::Installer.output_filename(name));

    Ok(vec![
        (
            Step::CreateVenv,
            Cmd::new(&config.tools.python)
                .args(["-m", "venv"])
                .arg_path(&layout.venv_dir),
        ),
        (
            Step::InstallRequirements,
            Cmd::new(&pip)
                .args(["install", "-r"])
                .arg_path(&layout.requirements)
                .envs(overlay.clone()),
        ),
        (
            Step::InstallPackager,
            Cmd::new(&pip)
                .arg("install")
                .arg(&config.tools.packager)
                .envs(overlay.clone()),
        ),
        (
            Step::Build,
            Cmd::new(&packager).arg_path(&spec).envs(overlay),
        ),
        (
            Step::CompileInstaller,
            Cmd::new(&config.tools.iscc).arg_path(&installer),
        ),
    ])
}

/// Run every planned command through `runner`.
pub fn run_commands<R: CommandRunner + ?Sized>(
    commands: &[(Step, Cmd)],
    runner: &mut R,
    policy: FailurePolicy,
) -> Vec<StepOutcome> {
    let mut outcomes = Vec::with_capacity(commands.len());
    let mut aborted = false;

    for (step, cmd) in commands {
        let command = cmd.display();

        if aborted {
            tracing::warn!("Skipping {}: an earlier step failed", step);
            outcomes.push(StepOutcome {
                step: *step,
                command,
                status: StepStatus::Skipped,
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
                duration_ms: 0,
            });
            continue;
        }

        let timer = Timer::start(&step.to_string());
        let outcome = match runner.execute(cmd) {
            Ok(result) if result.success() => {
                tracing::info!("Command succeeded: {}", command);
                if !result.stdout_trimmed().is_empty() {
                    tracing::info!("{}", result.stdout_trimmed());
                }
                (StepStatus::Succeeded, Some(result.code()), result.stdout, result.stderr)
            }
            Ok(result) => {
                tracing::error!("Command failed: {} (exit code {})", command, result.code());
                if !result.stderr_trimmed().is_empty() {
                    tracing::error!("{}", result.stderr_trimmed());
                }
                (StepStatus::Failed, Some(result.code()), result.stdout, result.stderr)
            }
            Err(e) => {
                tracing::error!("Command failed: {}", command);
                tracing::error!("{:#}", e);
                (StepStatus::Failed, None, String::new(), format!("{:#}", e))
            }
        };
        let elapsed = timer.finish();

        let (status, exit_code, stdout, stderr) = outcome;
        if status == StepStatus::Failed && policy == FailurePolicy::Abort {
            aborted = true;
        }
        outcomes.push(StepOutcome {
            step: *step,
            command,
            status,
            exit_code,
            stdout,
            stderr,
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        });
    }

    outcomes
}

/// Scaffold the project and run the packaging commands.
///
/// Local filesystem errors during scaffolding are returned. External
/// command failures never are; they are logged and recorded in the report.
pub fn run<R: CommandRunner + ?Sized>(
    config: &ProjectConfig,
    runner: &mut R,
    policy: FailurePolicy,
) -> Result<RunReport> {
    tracing::info!("Initializing project...");
    scaffold::scaffold(config)?;

    let commands = plan_commands(config)?;
    let steps = run_commands(&commands, runner, policy);

    tracing::info!("Project initialization complete");
    Ok(RunReport {
        project_dir: config.layout().project_dir,
        steps,
    })
}

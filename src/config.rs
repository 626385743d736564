//! Configuration management for packsmith.
//!
//! Reads the project configuration from a YAML file. Tool names can be
//! overridden from the environment (a `.env` file is loaded by `main`
//! before this runs), and environment variables take precedence over the
//! file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::platform::{self, DEFAULT_ISCC, DEFAULT_PACKAGER, DEFAULT_PYTHON};

/// Configuration file used when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Environment variable overriding `tools.python`.
pub const ENV_PYTHON: &str = "PACKSMITH_PYTHON";
/// Environment variable overriding `tools.iscc`.
pub const ENV_ISCC: &str = "PACKSMITH_ISCC";
/// Environment variable overriding `tools.packager`.
pub const ENV_PACKAGER: &str = "PACKSMITH_PACKAGER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read configuration file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Missing required configuration field '{field}'")]
    MissingField { field: &'static str },

    #[error("Invalid configuration field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// What to do when an external command fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and run the next step anyway.
    #[default]
    Continue,
    /// Stop after the first failed command.
    Abort,
}

/// Replacement template files. Unset entries use the built-in content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateOverrides {
    pub setup: Option<PathBuf>,
    pub build_spec: Option<PathBuf>,
    pub installer: Option<PathBuf>,
}

/// External programs invoked by the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tools {
    /// Interpreter used to create the virtual environment.
    pub python: String,
    /// Inno Setup compiler.
    pub iscc: String,
    /// Package name of the build tool, also the executable name in the venv.
    pub packager: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            python: DEFAULT_PYTHON.to_string(),
            iscc: DEFAULT_ISCC.to_string(),
            packager: DEFAULT_PACKAGER.to_string(),
        }
    }
}

/// File format. Required fields are optional here so a missing one is
/// reported by name instead of as a generic YAML error.
#[derive(Debug, Deserialize)]
struct RawConfig {
    project_name: Option<String>,
    project_dir: Option<PathBuf>,
    venv_dir: Option<PathBuf>,
    requirements_file: Option<PathBuf>,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    render_templates: bool,
    #[serde(default)]
    variables: BTreeMap<String, String>,
    #[serde(default)]
    templates: TemplateOverrides,
    #[serde(default)]
    tools: Tools,
    #[serde(default)]
    on_failure: FailurePolicy,
}

fn default_version() -> String {
    "0.1".to_string()
}

/// Validated project configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub project_name: String,
    /// Root under which `project_name` is created.
    pub project_dir: PathBuf,
    /// Virtual environment location, relative to the project directory.
    pub venv_dir: PathBuf,
    /// Requirements file, relative to the project directory.
    pub requirements_file: PathBuf,
    pub version: String,
    pub render_templates: bool,
    pub variables: BTreeMap<String, String>,
    pub templates: TemplateOverrides,
    pub tools: Tools,
    pub on_failure: FailurePolicy,
}

impl ProjectConfig {
    /// Load and validate a configuration file.
    ///
    /// Relative template override paths are resolved against the
    /// directory containing the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.templates.resolve_against(base);
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse and validate YAML content. No environment overrides applied.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: PathBuf::new(),
                source,
            })?;
        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let project_name = required_str(raw.project_name, "project_name")?;
        check_single_segment(&project_name, "project_name")?;
        let project_dir = required_path(raw.project_dir, "project_dir")?;
        let venv_dir = required_path(raw.venv_dir, "venv_dir")?;
        let requirements_file = required_path(raw.requirements_file, "requirements_file")?;

        Ok(Self {
            project_name,
            project_dir,
            venv_dir,
            requirements_file,
            version: raw.version,
            render_templates: raw.render_templates,
            variables: raw.variables,
            templates: raw.templates,
            tools: raw.tools,
            on_failure: raw.on_failure,
        })
    }

    /// Override tool names from `PACKSMITH_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        let overrides = [
            (ENV_PYTHON, &mut self.tools.python),
            (ENV_ISCC, &mut self.tools.iscc),
            (ENV_PACKAGER, &mut self.tools.packager),
        ];
        for (key, slot) in overrides {
            if let Ok(value) = std::env::var(key) {
                let value = value.trim();
                if !value.is_empty() {
                    *slot = value.to_string();
                }
            }
        }
    }

    /// Derived paths for this configuration.
    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(self)
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        let layout = self.layout();
        println!("Configuration:");
        println!("  project_name:      {}", self.project_name);
        println!("  version:           {}", self.version);
        println!("  project_dir:       {}", layout.project_dir.display());
        println!("  venv_dir:          {}", layout.venv_dir.display());
        println!("  requirements_file: {}", layout.requirements.display());
        println!("  render_templates:  {}", self.render_templates);
        println!("  on_failure:        {:?}", self.on_failure);
        println!("Tools:");
        println!("  python:   {}", self.tools.python);
        println!("  packager: {}", self.tools.packager);
        println!("  iscc:     {}", self.tools.iscc);
        for (label, path) in [
            ("setup", &self.templates.setup),
            ("build_spec", &self.templates.build_spec),
            ("installer", &self.templates.installer),
        ] {
            if let Some(path) = path {
                println!("Template override {}: {}", label, path.display());
            }
        }
    }
}

impl TemplateOverrides {
    fn resolve_against(&mut self, base: &Path) {
        for slot in [&mut self.setup, &mut self.build_spec, &mut self.installer] {
            if let Some(path) = slot.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }
}

fn required_str(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField { field }),
    }
}

/// `name` is joined onto `project_dir` and the result is deleted on every
/// run, so it must stay a single plain directory name.
fn check_single_segment(name: &str, field: &'static str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidField {
        field,
        reason: format!("'{}' {}", name, reason),
    };
    if name.contains(|c: char| c == '/' || c == '\\') {
        return Err(invalid("must not contain a path separator"));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid("must be a single directory name")),
    }
}

fn required_path(value: Option<PathBuf>, field: &'static str) -> Result<PathBuf, ConfigError> {
    match value {
        Some(p) if !p.as_os_str().is_empty() => Ok(p),
        _ => Err(ConfigError::MissingField { field }),
    }
}

/// Paths derived from a [`ProjectConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// `project_dir / project_name`, the tree that is reset on every run.
    pub project_dir: PathBuf,
    pub template_dir: PathBuf,
    pub venv_dir: PathBuf,
    /// Executable directory inside the venv.
    pub venv_bin: PathBuf,
    pub requirements: PathBuf,
}

impl ProjectLayout {
    pub fn new(config: &ProjectConfig) -> Self {
        let project_dir = config.project_dir.join(&config.project_name);
        let template_dir = project_dir.join("templates");
        let venv_dir = project_dir.join(&config.venv_dir);
        let venv_bin = venv_dir.join(platform::VENV_BIN_DIR);
        let requirements = project_dir.join(&config.requirements_file);
        Self {
            project_dir,
            template_dir,
            venv_dir,
            venv_bin,
            requirements,
        }
    }
}

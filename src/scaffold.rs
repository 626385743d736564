//! Project tree creation: destructive reset, template materialization and
//! instantiation.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ProjectConfig, ProjectLayout};
use crate::templates::{self, Template, TemplateKind};

/// Subdirectories created under every project directory, in creation order.
pub const SUBDIRS: [&str; 5] = ["modules", "services", "caching", "tests", "templates"];

/// Files written by a scaffold run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOutput {
    /// Paths under `templates/`, in [`TemplateKind::ALL`] order.
    pub templates: Vec<PathBuf>,
    /// Instantiated files at the project root, same order.
    pub outputs: Vec<PathBuf>,
}

impl ScaffoldOutput {
    /// Instantiated file for `kind`.
    pub fn output(&self, kind: TemplateKind) -> &Path {
        &self.outputs[kind as usize]
    }
}

/// Reset the project tree and write all template files.
///
/// Template overrides are read before anything is deleted, so a failure
/// there leaves the existing tree untouched.
pub fn scaffold(config: &ProjectConfig) -> Result<ScaffoldOutput> {
    let layout = config.layout();
    let templates = templates::load_templates(config)?;

    reset_project_dir(&layout.project_dir)?;
    let template_paths = materialize_templates(&layout, &config.project_name, &templates)?;

    let vars = config
        .render_templates
        .then(|| templates::render_variables(config));
    let outputs = instantiate_templates(&layout, &config.project_name, vars.as_ref())?;

    Ok(ScaffoldOutput {
        templates: template_paths,
        outputs,
    })
}

/// Delete `project_dir` if it exists, then recreate it with [`SUBDIRS`].
pub fn reset_project_dir(project_dir: &Path) -> Result<()> {
    if project_dir.exists() {
        tracing::info!("Removing existing project directory: {}", project_dir.display());
        fs::remove_dir_all(project_dir)
            .with_context(|| format!("Failed to remove {}", project_dir.display()))?;
    }

    fs::create_dir_all(project_dir)
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;
    for sub in SUBDIRS {
        let dir = project_dir.join(sub);
        fs::create_dir(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    tracing::info!("Created project directory structure");
    Ok(())
}

/// Write each template under `templates/`.
pub fn materialize_templates(
    layout: &ProjectLayout,
    project_name: &str,
    templates: &[Template],
) -> Result<Vec<PathBuf>> {
    templates
        .iter()
        .map(|template| {
            let path = layout
                .template_dir
                .join(template.kind.template_filename(project_name));
            write_file(&path, &template.content)?;
            Ok(path)
        })
        .collect()
}

/// Copy each template from `templates/` to its output file at the root.
///
/// Without `vars` the copy is byte-for-byte. With `vars`, `{{key}}`
/// placeholders are substituted on the way.
pub fn instantiate_templates(
    layout: &ProjectLayout,
    project_name: &str,
    vars: Option<&BTreeMap<String, String>>,
) -> Result<Vec<PathBuf>> {
    TemplateKind::ALL
        .into_iter()
        .map(|kind| {
            let source = layout.template_dir.join(kind.template_filename(project_name));
            let dest = layout.project_dir.join(kind.output_filename(project_name));
            let content = fs::read_to_string(&source)
                .with_context(|| format!("Failed to read template {}", source.display()))?;
            let content = match vars {
                Some(vars) => templates::render(&content, vars),
                None => content,
            };
            write_file(&dest, &content)?;
            Ok(dest)
        })
        .collect()
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

//! Inspection of an existing project tree.
//!
//! Reports what a scaffold run left behind: which of the expected
//! subdirectories exist, which template and output files are present, and
//! whether each output still matches its template byte for byte.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProjectConfig;
use crate::scaffold::SUBDIRS;
use crate::templates::TemplateKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Missing,
    /// Output identical to its template.
    Matches,
    /// Output differs from its template (rendered or edited).
    Differs,
    /// Output exists but its template is gone.
    Orphaned,
}

#[derive(Debug, Clone)]
pub struct FileStatus {
    pub kind: TemplateKind,
    pub template: PathBuf,
    pub output: PathBuf,
    pub state: FileState,
}

#[derive(Debug, Clone)]
pub struct ProjectStatus {
    pub project_dir: PathBuf,
    pub exists: bool,
    pub missing_dirs: Vec<&'static str>,
    /// Top-level entries that a scaffold run does not create.
    pub unexpected: Vec<PathBuf>,
    pub files: Vec<FileStatus>,
}

impl ProjectStatus {
    /// True when the tree looks exactly like a fresh scaffold run.
    pub fn is_complete(&self) -> bool {
        self.exists
            && self.missing_dirs.is_empty()
            && self
                .files
                .iter()
                .all(|f| matches!(f.state, FileState::Matches | FileState::Differs))
    }

    pub fn print(&self) {
        println!("Project: {}", self.project_dir.display());
        if !self.exists {
            println!("  NOT FOUND (run 'packsmith scaffold' to create it)");
            return;
        }

        for dir in SUBDIRS {
            let mark = if self.missing_dirs.contains(&dir) { "✗" } else { "✓" };
            println!("  {} {}/", mark, dir);
        }

        println!();
        for file in &self.files {
            let (mark, note) = match file.state {
                FileState::Matches => ("✓", "matches template"),
                FileState::Differs => ("~", "differs from template"),
                FileState::Orphaned => ("⚠", "template missing"),
                FileState::Missing => ("✗", "missing"),
            };
            let name = file
                .output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("  {} {} ({}): {}", mark, name, file.kind.label(), note);
        }

        if !self.unexpected.is_empty() {
            println!();
            println!("  Other entries:");
            for path in &self.unexpected {
                println!("    {}", path.display());
            }
        }
    }
}

/// Inspect the project tree described by `config`.
pub fn inspect(config: &ProjectConfig) -> Result<ProjectStatus> {
    let layout = config.layout();
    let project_dir = layout.project_dir.clone();

    if !project_dir.is_dir() {
        return Ok(ProjectStatus {
            project_dir,
            exists: false,
            missing_dirs: SUBDIRS.to_vec(),
            unexpected: Vec::new(),
            files: Vec::new(),
        });
    }

    let missing_dirs = SUBDIRS
        .into_iter()
        .filter(|d| !project_dir.join(d).is_dir())
        .collect();

    let name = &config.project_name;
    let mut expected: Vec<PathBuf> = SUBDIRS.iter().map(|d| project_dir.join(d)).collect();
    // A nested venv_dir shows up as its first component at the top level
    let first = config
        .venv_dir
        .components()
        .find(|c| !matches!(c, Component::CurDir));
    match first {
        Some(first @ Component::Normal(_)) => expected.push(project_dir.join(first)),
        _ => expected.push(layout.venv_dir.clone()),
    }

    let mut files = Vec::new();
    for kind in TemplateKind::ALL {
        let template = layout.template_dir.join(kind.template_filename(name));
        let output = project_dir.join(kind.output_filename(name));
        let state = compare(&template, &output)?;
        expected.push(output.clone());
        files.push(FileStatus {
            kind,
            template,
            output,
            state,
        });
    }

    let mut unexpected = Vec::new();
    for entry in WalkDir::new(&project_dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to read {}", project_dir.display()))?;
        if !expected.iter().any(|p| p == entry.path()) {
            unexpected.push(entry.path().to_path_buf());
        }
    }
    unexpected.sort();

    Ok(ProjectStatus {
        project_dir,
        exists: true,
        missing_dirs,
        unexpected,
        files,
    })
}

fn compare(template: &Path, output: &Path) -> Result<FileState> {
    if !output.is_file() {
        return Ok(FileState::Missing);
    }
    if !template.is_file() {
        return Ok(FileState::Orphaned);
    }
    if sha256_file(template)? == sha256_file(output)? {
        Ok(FileState::Matches)
    } else {
        Ok(FileState::Differs)
    }
}

/// Hex SHA-256 of a file's content.
pub fn sha256_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

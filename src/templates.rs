//! The three packaging templates and their file names.
//!
//! Template content is opaque to the workflow. The built-in content is
//! embedded from `templates/`; a configuration can replace any of the three
//! with its own file.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;

use crate::config::ProjectConfig;

/// Which of the three generated files a template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateKind {
    /// setuptools packaging manifest.
    Setup,
    /// PyInstaller build-spec.
    BuildSpec,
    /// Inno Setup installer script.
    Installer,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [Self::Setup, Self::BuildSpec, Self::Installer];

    /// File name under `templates/`.
    pub fn template_filename(self, project_name: &str) -> String {
        match self {
            Self::Setup => "setup_template.py".to_string(),
            Self::BuildSpec => format!("{}_template.spec", project_name),
            Self::Installer => format!("{}_installer_template.iss", project_name),
        }
    }

    /// File name at the project root.
    pub fn output_filename(self, project_name: &str) -> String {
        match self {
            Self::Setup => "setup.py".to_string(),
            Self::BuildSpec => format!("{}.spec", project_name),
            Self::Installer => format!("{}_installer.iss", project_name),
        }
    }

    pub fn builtin(self) -> &'static str {
        match self {
            Self::Setup => include_str!("../templates/setup.py.tmpl"),
            Self::BuildSpec => include_str!("../templates/build.spec.tmpl"),
            Self::Installer => include_str!("../templates/installer.iss.tmpl"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Setup => "packaging manifest",
            Self::BuildSpec => "build spec",
            Self::Installer => "installer script",
        }
    }
}

/// A template kind paired with the content to materialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub kind: TemplateKind,
    pub content: String,
}

/// Collect the three templates for `config`, reading overrides from disk.
pub fn load_templates(config: &ProjectConfig) -> Result<Vec<Template>> {
    TemplateKind::ALL
        .into_iter()
        .map(|kind| {
            let override_path = match kind {
                TemplateKind::Setup => &config.templates.setup,
                TemplateKind::BuildSpec => &config.templates.build_spec,
                TemplateKind::Installer => &config.templates.installer,
            };
            let content = match override_path {
                Some(path) => fs::read_to_string(path).with_context(|| {
                    format!("Failed to read {} template {}", kind.label(), path.display())
                })?,
                None => kind.builtin().to_string(),
            };
            Ok(Template { kind, content })
        })
        .collect()
}

/// Substitution map used when rendering is enabled.
///
/// Built-in keys are `project_name`, `project_slug` and `version`; entries
/// from the config's `variables` are added after and win on conflict.
pub fn render_variables(config: &ProjectConfig) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    vars.insert("project_name".to_string(), config.project_name.clone());
    vars.insert("project_slug".to_string(), slug(&config.project_name));
    vars.insert("version".to_string(), config.version.clone());
    vars.extend(config.variables.clone());
    vars
}

fn slug(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Replace `{{key}}` placeholders whose key is in `vars`.
///
/// Whitespace inside the braces is allowed. Placeholders with unknown keys,
/// and any other braces, are copied through unchanged.
pub fn render(content: &str, vars: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let substituted = after_open.find("}}").and_then(|end| {
            let key = after_open[..end].trim();
            if is_key(key) {
                vars.get(key).map(|value| (value, end))
            } else {
                None
            }
        });

        match substituted {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after_open[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_key(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_filenames_follow_project_name() {
        assert_eq!(TemplateKind::Setup.template_filename("acme"), "setup_template.py");
        assert_eq!(TemplateKind::Setup.output_filename("acme"), "setup.py");
        assert_eq!(TemplateKind::BuildSpec.template_filename("acme"), "acme_template.spec");
        assert_eq!(TemplateKind::BuildSpec.output_filename("acme"), "acme.spec");
        assert_eq!(
            TemplateKind::Installer.template_filename("acme"),
            "acme_installer_template.iss"
        );
        assert_eq!(TemplateKind::Installer.output_filename("acme"), "acme_installer.iss");
    }

    #[test]
    fn test_builtins_are_embedded() {
        assert!(TemplateKind::Setup.builtin().starts_with("from setuptools import"));
        assert!(TemplateKind::BuildSpec.builtin().contains("Analysis("));
        assert!(TemplateKind::Installer.builtin().contains("[Setup]"));
    }

    #[test]
    fn test_render_known_keys() {
        let v = vars(&[("project_name", "Acme"), ("version", "1.2")]);
        assert_eq!(
            render("name='{{project_name}}' v={{ version }}", &v),
            "name='Acme' v=1.2"
        );
    }

    #[test]
    fn test_render_leaves_unknown_and_stray_braces() {
        let v = vars(&[("project_name", "Acme")]);
        let input = "entry_points={{\n}} {{unknown}} {{project_name}} {pf}\\App";
        assert_eq!(
            render(input, &v),
            "entry_points={{\n}} {{unknown}} Acme {pf}\\App"
        );
    }

    #[test]
    fn test_render_unterminated_placeholder() {
        let v = vars(&[("a", "x")]);
        assert_eq!(render("tail {{a", &v), "tail {{a");
    }

    #[test]
    fn test_render_builtin_setup_is_stable() {
        // Built-in setup template contains `{{` that is not a placeholder
        let v = vars(&[("project_name", "Acme")]);
        let content = TemplateKind::Setup.builtin();
        assert_eq!(render(content, &v), content);
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("My App"), "my_app");
        assert_eq!(slug("redzer"), "redzer");
    }
}

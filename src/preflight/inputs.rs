//! Checks on the files a run consumes.

use std::path::Path;

use crate::config::ProjectConfig;

use super::types::CheckResult;

/// Check the requirements file and any template overrides.
pub fn check_inputs(config: &ProjectConfig) -> Vec<CheckResult> {
    let mut results = Vec::new();
    let layout = config.layout();

    results.push(check_requirements(&layout.requirements, &layout.project_dir));

    for (label, path) in [
        ("setup template", &config.templates.setup),
        ("build spec template", &config.templates.build_spec),
        ("installer template", &config.templates.installer),
    ] {
        match path {
            Some(path) if path.is_file() => {
                results.push(CheckResult::pass_with(label, &path.display().to_string()))
            }
            Some(path) => results.push(CheckResult::fail(
                label,
                &format!("Override not found: {}", path.display()),
            )),
            None => {}
        }
    }

    results
}

fn check_requirements(requirements: &Path, project_dir: &Path) -> CheckResult {
    const NAME: &str = "requirements file";

    // The reset deletes everything under the project dir before pip runs
    if requirements.starts_with(project_dir) {
        return CheckResult::warn(
            NAME,
            &format!(
                "{} is inside the project directory, which is deleted before install. \
                 Use an absolute requirements_file path.",
                requirements.display()
            ),
        );
    }

    if requirements.is_file() {
        CheckResult::pass_with(NAME, &requirements.display().to_string())
    } else {
        CheckResult::fail(NAME, &format!("Not found: {}", requirements.display()))
    }
}

//! Host tool availability checks.

use crate::config::Tools;
use crate::process::{self, Cmd};

use super::types::{CheckResult, CheckStatus};

/// Check the interpreter and the installer compiler are installed.
pub fn check_host_tools(tools: &Tools) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let python = check_tool_exists(
        &tools.python,
        "Required to create the virtual environment",
        true,
    );
    let python_found = python.status == CheckStatus::Pass;
    results.push(python);

    if python_found {
        results.push(check_venv_module(&tools.python));
    } else {
        results.push(CheckResult::skip("venv module", "Interpreter not found"));
    }

    // ISCC only exists on Windows hosts; the rest of the run is still useful
    results.push(check_tool_exists(
        &tools.iscc,
        "Required to compile the installer (Inno Setup)",
        false,
    ));

    results
}

/// Check if a tool exists in PATH.
fn check_tool_exists(tool: &str, purpose: &str, required: bool) -> CheckResult {
    match process::which(tool) {
        Some(path) => CheckResult::pass_with(tool, &path.to_string_lossy()),
        None => {
            let msg = format!("Not found in PATH. {}", purpose);
            if required {
                CheckResult::fail(tool, &msg)
            } else {
                CheckResult::warn(tool, &msg)
            }
        }
    }
}

/// Some distributions ship the interpreter without `venv`.
fn check_venv_module(python: &str) -> CheckResult {
    let result = Cmd::new(python)
        .args(["-c", "import venv"])
        .error_msg(format!("'{} -c \"import venv\"' failed", python))
        .run();
    match result {
        Ok(_) => CheckResult::pass("venv module"),
        Err(e) => CheckResult::fail("venv module", &format!("{:#}", e)),
    }
}

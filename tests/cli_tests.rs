//! End-to-end tests of the `packsmith` binary.

mod helpers;

use helpers::{subdir_names, TestEnv};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn packsmith(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_packsmith"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("PACKSMITH_PYTHON")
        .env_remove("PACKSMITH_ISCC")
        .env_remove("PACKSMITH_PACKAGER")
        .output()
        .expect("Failed to run packsmith")
}

#[test]
fn test_missing_config_exits_nonzero_without_side_effects() {
    let temp = TempDir::new().unwrap();

    let output = packsmith(temp.path(), &["does-not-exist.yaml"]);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration file not found"), "{}", stderr);
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_default_config_path_is_config_yaml() {
    let temp = TempDir::new().unwrap();
    let output = packsmith(temp.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("config.yaml"));
}

#[test]
fn test_invalid_config_names_the_field() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.yaml"),
        "project_name: app\nproject_dir: out\nrequirements_file: r.txt\n",
    )
    .unwrap();

    let output = packsmith(temp.path(), &["scaffold"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("'venv_dir'"));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_scaffold_subcommand_logs_with_timestamps() {
    let env = TestEnv::new();
    let config = env.config_path.to_string_lossy().into_owned();

    let output = packsmith(env.root(), &["scaffold", &config]);

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(
        subdir_names(&env.project_dir()),
        vec!["caching", "modules", "services", "templates", "tests"]
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = Regex::new(r"(?m)^.*\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}.*INFO.*Created project directory structure$")
        .unwrap();
    assert!(line.is_match(&stderr), "{}", stderr);
}

#[test]
fn test_dotenv_log_filter_applies() {
    let env = TestEnv::new();
    fs::write(env.root().join(".env"), "RUST_LOG=warn\n").unwrap();
    let config = env.config_path.to_string_lossy().into_owned();

    let output = packsmith(env.root(), &["scaffold", &config]);

    assert!(output.status.success(), "{:?}", output);
    assert!(env.project_dir().join("setup.py").is_file());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("INFO"), "{}", stderr);
}

#[test]
fn test_init_fail_fast_strict_with_missing_interpreter() {
    let env = TestEnv::with_extra("tools:\n  python: nonexistent_python_12345\n");
    let config = env.config_path.to_string_lossy().into_owned();
    let report = env.root().join("report.json");
    let report_arg = report.to_string_lossy().into_owned();

    let output = packsmith(
        env.root(),
        &["init", &config, "--fail-fast", "--strict", "--report", &report_arg],
    );

    assert!(!output.status.success());
    assert!(env.project_dir().join("setup.py").is_file());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["steps"][0]["status"], "failed");
    assert_eq!(json["steps"][4]["status"], "skipped");
}

#[test]
fn test_show_status_after_scaffold() {
    let env = TestEnv::new();
    let config = env.config_path.to_string_lossy().into_owned();

    assert!(packsmith(env.root(), &["scaffold", &config]).status.success());
    let output = packsmith(env.root(), &["show", "status", &config]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("setup.py (packaging manifest): matches template"), "{}", stdout);
}

#[test]
fn test_clean_removes_project() {
    let env = TestEnv::new();
    let config = env.config_path.to_string_lossy().into_owned();

    assert!(packsmith(env.root(), &["scaffold", &config]).status.success());
    assert!(env.project_dir().exists());

    assert!(packsmith(env.root(), &["clean", &config]).status.success());
    assert!(!env.project_dir().exists());
}

//! Integration tests for top-level CLI behavior

use assert_cmd::Command;
use predicates::prelude::*;

use crate::helpers::{fixture, run_castdoc};

fn castdoc_cmd() -> Command {
    let mut cmd = Command::cargo_bin("castdoc").unwrap();
    cmd.env("NO_COLOR", "1")
        .env("CASTDOC_CONFIG", fixture("no-such-config.toml"));
    cmd
}

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn help_lists_every_subcommand() {
    let (stdout, _stderr, exit_code) = run_castdoc(&["--help"]);

    assert_eq!(exit_code, 0);
    for name in ["process", "show", "sections", "info", "config", "completions"] {
        assert!(stdout.contains(name), "missing {} in help:\n{}", name, stdout);
    }
}

#[test]
fn version_starts_with_package_version() {
    castdoc_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "castdoc {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn completions_generate_a_bash_script() {
    castdoc_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_castdoc"));
}

// ============================================================================
// Argument Errors
// ============================================================================

#[test]
fn process_without_files_is_a_usage_error() {
    let (_stdout, stderr, exit_code) = run_castdoc(&["process"]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("required arguments"));
    assert!(stderr.contains("<FILES>"));
}

#[test]
fn unknown_format_is_rejected() {
    castdoc_cmd()
        .args(["show", "x.cast", "--format", "html"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn config_path_reports_missing_file() {
    let (stdout, _stderr, exit_code) = run_castdoc(&["config", "path"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("no-such-config.toml"));
    assert!(stdout.contains("using defaults"));
}

#[test]
fn config_show_prints_defaults_as_toml() {
    let (stdout, _stderr, exit_code) = run_castdoc(&["config", "show"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("[dedup]"));
    assert!(stdout.contains("min_match = 3"));
}

#[test]
fn explicit_config_file_is_used() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("castdoc.toml");
    std::fs::write(&path, "[dedup]\nmin_match = 7\n").unwrap();

    castdoc_cmd()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("min_match = 7"));
}

#[test]
fn invalid_config_file_fails() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("castdoc.toml");
    std::fs::write(&path, "[dedup]\nmin_match = 0\n").unwrap();

    castdoc_cmd()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_match"));
}

// ============================================================================
// Info
// ============================================================================

#[test]
fn info_summarizes_the_recording() {
    let plain = fixture("plain.cast");
    let (stdout, _stderr, exit_code) = run_castdoc(&["info", plain.to_str().unwrap()]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("plain demo"));
    assert!(stdout.contains("40x6"));
    assert!(stdout.contains("10 (10 output, 0 markers, 0 resizes)"));
    assert!(stdout.contains("Duration"));
}

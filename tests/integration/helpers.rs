//! Shared helpers for integration tests

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// Path to the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Path to a fixture file
pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Load a fixture file as a string
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

/// Copy a fixture into a fresh temp directory
pub fn temp_fixture(name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::copy(fixture(name), &path).unwrap();
    (temp_dir, path)
}

/// The castdoc binary with color and user config out of the way
pub fn castdoc() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_castdoc"));
    cmd.env("NO_COLOR", "1")
        .env("CASTDOC_CONFIG", fixtures_dir().join("no-such-config.toml"))
        .env_remove("CASTDOC_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Run castdoc and capture (stdout, stderr, exit code)
pub fn run_castdoc(args: &[&str]) -> (String, String, i32) {
    let output = castdoc().args(args).output().expect("Failed to execute castdoc");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

//! Integration tests for the process command

use tempfile::TempDir;

use crate::helpers::{castdoc, fixture, temp_fixture};

#[test]
fn process_writes_one_artifact_per_session() {
    let out = TempDir::new().unwrap();
    let output = castdoc()
        .arg("process")
        .arg(fixture("plain.cast"))
        .arg(fixture("markers.cast"))
        .arg("--out-dir")
        .arg(out.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2);

    for name in ["plain.json", "markers.json"] {
        let path = out.path().join(name);
        assert!(path.exists(), "missing {}", name);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["sections"].as_array().is_some_and(|s| !s.is_empty()));
    }
}

#[test]
fn process_continues_past_failures_and_exits_non_zero() {
    let out = TempDir::new().unwrap();
    let output = castdoc()
        .arg("process")
        .arg(fixture("broken.cast"))
        .arg(fixture("plain.cast"))
        .arg("--out-dir")
        .arg(out.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.cast"));
    assert!(stderr.contains("1 of 2 sessions failed"));
    assert!(out.path().join("plain.json").exists());
    assert!(!out.path().join("broken.json").exists());
}

#[test]
fn process_output_is_stable_across_runs() {
    let (temp, path) = temp_fixture("redraw.cast");
    let out = temp.path().join("out");

    let mut artifacts = Vec::new();
    for _ in 0..2 {
        let status = castdoc()
            .arg("process")
            .arg(&path)
            .arg("-o")
            .arg(&out)
            .arg("--pretty")
            .status()
            .unwrap();
        assert!(status.success());
        artifacts.push(std::fs::read_to_string(out.join("redraw.json")).unwrap());
    }

    assert_eq!(artifacts[0], artifacts[1]);
    assert!(artifacts[0].contains("\n  \"session\""));
}

#[test]
fn process_uses_configured_output_directory() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("artifacts");
    let config = temp.path().join("config.toml");
    std::fs::write(
        &config,
        format!("[output]\ndirectory = {:?}\n", out.to_string_lossy()),
    )
    .unwrap();

    let status = castdoc()
        .arg("process")
        .arg(fixture("plain.cast"))
        .env("CASTDOC_CONFIG", &config)
        .status()
        .unwrap();

    assert!(status.success());
    assert!(out.join("plain.json").exists());
}

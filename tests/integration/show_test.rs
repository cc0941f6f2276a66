//! Integration tests for the show and sections commands

use crate::helpers::{fixture, run_castdoc};

fn path(name: &str) -> String {
    fixture(name).to_string_lossy().into_owned()
}

#[test]
fn show_plain_recording() {
    let (stdout, stderr, exit_code) = run_castdoc(&["show", &path("plain.cast")]);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    insta::assert_snapshot!("show_plain", stdout);
}

#[test]
fn show_collapses_redraws() {
    let (stdout, _stderr, exit_code) = run_castdoc(&["show", &path("redraw.cast")]);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout.lines().filter(|l| *l == "Title").count(), 1, "{}", stdout);
    assert!(stdout.contains("done"));
}

#[test]
fn show_single_section() {
    let (stdout, _stderr, exit_code) =
        run_castdoc(&["show", &path("markers.cast"), "--section", "2"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.starts_with("── 2. build"), "{}", stdout);
    assert!(stdout.contains("compiling"));
    assert!(!stdout.contains("running tests"));
}

#[test]
fn show_unknown_section_fails() {
    let (_stdout, stderr, exit_code) =
        run_castdoc(&["show", &path("plain.cast"), "--section", "9"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("No section 9"));
}

#[test]
fn show_json_is_the_artifact() {
    let (stdout, _stderr, exit_code) =
        run_castdoc(&["show", &path("plain.cast"), "--format", "json"]);

    assert_eq!(exit_code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["session"]["id"], "plain");
    assert_eq!(json["session"]["title"], "plain demo");
    assert_eq!(json["event_count"], 10);
    assert_eq!(json["detection_status"], "single_section");
    assert_eq!(json["clean_document"].as_array().unwrap().len(), 10);
}

#[test]
fn show_missing_file_fails() {
    let (_stdout, stderr, exit_code) = run_castdoc(&["show", "/nonexistent/session.cast"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("session"));
}

#[test]
fn sections_lists_marker_sections() {
    let (stdout, _stderr, exit_code) = run_castdoc(&["sections", &path("markers.cast")]);

    assert_eq!(exit_code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "3 section(s), from markers");
    assert!(lines[2].contains("marker") && lines[2].ends_with("build"));
    assert!(lines[3].ends_with("test"));
}

#[test]
fn sections_detects_prompts() {
    let (stdout, _stderr, exit_code) =
        run_castdoc(&["sections", &path("prompts.cast"), "--json"]);

    assert_eq!(exit_code, 0);
    let sections: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let sections = sections.as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["label"], "ls");
    assert_eq!(sections[1]["label"], "cat a.txt");
    assert_eq!(sections[1]["start_line"], 6);
    assert_eq!(sections[1]["kind"], "detected");
}

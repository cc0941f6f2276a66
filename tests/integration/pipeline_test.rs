//! Library-level tests of the full pipeline on fixture recordings

use std::io::Cursor;

use castdoc::pipeline::{ArtifactSink, JsonFileSink};
use castdoc::sections::SectionKind;
use castdoc::{Config, DetectionStatus, Pipeline, ProcessingStatus};

use crate::helpers::{fixture, load_fixture};

#[test]
fn plain_recording_keeps_every_line() {
    let pipeline = Pipeline::new(Config::default());
    let artifact = pipeline.run(&fixture("plain.cast")).unwrap();

    let text = artifact.clean_document.text_lines();
    let expected: Vec<String> = (1..=10).map(|i| format!("line {}", i)).collect();
    assert_eq!(text, expected);
    assert_eq!(artifact.sections.len(), 1);
    assert_eq!(artifact.detection_status, DetectionStatus::SingleSection);
    assert_eq!(artifact.sections[0].label, "plain demo");
    assert_eq!(artifact.session.recorded_at, Some(1_700_000_000));
    assert_eq!(pipeline.status().get(), ProcessingStatus::Completed);
}

#[test]
fn marker_recording_yields_marker_sections_in_order() {
    let artifact = Pipeline::new(Config::default())
        .run_reader("markers", Cursor::new(load_fixture("markers.cast")))
        .unwrap();

    let labels: Vec<&str> = artifact.sections.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["setup", "build", "test"]);
    assert_eq!(artifact.sections[0].kind, SectionKind::Detected);
    assert_eq!(artifact.sections[1].kind, SectionKind::Marker);
    assert_eq!(artifact.detection_status, DetectionStatus::MarkersOnly);

    let mut previous = 0;
    for section in &artifact.sections {
        let lines = section.range.lines().unwrap();
        assert!(lines.start >= previous);
        previous = lines.end;
    }
    assert_eq!(previous, artifact.clean_document.len());
}

#[test]
fn redraw_recording_is_deduplicated() {
    let artifact = Pipeline::new(Config::default())
        .run(&fixture("redraw.cast"))
        .unwrap();

    let text = artifact.clean_document.text_lines();
    assert_eq!(text.iter().filter(|l| *l == "row b").count(), 1, "{:?}", text);
    assert!(artifact.stats.dedup.redraw_lines >= 3);
    assert!(artifact.stats.dedup.clean_lines < artifact.stats.dedup.raw_lines);
}

#[test]
fn sink_round_trip_through_a_directory() {
    let temp = tempfile::TempDir::new().unwrap();
    let sink = JsonFileSink::new(temp.path());
    let artifact = Pipeline::new(Config::default())
        .run(&fixture("prompts.cast"))
        .unwrap();

    let path = sink.store(&artifact).unwrap();
    assert_eq!(path, temp.path().join("prompts.json"));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["detection_status"], "heuristics_only");
}

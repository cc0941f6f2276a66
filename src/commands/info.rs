//! Recording metadata

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use castdoc::asciicast::{AsciicastFile, Event, EventType, Header};
use castdoc::render::Theme;
use chrono::{DateTime, Local};

use super::format_duration;

/// Counts gathered in one pass over the events.
#[derive(Debug, Default, PartialEq)]
struct EventSummary {
    events: usize,
    outputs: usize,
    output_bytes: usize,
    markers: usize,
    resizes: usize,
    duration: f64,
}

impl EventSummary {
    fn add(&mut self, event: &Event) {
        self.events += 1;
        self.duration += event.time;
        match event.event_type {
            EventType::Output => {
                self.outputs += 1;
                self.output_bytes += event.data.len();
            }
            EventType::Marker => self.markers += 1,
            EventType::Resize => self.resizes += 1,
            EventType::Input | EventType::Exit => {}
        }
    }
}

#[cfg(not(tarpaulin_include))]
pub fn handle(file: &Path) -> Result<()> {
    let size = fs::metadata(file)
        .with_context(|| format!("Failed to read {}", file.display()))?
        .len();
    let (header, events) = AsciicastFile::open(file)?;
    let mut summary = EventSummary::default();
    for event in events {
        summary.add(&event?);
    }

    let theme = Theme::detect();
    for (key, value) in info_rows(&header, &summary, size) {
        println!("{} {}", theme.accent_text(&format!("{:<10}", key)), value);
    }
    Ok(())
}

fn info_rows(header: &Header, summary: &EventSummary, size: u64) -> Vec<(&'static str, String)> {
    let (cols, rows) = header.size();
    let mut out = Vec::new();
    if let Some(title) = &header.title {
        out.push(("Title", title.clone()));
    }
    if let Some(command) = &header.command {
        out.push(("Command", command.clone()));
    }
    if let Some(recorded) = header.timestamp.and_then(format_timestamp) {
        out.push(("Recorded", recorded));
    }
    out.push(("Size", format!("{}x{}", cols, rows)));
    out.push(("Duration", format_duration(summary.duration)));
    out.push((
        "Events",
        format!(
            "{} ({} output, {} markers, {} resizes)",
            summary.events, summary.outputs, summary.markers, summary.resizes
        ),
    ));
    out.push((
        "Output",
        humansize::format_size(summary.output_bytes as u64, humansize::BINARY),
    ));
    out.push(("File", humansize::format_size(size, humansize::BINARY)));
    out
}

fn format_timestamp(timestamp: i64) -> Option<String> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| {
        utc.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_by_type() {
        let mut summary = EventSummary::default();
        summary.add(&Event::output(0.5, "abc"));
        summary.add(&Event::marker(0.25, "step"));
        summary.add(&Event::resize(0.25, 100, 30));
        assert_eq!(summary.events, 3);
        assert_eq!(summary.outputs, 1);
        assert_eq!(summary.output_bytes, 3);
        assert_eq!(summary.markers, 1);
        assert_eq!(summary.resizes, 1);
        assert!((summary.duration - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rows_skip_missing_header_fields() {
        let header = Header::new(120, 40);
        let rows = info_rows(&header, &EventSummary::default(), 2048);
        let keys: Vec<&str> = rows.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["Size", "Duration", "Events", "Output", "File"]);
        assert_eq!(rows[0].1, "120x40");
        assert_eq!(rows[4].1, "2 KiB");
    }

    #[test]
    fn title_is_listed_first() {
        let mut header = Header::new(80, 24);
        header.title = Some("demo".to_string());
        let rows = info_rows(&header, &EventSummary::default(), 0);
        assert_eq!(rows[0], ("Title", "demo".to_string()));
    }
}

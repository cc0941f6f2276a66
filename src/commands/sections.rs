//! Listing detected sections

use std::path::Path;

use anyhow::Result;
use castdoc::render::Theme;
use castdoc::sections::{SectionKind, SectionRange};
use castdoc::{DetectionStatus, Pipeline, Section};

use super::load_config;

#[cfg(not(tarpaulin_include))]
pub fn handle(file: &Path, json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let artifact = Pipeline::new(config).run(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&artifact.sections)?);
        return Ok(());
    }

    let theme = Theme::detect();
    println!(
        "{}",
        theme.secondary_text(&format!(
            "{} section(s), {}",
            artifact.sections.len(),
            status_label(artifact.detection_status)
        ))
    );
    for section in &artifact.sections {
        println!("{}", section_row(section, &theme));
    }
    Ok(())
}

fn status_label(status: DetectionStatus) -> &'static str {
    match status {
        DetectionStatus::MarkersOnly => "from markers",
        DetectionStatus::HeuristicsOnly => "detected",
        DetectionStatus::MarkersAndHeuristics => "from markers and detection",
        DetectionStatus::SingleSection => "single section",
    }
}

fn section_row(section: &Section, theme: &Theme) -> String {
    let kind = match section.kind {
        SectionKind::Marker => "marker",
        SectionKind::Detected => "detected",
    };
    let position = match &section.range {
        SectionRange::Lines {
            start_line,
            end_line,
        } => format!("lines {}..{}", start_line, end_line),
        SectionRange::Snapshot { .. } => "snapshot".to_string(),
    };
    format!(
        "{:>3}  {:<8}  {:<16}  {}  {}",
        section.id,
        kind,
        position,
        theme.secondary_text(&format!(
            "events {}..{}",
            section.start_event, section.end_event
        )),
        section.label
    )
}

//! Rendering of processed sessions for the terminal.

mod ansi;
mod theme;

use crate::pipeline::SessionArtifact;
use crate::sections::Section;
use crate::terminal::Line;

pub use ansi::{attrs_to_ansi, color_to_ansi, line_to_ansi};
pub use theme::Theme;

/// How line content is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Plain,
    Ansi,
}

pub fn render_line(line: &Line, style: LineStyle) -> String {
    match style {
        LineStyle::Plain => line.text(),
        LineStyle::Ansi => line_to_ansi(line),
    }
}

/// Lines joined with newlines, one per output line.
pub fn render_lines(lines: &[Line], style: LineStyle) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&render_line(line, style));
        out.push('\n');
    }
    out
}

/// Heading printed above a section.
pub fn section_heading(section: &Section, theme: &Theme) -> String {
    let title = format!("── {}. {} ", section.id, section.label);
    let detail = format!("[events {}..{}]", section.start_event, section.end_event);
    format!("{} {}", theme.accent_text(&title), theme.secondary_text(&detail))
}

/// The lines belonging to a section: its clean-document range or its snapshot.
pub fn section_lines<'a>(artifact: &'a SessionArtifact, section: &'a Section) -> &'a [Line] {
    if let Some(range) = section.range.lines() {
        let lines = artifact.clean_document.lines();
        let end = range.end.min(lines.len());
        &lines[range.start.min(end)..end]
    } else if let Some(snapshot) = section.range.snapshot() {
        let used = snapshot
            .lines
            .iter()
            .rposition(|l| !l.is_blank())
            .map_or(0, |i| i + 1);
        &snapshot.lines[..used]
    } else {
        &[]
    }
}

/// Whole session, section by section.
pub fn render_artifact(artifact: &SessionArtifact, style: LineStyle, theme: &Theme) -> String {
    let mut out = String::new();
    for section in &artifact.sections {
        out.push_str(&section_heading(section, theme));
        out.push('\n');
        out.push_str(&render_lines(section_lines(artifact, section), style));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pipeline::Pipeline;
    use std::io::Cursor;

    fn artifact() -> SessionArtifact {
        let content = concat!(
            "{\"version\":3,\"term\":{\"cols\":20,\"rows\":5}}\n",
            "[0.1, \"o\", \"first\\r\\n\"]\n",
            "[0.1, \"m\", \"step\"]\n",
            "[0.1, \"o\", \"\\u001b[31msecond\\u001b[0m\\r\\n\"]\n",
        );
        Pipeline::new(Config::default())
            .run_reader("render", Cursor::new(content))
            .unwrap()
    }

    #[test]
    fn plain_rendering_lists_sections_and_lines() {
        let out = render_artifact(&artifact(), LineStyle::Plain, &Theme::plain());
        assert_eq!(
            out,
            "── 1. first  [events 0..1]\nfirst\n── 2. step  [events 2..3]\nsecond\n"
        );
    }

    #[test]
    fn ansi_rendering_keeps_colors() {
        let artifact = artifact();
        let section = &artifact.sections[1];
        let lines = section_lines(&artifact, section);
        assert_eq!(render_line(&lines[0], LineStyle::Ansi), "\x1b[31msecond\x1b[0m");
    }
}

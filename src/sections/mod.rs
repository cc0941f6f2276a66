//! Section detection.
//!
//! Markers recorded in the session are authoritative: each one starts a
//! section running to the next marker. Where there are no markers (the
//! whole session, or the stretch before the first marker) ranked
//! heuristic signals propose boundaries instead.
//!
//! A section is positioned either by a clean-document line range or, when
//! the session left nothing usable in the clean document, by a snapshot of
//! the viewport. Never both.

mod signals;

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::asciicast::Marker;
use crate::config::{CoordinateModel, SectionConfig};
use crate::dedup::{CleanDocument, PositionMap};
use crate::terminal::{Line, ViewportSnapshot};

pub use signals::{
    configured_signals, signal_by_name, BlankRunSignal, BoundarySignal, CommandStartSignal,
    PromptSignal, Proposal, SIGNAL_NAMES,
};

const FALLBACK_LABEL: &str = "Session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Marker,
    Detected,
}

/// Where a section sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionRange {
    /// Half-open range of clean-document lines
    Lines { start_line: usize, end_line: usize },
    /// Viewport at the end of the section
    Snapshot { snapshot: ViewportSnapshot },
}

impl SectionRange {
    pub fn lines(&self) -> Option<Range<usize>> {
        match self {
            SectionRange::Lines {
                start_line,
                end_line,
            } => Some(*start_line..*end_line),
            SectionRange::Snapshot { .. } => None,
        }
    }

    pub fn snapshot(&self) -> Option<&ViewportSnapshot> {
        match self {
            SectionRange::Lines { .. } => None,
            SectionRange::Snapshot { snapshot } => Some(snapshot),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// 1-based position in the session
    pub id: usize,
    pub kind: SectionKind,
    pub label: String,
    /// First event of the section
    pub start_event: usize,
    /// One past the last event
    pub end_event: usize,
    #[serde(flatten)]
    pub range: SectionRange,
}

/// How the sections of a session were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    MarkersOnly,
    HeuristicsOnly,
    MarkersAndHeuristics,
    /// No markers and no boundary: one section covers the session
    SingleSection,
}

/// Everything the detector needs from the earlier stages.
#[derive(Debug, Clone, Copy)]
pub struct DetectionInput<'a> {
    pub document: &'a CleanDocument,
    pub position_map: &'a PositionMap,
    pub markers: &'a [Marker],
    /// Viewport when each marker was reached (parallel to `markers`)
    pub marker_snapshots: &'a [ViewportSnapshot],
    pub final_snapshot: &'a ViewportSnapshot,
    pub event_count: usize,
    /// Whether any output was replayed
    pub had_output: bool,
    /// Used to label a session that has a single section
    pub title: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct Detection {
    pub sections: Vec<Section>,
    pub status: DetectionStatus,
}

struct Draft {
    kind: SectionKind,
    label: String,
    /// Label proposed by a boundary signal
    signal_label: bool,
    events: Range<usize>,
    range: SectionRange,
}

struct Candidate {
    line: usize,
    rank: u8,
    label: Option<String>,
}

pub struct SectionDetector {
    config: SectionConfig,
    signals: Vec<Box<dyn BoundarySignal>>,
}

impl SectionDetector {
    pub fn new(config: &SectionConfig) -> Self {
        Self::with_signals(config, configured_signals(config))
    }

    pub fn with_signals(config: &SectionConfig, signals: Vec<Box<dyn BoundarySignal>>) -> Self {
        Self {
            config: config.clone(),
            signals,
        }
    }

    /// Whether sections of this session get snapshots instead of line ranges.
    pub fn uses_snapshots(&self, input: &DetectionInput<'_>) -> bool {
        match self.config.coordinate_model {
            CoordinateModel::Lines => false,
            CoordinateModel::Snapshot => true,
            CoordinateModel::Auto => input.document.is_empty() && input.had_output,
        }
    }

    pub fn detect(&self, input: &DetectionInput<'_>) -> Detection {
        let snapshots = self.uses_snapshots(input);
        let (drafts, status) = match (input.markers.is_empty(), snapshots) {
            (true, true) => (
                vec![self.whole_session(input, snapshot_range(input.final_snapshot))],
                DetectionStatus::SingleSection,
            ),
            (true, false) => self.unmarked(input),
            (false, true) => (self.marked_snapshots(input), DetectionStatus::MarkersOnly),
            (false, false) => self.marked_lines(input),
        };

        let sections = finalize(drafts);
        tracing::debug!(sections = sections.len(), ?status, snapshots, "detected sections");
        Detection { sections, status }
    }

    fn whole_session(&self, input: &DetectionInput<'_>, range: SectionRange) -> Draft {
        Draft {
            kind: SectionKind::Detected,
            label: self.truncate(input.title.unwrap_or(FALLBACK_LABEL)),
            signal_label: false,
            events: 0..input.event_count,
            range,
        }
    }

    fn unmarked(&self, input: &DetectionInput<'_>) -> (Vec<Draft>, DetectionStatus) {
        let lines = 0..input.document.len();
        let mut drafts = self.split(input, lines.clone(), 0..input.event_count);
        if drafts.len() > 1 {
            return (drafts, DetectionStatus::HeuristicsOnly);
        }

        // A boundary absorbed into line 0 still names the single section.
        let mut whole = self.whole_session(input, line_range(lines));
        if let Some(draft) = drafts.pop().filter(|d| d.signal_label) {
            if input.title.is_none() {
                whole.label = draft.label;
            }
        }
        (vec![whole], DetectionStatus::SingleSection)
    }

    fn marked_lines(&self, input: &DetectionInput<'_>) -> (Vec<Draft>, DetectionStatus) {
        let map = input.position_map;
        let doc_len = input.document.len();
        let line_at = |event: usize| map.clean_line_at_event(event, input.event_count).min(doc_len);

        let mut drafts = Vec::new();
        let mut heuristics = false;

        let first = &input.markers[0];
        let preamble = 0..line_at(first.event_index);
        if !preamble.is_empty() {
            let split = self.split(input, preamble, 0..first.event_index);
            heuristics = split.len() > 1;
            drafts.extend(split);
        }

        for (i, marker) in input.markers.iter().enumerate() {
            let next = input.markers.get(i + 1);
            let events_end = next.map_or(input.event_count, |m| m.event_index);
            let events = (marker.event_index + 1)..events_end;
            let end_line = next.map_or(doc_len, |m| line_at(m.event_index));
            let start_line = if events.is_empty() {
                end_line
            } else {
                line_at(marker.event_index)
            };
            drafts.push(Draft {
                kind: SectionKind::Marker,
                label: self.marker_label(marker),
                signal_label: false,
                events: events.start..events.end.max(events.start),
                range: line_range(start_line..end_line),
            });
        }

        let status = if heuristics {
            DetectionStatus::MarkersAndHeuristics
        } else {
            DetectionStatus::MarkersOnly
        };
        (drafts, status)
    }

    fn marked_snapshots(&self, input: &DetectionInput<'_>) -> Vec<Draft> {
        let snapshot_at = |i: usize| input.marker_snapshots.get(i).unwrap_or(input.final_snapshot);
        let mut drafts = Vec::new();

        let first = &input.markers[0];
        let before = snapshot_at(0);
        if first.event_index > 0 && before.lines.iter().any(|l| !l.is_blank()) {
            let label = first_text(&before.lines)
                .map(|t| self.truncate(&t))
                .unwrap_or_else(|| self.truncate(FALLBACK_LABEL));
            drafts.push(Draft {
                kind: SectionKind::Detected,
                label,
                signal_label: false,
                events: 0..first.event_index,
                range: snapshot_range(before),
            });
        }

        for (i, marker) in input.markers.iter().enumerate() {
            let end = input
                .markers
                .get(i + 1)
                .map_or(input.event_count, |m| m.event_index);
            let start = marker.event_index + 1;
            drafts.push(Draft {
                kind: SectionKind::Marker,
                label: self.marker_label(marker),
                signal_label: false,
                events: start..end.max(start),
                range: snapshot_range(snapshot_at(i + 1)),
            });
        }
        drafts
    }

    /// Split a region of the clean document at heuristic boundaries.
    ///
    /// Always returns at least one section covering the whole region.
    fn split(
        &self,
        input: &DetectionInput<'_>,
        lines: Range<usize>,
        events: Range<usize>,
    ) -> Vec<Draft> {
        let doc = input.document.lines();
        let region = &doc[lines.clone()];

        let mut candidates: Vec<Candidate> = self
            .signals
            .iter()
            .flat_map(|signal| {
                let rank = signal.rank();
                signal.propose(region).into_iter().map(move |p| Candidate {
                    line: lines.start + p.line,
                    rank,
                    label: p.label,
                })
            })
            .collect();
        candidates.sort_by_key(|c| (c.line, c.rank));

        let min_gap = self.config.min_section_lines.max(1);
        let mut kept = merge(candidates, min_gap);

        // A boundary right at the start of the region only names it.
        let lead_label = match kept.first() {
            Some(c) if c.line - lines.start < min_gap => kept.remove(0).label,
            _ => None,
        };

        let mut starts: Vec<(usize, Option<String>)> = vec![(lines.start, lead_label)];
        starts.extend(kept.into_iter().map(|c| (c.line, c.label)));

        let mut drafts: Vec<Draft> = Vec::with_capacity(starts.len());
        let mut start_events = Vec::with_capacity(starts.len());
        for (k, (start, label)) in starts.iter().enumerate() {
            let event = if k == 0 {
                events.start
            } else {
                input
                    .position_map
                    .event_at_clean_line(*start, input.event_count)
                    .clamp(events.start, events.end.max(events.start))
                    .max(start_events.last().copied().unwrap_or(events.start))
            };
            start_events.push(event);

            let end = starts.get(k + 1).map_or(lines.end, |(line, _)| *line);
            let suggested = label.as_deref().filter(|l| !l.trim().is_empty());
            drafts.push(Draft {
                kind: SectionKind::Detected,
                label: self.detected_label(doc, *start..end, suggested, input.title),
                signal_label: suggested.is_some(),
                events: event..event,
                range: line_range(*start..end),
            });
        }
        for k in 0..drafts.len() {
            let end = start_events.get(k + 1).copied().unwrap_or(events.end);
            drafts[k].events.end = end.max(drafts[k].events.start);
        }
        drafts
    }

    fn marker_label(&self, marker: &Marker) -> String {
        let label = marker.label.trim();
        if label.is_empty() {
            format!("Marker at {:.1}s", marker.time)
        } else {
            self.truncate(label)
        }
    }

    fn detected_label(
        &self,
        doc: &[Line],
        lines: Range<usize>,
        suggested: Option<&str>,
        title: Option<&str>,
    ) -> String {
        let text = suggested
            .map(str::to_string)
            .or_else(|| first_text(&doc[lines]));
        match text {
            Some(text) => self.truncate(&text),
            None => self.truncate(title.unwrap_or(FALLBACK_LABEL)),
        }
    }

    fn truncate(&self, text: &str) -> String {
        truncate_label(text, self.config.label_max_chars)
    }
}

/// Keep one candidate per `min_gap` window: the better rank, or the earlier on a tie.
fn merge(candidates: Vec<Candidate>, min_gap: usize) -> Vec<Candidate> {
    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        match kept.last_mut() {
            Some(last) if candidate.line - last.line < min_gap => {
                if candidate.rank < last.rank {
                    *last = candidate;
                }
            }
            _ => kept.push(candidate),
        }
    }
    kept
}

/// Assign ids and make line ranges non-overlapping.
fn finalize(drafts: Vec<Draft>) -> Vec<Section> {
    let mut sections = Vec::with_capacity(drafts.len());
    let mut prev_end = 0;
    for (i, draft) in drafts.into_iter().enumerate() {
        let range = match draft.range {
            SectionRange::Lines {
                start_line,
                end_line,
            } => {
                let start_line = start_line.max(prev_end);
                let end_line = end_line.max(start_line);
                prev_end = end_line;
                SectionRange::Lines {
                    start_line,
                    end_line,
                }
            }
            snapshot => snapshot,
        };
        sections.push(Section {
            id: i + 1,
            kind: draft.kind,
            label: draft.label,
            start_event: draft.events.start,
            end_event: draft.events.end,
            range,
        });
    }
    sections
}

fn line_range(lines: Range<usize>) -> SectionRange {
    SectionRange::Lines {
        start_line: lines.start,
        end_line: lines.end,
    }
}

fn snapshot_range(snapshot: &ViewportSnapshot) -> SectionRange {
    SectionRange::Snapshot {
        snapshot: snapshot.clone(),
    }
}

fn first_text(lines: &[Line]) -> Option<String> {
    lines
        .iter()
        .map(|l| l.text().trim().to_string())
        .find(|t| !t.is_empty())
}

/// Trim `text` and cut it to `max_chars` characters, ending in `…` when cut.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if max_chars == 0 || text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut label: String = text.chars().take(max_chars - 1).collect();
    label.push('…');
    label
}

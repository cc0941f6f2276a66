//! Event replay.
//!
//! Drives a virtual terminal with every event of a session and records
//! where the captured line count jumps at a screen clear. Those points
//! ("epoch boundaries") let the deduplicator relate positions in the
//! replayed output to positions in the clean document.
//!
//! While the alternate screen is active no boundary is recorded: full
//! screen programs clear and redraw constantly and their content never
//! reaches the scrollback anyway.

mod sequences;

use serde::Serialize;

use crate::asciicast::{Event, EventType, Header, Marker};
use crate::config::ReplayConfig;
use crate::terminal::{Emulator, Line, TerminalBuffer, ViewportSnapshot};

pub use sequences::{Segment, SequenceKind, SequenceMatch, SequenceSet};

/// Raw line position at a point in the event stream.
///
/// For an epoch this is the number of committed (scrolled off) lines right
/// after a screen clear outside the alternate screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpochBoundary {
    pub event_index: usize,
    pub raw_line_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error(
        "Captured line count went backwards at event {event_index} ({previous} -> {current})"
    )]
    NonMonotonicEpoch {
        event_index: usize,
        previous: usize,
        current: usize,
    },

    #[error("Failed to read event {index}: {error:#}")]
    Source { index: usize, error: anyhow::Error },
}

/// Counters collected during a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    pub output_events: usize,
    pub output_bytes: usize,
    pub resize_events: usize,
    /// Output chunks the terminal rejected plus unparsable resize payloads
    pub malformed_events: usize,
    pub clears: usize,
    pub alt_screen_entries: usize,
}

/// Everything a replay produces.
#[derive(Debug, Clone)]
pub struct ReplayOutput {
    /// Scrollback plus final viewport, trailing blank lines trimmed
    pub raw_lines: Vec<Line>,
    /// Strictly increasing in both event index and line count
    pub epochs: Vec<EpochBoundary>,
    /// Estimated raw line of the cursor at each marker outside the alternate screen
    pub marker_checkpoints: Vec<EpochBoundary>,
    pub markers: Vec<Marker>,
    /// Viewport as it stood when each marker was reached (parallel to `markers`)
    pub marker_snapshots: Vec<ViewportSnapshot>,
    pub final_snapshot: ViewportSnapshot,
    pub event_count: usize,
    /// Sum of event intervals in seconds
    pub duration: f64,
    pub stats: ReplayStats,
}

impl ReplayOutput {
    /// True if any output event carried data.
    pub fn had_output(&self) -> bool {
        self.stats.output_bytes > 0
    }

    /// Epoch boundaries merged with marker checkpoints, ordered by event.
    ///
    /// Checkpoints are estimates: each is capped by every later anchor and
    /// by the number of raw lines, so line counts never decrease. Epoch
    /// counts are exact and pass through unchanged.
    pub fn anchors(&self) -> Vec<EpochBoundary> {
        let mut anchors: Vec<EpochBoundary> = self
            .epochs
            .iter()
            .chain(self.marker_checkpoints.iter())
            .copied()
            .collect();
        // Stable sort keeps the epoch first when both share an event.
        anchors.sort_by_key(|a| a.event_index);
        anchors.dedup_by_key(|a| a.event_index);

        let mut ceiling = self.raw_lines.len();
        for anchor in anchors.iter_mut().rev() {
            ceiling = anchor.raw_line_count.min(ceiling);
            anchor.raw_line_count = ceiling;
        }
        anchors
    }
}

/// Replays a session through an [`Emulator`].
///
/// The replayer owns its emulator for the duration of one run.
pub struct Replayer<E> {
    emulator: E,
    sequences: SequenceSet,
    /// Tail of the last output that may be the start of a split sequence
    pending: String,
    in_alt_screen: bool,
    epochs: Vec<EpochBoundary>,
    marker_checkpoints: Vec<EpochBoundary>,
    markers: Vec<Marker>,
    marker_snapshots: Vec<ViewportSnapshot>,
    elapsed: f64,
    event_count: usize,
    stats: ReplayStats,
}

impl Replayer<TerminalBuffer> {
    /// Replayer backed by a [`TerminalBuffer`] sized from the header.
    pub fn for_header(header: &Header, config: &ReplayConfig) -> Self {
        let (cols, rows) = header.size();
        let terminal = TerminalBuffer::with_scrollback(cols, rows, config.scrollback_limit);
        Self::new(terminal, config)
    }
}

impl<E: Emulator> Replayer<E> {
    pub fn new(emulator: E, config: &ReplayConfig) -> Self {
        Self {
            emulator,
            sequences: SequenceSet::new(config),
            pending: String::new(),
            in_alt_screen: false,
            epochs: Vec::new(),
            marker_checkpoints: Vec::new(),
            markers: Vec::new(),
            marker_snapshots: Vec::new(),
            elapsed: 0.0,
            event_count: 0,
            stats: ReplayStats::default(),
        }
    }

    /// Replay an in-memory event list.
    pub fn replay(mut self, events: &[Event]) -> Result<ReplayOutput, ReplayError> {
        for event in events {
            self.push(event)?;
        }
        self.finish()
    }

    /// Replay events as they are read, without holding the whole session.
    pub fn replay_stream<I>(mut self, events: I) -> Result<ReplayOutput, ReplayError>
    where
        I: IntoIterator<Item = anyhow::Result<Event>>,
    {
        for event in events {
            let event = event.map_err(|error| ReplayError::Source {
                index: self.event_count,
                error,
            })?;
            self.push(&event)?;
        }
        self.finish()
    }

    /// Apply the next event.
    pub fn push(&mut self, event: &Event) -> Result<(), ReplayError> {
        let index = self.event_count;
        self.event_count += 1;
        self.elapsed += event.time;

        match event.event_type {
            EventType::Output => self.apply_output(index, &event.data)?,
            EventType::Resize => self.apply_resize(index, event),
            EventType::Marker => self.record_marker(index, event),
            EventType::Input | EventType::Exit => {}
        }
        Ok(())
    }

    fn apply_output(&mut self, index: usize, data: &str) -> Result<(), ReplayError> {
        self.stats.output_events += 1;
        self.stats.output_bytes += data.len();

        // A recognised sequence may be split across events; hold back a
        // trailing prefix until the next output completes or refutes it.
        let mut buffer = std::mem::take(&mut self.pending);
        buffer.push_str(data);
        let held = self.sequences.partial_suffix_len(&buffer);
        self.pending = buffer.split_off(buffer.len() - held);
        self.apply_segments(index, &buffer)
    }

    fn apply_segments(&mut self, index: usize, text: &str) -> Result<(), ReplayError> {
        let segments: Vec<Segment<'_>> = self.sequences.segments(text).collect();
        for segment in segments {
            match segment {
                Segment::Text(text) => self.feed(index, text),
                Segment::Sequence(seq, SequenceKind::AltScreenEnter) => {
                    self.feed(index, seq);
                    if !self.in_alt_screen {
                        self.stats.alt_screen_entries += 1;
                    }
                    self.in_alt_screen = true;
                }
                Segment::Sequence(seq, SequenceKind::AltScreenExit) => {
                    self.feed(index, seq);
                    self.in_alt_screen = false;
                }
                Segment::Sequence(seq, SequenceKind::ClearScreen) => {
                    self.feed(index, seq);
                    self.stats.clears += 1;
                    self.check_epoch(index)?;
                }
                Segment::Sequence(_, SequenceKind::ClearScrollback) => {
                    // Never fed: the captured history must survive.
                    self.stats.clears += 1;
                    self.check_epoch(index)?;
                }
            }
        }
        Ok(())
    }

    fn feed(&mut self, index: usize, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        if self.emulator.feed(chunk).is_none() {
            self.stats.malformed_events += 1;
            tracing::warn!(event_index = index, "terminal rejected output chunk, skipping it");
        }
    }

    fn check_epoch(&mut self, index: usize) -> Result<(), ReplayError> {
        if self.in_alt_screen {
            return Ok(());
        }
        let current = self.emulator.committed_line_count();
        let previous = self.epochs.last().map(|b| b.raw_line_count).unwrap_or(0);

        if current < previous {
            return Err(ReplayError::NonMonotonicEpoch {
                event_index: index,
                previous,
                current,
            });
        }
        if current == previous {
            return Ok(());
        }

        match self.epochs.last_mut() {
            Some(last) if last.event_index == index => last.raw_line_count = current,
            _ => {
                tracing::debug!(event_index = index, raw_line_count = current, "epoch boundary");
                self.epochs.push(EpochBoundary {
                    event_index: index,
                    raw_line_count: current,
                });
            }
        }
        Ok(())
    }

    fn apply_resize(&mut self, index: usize, event: &Event) {
        self.stats.resize_events += 1;
        match event.parse_resize() {
            Some((cols, rows)) => self.emulator.resize(cols as usize, rows as usize),
            None => {
                self.stats.malformed_events += 1;
                tracing::warn!(
                    event_index = index,
                    data = %event.data,
                    "ignoring malformed resize event"
                );
            }
        }
    }

    fn record_marker(&mut self, index: usize, event: &Event) {
        self.markers.push(Marker {
            time: self.elapsed,
            label: event.data.clone(),
            event_index: index,
        });
        self.marker_snapshots.push(self.emulator.view());
        if !self.in_alt_screen {
            let raw_line_count = match self.emulator.cursor() {
                Some((_, row)) => self.emulator.committed_line_count() + row,
                None => self.emulator.captured_line_count(),
            };
            self.marker_checkpoints.push(EpochBoundary {
                event_index: index,
                raw_line_count,
            });
        }
    }

    fn finish(mut self) -> Result<ReplayOutput, ReplayError> {
        if !self.pending.is_empty() {
            let tail = std::mem::take(&mut self.pending);
            let index = self.event_count.saturating_sub(1);
            self.apply_segments(index, &tail)?;
        }

        let raw_lines = self.emulator.all_lines();
        tracing::debug!(
            events = self.event_count,
            raw_lines = raw_lines.len(),
            epochs = self.epochs.len(),
            markers = self.markers.len(),
            malformed = self.stats.malformed_events,
            "replay finished"
        );
        Ok(ReplayOutput {
            raw_lines,
            epochs: self.epochs,
            marker_checkpoints: self.marker_checkpoints,
            markers: self.markers,
            marker_snapshots: self.marker_snapshots,
            final_snapshot: self.emulator.view(),
            event_count: self.event_count,
            duration: self.elapsed,
            stats: self.stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(events: &[Event]) -> ReplayOutput {
        Replayer::new(TerminalBuffer::new(20, 4), &ReplayConfig::default())
            .replay(events)
            .unwrap()
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::text).collect()
    }

    /// Terminal that refuses chunks containing `reject` and reports its
    /// history as gone once it has seen `forget_on`.
    struct ScriptedTerminal {
        inner: TerminalBuffer,
        reject: Option<&'static str>,
        forget_on: Option<&'static str>,
        forgotten: bool,
    }

    impl ScriptedTerminal {
        fn new() -> Self {
            Self {
                inner: TerminalBuffer::new(20, 4),
                reject: None,
                forget_on: None,
                forgotten: false,
            }
        }
    }

    impl Emulator for ScriptedTerminal {
        fn feed(&mut self, data: &str) -> Option<Vec<usize>> {
            if self.reject.is_some_and(|r| data.contains(r)) {
                return None;
            }
            if self.forget_on.is_some_and(|f| data.contains(f)) {
                self.forgotten = true;
            }
            self.inner.process(data)
        }

        fn resize(&mut self, cols: usize, rows: usize) {
            self.inner.resize(cols, rows);
        }

        fn cursor(&self) -> Option<(usize, usize)> {
            self.inner.cursor()
        }

        fn size(&self) -> (usize, usize) {
            self.inner.size()
        }

        fn captured_line_count(&self) -> usize {
            self.inner.captured_line_count()
        }

        fn committed_line_count(&self) -> usize {
            if self.forgotten {
                0
            } else {
                self.inner.committed_line_count()
            }
        }

        fn all_lines(&self) -> Vec<Line> {
            self.inner.all_lines()
        }

        fn view(&self) -> ViewportSnapshot {
            self.inner.view()
        }
    }

    #[test]
    fn plain_output_produces_lines_and_no_epochs() {
        let out = replay(&[Event::output(0.1, "one\r\ntwo\r\n")]);
        assert_eq!(texts(&out.raw_lines), vec!["one", "two"]);
        assert!(out.epochs.is_empty());
        assert_eq!(out.event_count, 1);
    }

    #[test]
    fn clear_records_boundary_after_scrolled_lines() {
        let out = replay(&[
            Event::output(0.1, "a\r\nb\r\nc\r\nd\r\ne\r\n"),
            Event::output(0.1, "\x1b[2J\x1b[H"),
            Event::output(0.1, "f\r\n"),
        ]);
        // Five lines on a four row screen: two scrolled off before the clear.
        assert_eq!(
            out.epochs,
            vec![EpochBoundary {
                event_index: 1,
                raw_line_count: 2
            }]
        );
        assert_eq!(texts(&out.raw_lines), vec!["a", "b", "f"]);
    }

    #[test]
    fn clear_without_new_lines_adds_no_boundary() {
        let out = replay(&[
            Event::output(0.1, "a\r\nb\r\nc\r\nd\r\ne\r\n\x1b[2J"),
            Event::output(0.1, "\x1b[2J"),
        ]);
        assert_eq!(out.epochs.len(), 1);
        assert_eq!(out.epochs[0].event_index, 0);
    }

    #[test]
    fn clear_scrollback_is_not_fed() {
        // The usual `clear` order: scrollback first, then the screen.
        let out = replay(&[
            Event::output(0.1, "a\r\nb\r\nc\r\nd\r\ne\r\n"),
            Event::output(0.1, "\x1b[3J\x1b[2J"),
        ]);
        assert_eq!(texts(&out.raw_lines), vec!["a", "b"]);
        assert_eq!(out.stats.clears, 2);
    }

    #[test]
    fn clears_inside_alt_screen_are_ignored() {
        let out = replay(&[
            Event::output(0.1, "a\r\nb\r\nc\r\nd\r\ne\r\n"),
            Event::output(0.1, "\x1b[?1049h\x1b[2Jtui"),
            Event::output(0.1, "\x1b[2Jtui again"),
            Event::output(0.1, "\x1b[?1049l"),
        ]);
        assert!(out.epochs.is_empty());
        assert_eq!(out.stats.alt_screen_entries, 1);
        assert!(!texts(&out.raw_lines).iter().any(|l| l.contains("tui")));
    }

    #[test]
    fn markers_keep_cumulative_time_and_snapshot() {
        let out = replay(&[
            Event::output(0.5, "hello"),
            Event::marker(1.0, "step"),
            Event::output(0.5, "\r\nworld"),
        ]);
        assert_eq!(out.markers.len(), 1);
        assert_eq!(out.markers[0].time, 1.5);
        assert_eq!(out.markers[0].event_index, 1);
        assert_eq!(out.marker_snapshots[0].lines[0].text(), "hello");
        assert_eq!(out.marker_checkpoints[0].raw_line_count, 0);
        assert_eq!(out.duration, 2.0);
    }

    #[test]
    fn resize_events_resize_the_terminal() {
        let out = replay(&[Event::resize(0.0, 40, 10), Event::output(0.1, "x")]);
        assert_eq!((out.final_snapshot.cols, out.final_snapshot.rows), (40, 10));
    }

    #[test]
    fn malformed_resize_is_counted_and_skipped() {
        let out = replay(&[
            Event::new(0.0, EventType::Resize, "wide"),
            Event::output(0.1, "x"),
        ]);
        assert_eq!(out.stats.malformed_events, 1);
        assert_eq!(out.final_snapshot.cols, 20);
    }

    #[test]
    fn decreasing_line_count_is_an_error() {
        let terminal = ScriptedTerminal {
            forget_on: Some("forget"),
            ..ScriptedTerminal::new()
        };
        let result = Replayer::new(terminal, &ReplayConfig::default()).replay(&[
            Event::output(0.1, "a\r\nb\r\nc\r\nd\r\ne\r\n\x1b[2J"),
            Event::output(0.1, "forget\x1b[2J"),
        ]);
        assert!(matches!(
            result,
            Err(ReplayError::NonMonotonicEpoch {
                event_index: 1,
                previous: 2,
                current: 0,
            })
        ));
    }

    #[test]
    fn rejected_chunk_is_skipped_and_counted() {
        let terminal = ScriptedTerminal {
            reject: Some("garbage"),
            ..ScriptedTerminal::new()
        };
        let out = Replayer::new(terminal, &ReplayConfig::default())
            .replay(&[
                Event::output(0.1, "one\r\n"),
                Event::output(0.1, "garbage\r\n"),
                Event::output(0.1, "two\r\n"),
            ])
            .unwrap();
        assert_eq!(texts(&out.raw_lines), vec!["one", "two"]);
        assert_eq!(out.stats.malformed_events, 1);
        assert_eq!(out.stats.output_events, 3);
    }

    #[test]
    fn rejected_chunk_leaves_the_rest_of_the_event() {
        let terminal = ScriptedTerminal {
            reject: Some("garbage"),
            ..ScriptedTerminal::new()
        };
        let out = Replayer::new(terminal, &ReplayConfig::default())
            .replay(&[Event::output(0.1, "garbage\x1b[2Jok")])
            .unwrap();
        assert_eq!(texts(&out.raw_lines), vec!["ok"]);
        assert_eq!(out.stats.malformed_events, 1);
        assert_eq!(out.stats.clears, 1);
    }

    #[test]
    fn scrollback_clear_split_across_events_keeps_history() {
        let out = replay(&[
            Event::output(0.1, "a\r\nb\r\nc\r\nd\r\ne\r\nf\r\n\x1b[2J"),
            Event::output(0.1, "x\r\ny\r\n\x1b["),
            Event::output(0.1, "3J\x1b[2J"),
        ]);
        let lines = texts(&out.raw_lines);
        assert_eq!(lines[..3], ["a", "b", "c"]);
        assert!(lines.iter().all(|l| !l.contains("3J")));
        assert_eq!(out.epochs.len(), 2);
        assert_eq!(out.epochs[1].event_index, 2);
        assert!(out.epochs[0].raw_line_count < out.epochs[1].raw_line_count);
        assert_eq!(out.stats.clears, 3);
    }

    #[test]
    fn alt_screen_enter_split_across_events_is_recognised() {
        let out = replay(&[
            Event::output(0.1, "a\r\nb\r\nc\r\nd\r\ne\r\n"),
            Event::output(0.1, "\x1b[?10"),
            Event::output(0.1, "49h\x1b[2Jtui"),
            Event::output(0.1, "\x1b[2Jtui again"),
            Event::output(0.1, "\x1b[?1049l"),
        ]);
        assert!(out.epochs.is_empty());
        assert_eq!(out.stats.alt_screen_entries, 1);
        assert!(!texts(&out.raw_lines).iter().any(|l| l.contains("tui")));
    }

    #[test]
    fn held_back_tail_is_flushed_at_the_end() {
        let config = ReplayConfig {
            clear_screen: vec!["CLS!".to_string()],
            ..ReplayConfig::default()
        };
        let out = Replayer::new(TerminalBuffer::new(20, 4), &config)
            .replay(&[
                Event::output(0.1, "first CL"),
                Event::output(0.1, "S!second CL"),
            ])
            .unwrap();
        assert_eq!(out.stats.clears, 1);
        // Configured sequences still reach the terminal as plain text here.
        assert_eq!(texts(&out.raw_lines), vec!["first CLS!second CL"]);
    }

    #[test]
    fn stream_errors_carry_the_event_index() {
        let events = vec![
            Ok(Event::output(0.1, "a")),
            Err(anyhow::anyhow!("bad line")),
        ];
        let result = Replayer::new(TerminalBuffer::new(20, 4), &ReplayConfig::default())
            .replay_stream(events);
        match result {
            Err(ReplayError::Source { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected result: {:?}", other.map(|o| o.event_count)),
        }
    }

    #[test]
    fn anchors_merge_and_stay_monotonic() {
        let out = replay(&[
            Event::output(0.1, "a\r\nb\r\nc\r\nd\r\ne\r\n\x1b[2J"),
            Event::marker(0.1, "m"),
            Event::output(0.1, "f"),
        ]);
        let anchors = out.anchors();
        assert_eq!(anchors.len(), 2);
        assert!(anchors.windows(2).all(|w| w[0].raw_line_count <= w[1].raw_line_count));
        assert!(anchors.iter().all(|a| a.raw_line_count <= out.raw_lines.len()));
    }
}

//! Mapping from event positions to clean-document lines.

use serde::Serialize;

/// Where an anchor of the raw stream landed in the clean document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpochMapping {
    pub event_index: usize,
    pub raw_line_count: usize,
    pub clean_line_count: usize,
}

/// Epoch anchors with their clean line counts.
///
/// Lookups interpolate linearly between the surrounding anchors, using
/// `(0, 0)` and `(event_count, clean_line_count)` as the outer anchors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PositionMap {
    entries: Vec<EpochMapping>,
    clean_line_count: usize,
}

impl PositionMap {
    pub(crate) fn new(entries: Vec<EpochMapping>, clean_line_count: usize) -> Self {
        Self {
            entries,
            clean_line_count,
        }
    }

    pub fn entries(&self) -> &[EpochMapping] {
        &self.entries
    }

    pub fn clean_line_count(&self) -> usize {
        self.clean_line_count
    }

    /// Clean line count recorded for an anchor at exactly `raw_line_count`.
    pub fn clean_for_raw(&self, raw_line_count: usize) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.raw_line_count == raw_line_count)
            .map(|e| e.clean_line_count)
    }

    /// Approximate clean line reached as of event `event`.
    ///
    /// Non-decreasing in `event`; events at or past the end map to the
    /// document length.
    pub fn clean_line_at_event(&self, event: usize, event_count: usize) -> usize {
        if event >= event_count {
            return self.clean_line_count;
        }
        let points = self.points(event_count);
        let next = points.partition_point(|&(e, _)| e <= event);
        let (e0, c0) = points[next - 1];
        match points.get(next) {
            Some(&(e1, c1)) => c0 + (c1 - c0) * (event - e0) / (e1 - e0),
            None => c0,
        }
    }

    /// Last event whose clean position is at or before `line`.
    pub fn event_at_clean_line(&self, line: usize, event_count: usize) -> usize {
        let (mut lo, mut hi) = (0, event_count);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.clean_line_at_event(mid, event_count) <= line {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo.saturating_sub(1)
    }

    fn points(&self, event_count: usize) -> Vec<(usize, usize)> {
        let mut points = Vec::with_capacity(self.entries.len() + 2);
        points.push((0, 0));
        points.extend(
            self.entries
                .iter()
                .filter(|e| e.event_index < event_count)
                .map(|e| (e.event_index, e.clean_line_count.min(self.clean_line_count))),
        );
        points.push((event_count, self.clean_line_count));
        points
    }
}

//! Scrollback deduplication.
//!
//! Terminal programs that redraw (clear and repaint, or repaint in place
//! after a resize) leave the same block of lines in the scrollback many
//! times over. The deduplicator walks the whole replayed stream once and
//! drops any run of at least `min_match` lines that already appears in the
//! clean document. Working on the continuous stream rather than per epoch
//! lets it catch redraws that straddle a screen clear.
//!
//! Candidates come from an index of normalized line keys to their clean
//! positions. The longest match wins; among equally long matches the
//! earliest clean position wins.

mod keys;
mod position_map;

use serde::Serialize;

use crate::config::DedupConfig;
use crate::replay::EpochBoundary;
use crate::terminal::Line;

pub use keys::normalize;
pub use position_map::{EpochMapping, PositionMap};

use keys::KeyTable;

/// The deduplicated line sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CleanDocument {
    lines: Vec<Line>,
}

impl CleanDocument {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Plain text of every line.
    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(Line::text).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    pub raw_lines: usize,
    pub clean_lines: usize,
    /// Blocks dropped as redraws of earlier content
    pub redraw_blocks: usize,
    pub redraw_lines: usize,
    /// Single lines dropped as stutter repeats
    pub stutter_lines: usize,
}

#[derive(Debug, Clone)]
pub struct DedupOutput {
    pub document: CleanDocument,
    pub position_map: PositionMap,
    pub stats: DedupStats,
}

/// Greedy block deduplicator.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    min_match: usize,
    stutter_max_gap: usize,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(&DedupConfig::default())
    }
}

impl Deduplicator {
    pub fn new(config: &DedupConfig) -> Self {
        Self {
            min_match: config.min_match.max(1),
            stutter_max_gap: config.stutter_max_gap,
        }
    }

    /// Deduplicate `raw_lines`, mapping every anchor to a clean position.
    ///
    /// `anchors` must be ordered by event with non-decreasing line counts.
    /// An anchor that falls inside a dropped block maps to the clean
    /// position where that block started.
    pub fn deduplicate(&self, raw_lines: &[Line], anchors: &[EpochBoundary]) -> DedupOutput {
        let mut table = KeyTable::default();
        let raw_keys: Vec<usize> = raw_lines
            .iter()
            .map(|line| table.intern(normalize(line)))
            .collect();

        let mut index: Vec<Vec<usize>> = vec![Vec::new(); table.len()];
        let mut clean_keys: Vec<usize> = Vec::new();
        let mut lines: Vec<Line> = Vec::new();
        let mut entries: Vec<EpochMapping> = Vec::with_capacity(anchors.len());
        let mut pending = anchors.iter().peekable();
        let mut stats = DedupStats {
            raw_lines: raw_lines.len(),
            ..Default::default()
        };

        let mut i = 0;
        loop {
            while let Some(anchor) = pending.next_if(|a| a.raw_line_count <= i) {
                entries.push(EpochMapping {
                    event_index: anchor.event_index,
                    raw_line_count: anchor.raw_line_count,
                    clean_line_count: lines.len(),
                });
            }
            if i >= raw_keys.len() {
                break;
            }

            let key = raw_keys[i];
            let (start, len) = self.longest_match(&raw_keys[i..], &clean_keys, &index[key]);
            if len >= self.min_match {
                tracing::trace!(raw = i, clean = start, len, "dropping redrawn block");
                stats.redraw_blocks += 1;
                stats.redraw_lines += len;
                i += len;
                continue;
            }

            if self.is_stutter(key, &clean_keys, &table) {
                stats.stutter_lines += 1;
            } else {
                index[key].push(clean_keys.len());
                clean_keys.push(key);
                lines.push(raw_lines[i].clone());
            }
            i += 1;
        }

        for anchor in pending {
            entries.push(EpochMapping {
                event_index: anchor.event_index,
                raw_line_count: anchor.raw_line_count,
                clean_line_count: lines.len(),
            });
        }

        stats.clean_lines = lines.len();
        tracing::debug!(
            raw = stats.raw_lines,
            clean = stats.clean_lines,
            redraw_blocks = stats.redraw_blocks,
            stutters = stats.stutter_lines,
            "deduplicated scrollback"
        );

        DedupOutput {
            position_map: PositionMap::new(entries, lines.len()),
            document: CleanDocument::new(lines),
            stats,
        }
    }

    /// Longest run of `rest` found at one of `candidates` in `clean`.
    ///
    /// Returns `(clean_start, length)`; candidates are ascending, so the
    /// first one reaching a given length is kept.
    fn longest_match(
        &self,
        rest: &[usize],
        clean: &[usize],
        candidates: &[usize],
    ) -> (usize, usize) {
        let mut best = (0, 0);
        for &start in candidates {
            // Cheap rejection: the block must at least reach min_match.
            let probe = self.min_match - 1;
            if best.1 < self.min_match
                && (probe >= rest.len() || clean.get(start + probe) != Some(&rest[probe]))
            {
                continue;
            }

            let len = rest
                .iter()
                .zip(&clean[start..])
                .take_while(|(a, b)| a == b)
                .count();
            if len > best.1 {
                best = (start, len);
                if len == rest.len() {
                    break;
                }
            }
        }
        best
    }

    /// A non-blank line equal to the previous non-blank clean line, with
    /// between one and `stutter_max_gap` blank lines in between.
    fn is_stutter(&self, key: usize, clean: &[usize], table: &KeyTable) -> bool {
        if self.stutter_max_gap == 0 || table.is_blank(key) {
            return false;
        }
        let mut gap = 0;
        for &prev in clean.iter().rev() {
            if table.is_blank(prev) {
                gap += 1;
                if gap > self.stutter_max_gap {
                    return false;
                }
                continue;
            }
            return prev == key && gap > 0;
        }
        false
    }
}

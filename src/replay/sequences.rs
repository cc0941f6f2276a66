//! Recognition of the escape sequences that drive epoch tracking.

use crate::config::ReplayConfig;

/// What a recognised sequence means to the replayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    AltScreenEnter,
    AltScreenExit,
    ClearScreen,
    ClearScrollback,
}

/// A recognised sequence found in an output payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceMatch {
    pub start: usize,
    pub end: usize,
    pub kind: SequenceKind,
}

/// The configured sequence sets.
#[derive(Debug, Clone)]
pub struct SequenceSet {
    patterns: Vec<(String, SequenceKind)>,
}

impl SequenceSet {
    pub fn new(config: &ReplayConfig) -> Self {
        let groups = [
            (&config.alt_screen_enter, SequenceKind::AltScreenEnter),
            (&config.alt_screen_exit, SequenceKind::AltScreenExit),
            (&config.clear_screen, SequenceKind::ClearScreen),
            (&config.clear_scrollback, SequenceKind::ClearScrollback),
        ];
        let patterns = groups
            .iter()
            .flat_map(|(seqs, kind)| seqs.iter().map(move |s| (s.clone(), *kind)))
            .filter(|(s, _)| !s.is_empty())
            .collect();
        Self { patterns }
    }

    /// Earliest recognised sequence in `text`; the longest one wins a tie.
    pub fn find_next(&self, text: &str) -> Option<SequenceMatch> {
        let mut best: Option<SequenceMatch> = None;
        for (pattern, kind) in &self.patterns {
            let Some(start) = text.find(pattern.as_str()) else {
                continue;
            };
            let candidate = SequenceMatch {
                start,
                end: start + pattern.len(),
                kind: *kind,
            };
            best = match best {
                Some(b) if b.start < start || (b.start == start && b.end >= candidate.end) => {
                    Some(b)
                }
                _ => Some(candidate),
            };
        }
        best
    }

    /// Length of the longest tail of `text` that could still grow into a
    /// recognised sequence once more output arrives.
    pub fn partial_suffix_len(&self, text: &str) -> usize {
        self.patterns
            .iter()
            .map(|(pattern, _)| {
                (1..pattern.len())
                    .rev()
                    .find(|&k| pattern.is_char_boundary(k) && text.ends_with(&pattern[..k]))
                    .unwrap_or(0)
            })
            .max()
            .unwrap_or(0)
    }

    /// Split `text` into plain chunks and recognised sequences, in order.
    pub fn segments<'t>(&self, text: &'t str) -> Segments<'_, 't> {
        Segments {
            set: self,
            rest: text,
            pending: None,
        }
    }
}

impl Default for SequenceSet {
    fn default() -> Self {
        Self::new(&ReplayConfig::default())
    }
}

/// A piece of an output payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Sequence(&'a str, SequenceKind),
}

pub struct Segments<'s, 't> {
    set: &'s SequenceSet,
    rest: &'t str,
    pending: Option<Segment<'t>>,
}

impl<'t> Iterator for Segments<'_, 't> {
    type Item = Segment<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(segment) = self.pending.take() {
            return Some(segment);
        }
        if self.rest.is_empty() {
            return None;
        }
        match self.set.find_next(self.rest) {
            Some(m) => {
                let text = &self.rest[..m.start];
                let seq = Segment::Sequence(&self.rest[m.start..m.end], m.kind);
                self.rest = &self.rest[m.end..];
                if text.is_empty() {
                    Some(seq)
                } else {
                    self.pending = Some(seq);
                    Some(Segment::Text(text))
                }
            }
            None => {
                let text = self.rest;
                self.rest = "";
                Some(Segment::Text(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_and_sequences_in_order() {
        let set = SequenceSet::default();
        let segments: Vec<_> = set.segments("a\x1b[2Jb\x1b[3J").collect();
        assert_eq!(
            segments,
            vec![
                Segment::Text("a"),
                Segment::Sequence("\x1b[2J", SequenceKind::ClearScreen),
                Segment::Text("b"),
                Segment::Sequence("\x1b[3J", SequenceKind::ClearScrollback),
            ]
        );
    }

    #[test]
    fn recognises_alt_screen_variants() {
        let set = SequenceSet::default();
        for (seq, kind) in [
            ("\x1b[?1049h", SequenceKind::AltScreenEnter),
            ("\x1b[?47h", SequenceKind::AltScreenEnter),
            ("\x1b[?1047l", SequenceKind::AltScreenExit),
        ] {
            let m = set.find_next(&format!("xx{seq}")).unwrap();
            assert_eq!((m.start, m.kind), (2, kind), "{seq:?}");
        }
    }

    #[test]
    fn plain_text_is_one_segment() {
        let set = SequenceSet::default();
        let segments: Vec<_> = set.segments("hello\r\n").collect();
        assert_eq!(segments, vec![Segment::Text("hello\r\n")]);
        assert_eq!(set.segments("").count(), 0);
    }

    #[test]
    fn longest_pattern_wins_at_same_position() {
        let config = ReplayConfig {
            clear_screen: vec!["\x1b[2".to_string(), "\x1b[2J".to_string()],
            ..ReplayConfig::default()
        };
        let set = SequenceSet::new(&config);
        let m = set.find_next("\x1b[2J").unwrap();
        assert_eq!(m.end, 4);
    }

    #[test]
    fn trailing_prefix_of_a_sequence_is_reported() {
        let set = SequenceSet::default();
        assert_eq!(set.partial_suffix_len("abc\x1b["), 2);
        assert_eq!(set.partial_suffix_len("abc\x1b[?10"), 5);
        assert_eq!(set.partial_suffix_len("abc\x1b"), 1);
        // A complete sequence is not a partial one.
        assert_eq!(set.partial_suffix_len("abc\x1b[2J"), 0);
        assert_eq!(set.partial_suffix_len("abc"), 0);
        assert_eq!(set.partial_suffix_len(""), 0);
    }
}

//! Line normalization and key interning.

use std::collections::HashMap;

use crate::terminal::Line;

/// Comparison key for a line: its text with trailing whitespace removed.
///
/// Styling never affects the key.
pub fn normalize(line: &Line) -> String {
    let mut text = line.text();
    text.truncate(text.trim_end().len());
    text
}

/// Maps normalized keys to dense ids so block comparison is integer equality.
#[derive(Debug, Default)]
pub(crate) struct KeyTable {
    ids: HashMap<String, usize>,
    blank: Vec<bool>,
}

impl KeyTable {
    pub fn intern(&mut self, key: String) -> usize {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.blank.len();
        self.blank.push(key.is_empty());
        self.ids.insert(key, id);
        id
    }

    pub fn len(&self) -> usize {
        self.blank.len()
    }

    pub fn is_blank(&self, id: usize) -> bool {
        self.blank[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::Span;

    #[test]
    fn normalize_trims_trailing_whitespace_only() {
        assert_eq!(normalize(&Line::plain("  ls -la   ")), "  ls -la");
        assert_eq!(normalize(&Line::plain("   ")), "");
    }

    #[test]
    fn normalize_ignores_styling() {
        let styled = Line {
            spans: vec![
                Span {
                    text: "err".to_string(),
                    bold: true,
                    ..Default::default()
                },
                Span::plain("or"),
            ],
        };
        assert_eq!(normalize(&styled), normalize(&Line::plain("error")));
    }

    #[test]
    fn equal_keys_share_an_id() {
        let mut table = KeyTable::default();
        let a = table.intern("a".to_string());
        let blank = table.intern(String::new());
        assert_eq!(table.intern("a".to_string()), a);
        assert_ne!(a, blank);
        assert!(table.is_blank(blank));
        assert!(!table.is_blank(a));
        assert_eq!(table.len(), 2);
    }
}

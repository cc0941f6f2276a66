//! The terminal emulation capability consumed by the replayer.

use super::types::{Line, ViewportSnapshot};

/// A virtual terminal that can be driven with output and queried for the
/// lines it has captured.
///
/// One instance belongs to exactly one replay; implementations need not be
/// shareable across threads.
pub trait Emulator {
    /// Feed terminal output. Returns the changed viewport rows, or `None`
    /// when the chunk could not be interpreted (the emulator state is
    /// then unchanged).
    fn feed(&mut self, data: &str) -> Option<Vec<usize>>;

    fn resize(&mut self, cols: usize, rows: usize);

    /// Cursor position as `(col, row)`, `None` while hidden.
    fn cursor(&self) -> Option<(usize, usize)>;

    /// Terminal size as `(cols, rows)`.
    fn size(&self) -> (usize, usize);

    /// Number of lines `all_lines` would currently return.
    fn captured_line_count(&self) -> usize;

    /// Lines that have scrolled out of the viewport into the scrollback.
    ///
    /// These are the leading lines of `all_lines` and can no longer change.
    fn committed_line_count(&self) -> usize;

    /// Scrollback plus viewport, trailing blank lines trimmed.
    fn all_lines(&self) -> Vec<Line>;

    /// The visible screen.
    fn view(&self) -> ViewportSnapshot;
}

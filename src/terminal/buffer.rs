//! VTE-backed terminal buffer.

use std::panic::{self, AssertUnwindSafe};

use vte::Parser;

use super::emulator::Emulator;
use super::performer::TerminalPerformer;
use super::screen::{row_is_blank, Screen};
use super::types::{Line, ViewportSnapshot};

/// A virtual terminal with a bounded scrollback.
///
/// Feeding is transactional: if processing a chunk panics, the screen is
/// rolled back to its state before the chunk and `feed` returns `None`.
pub struct TerminalBuffer {
    screen: Screen,
    parser: Parser,
    scrollback_limit: usize,
}

impl TerminalBuffer {
    /// Create a terminal with a practically unbounded scrollback.
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_scrollback(width, height, usize::MAX)
    }

    pub fn with_scrollback(width: usize, height: usize, scrollback_limit: usize) -> Self {
        Self {
            screen: Screen::new(width, height),
            parser: Parser::new(),
            scrollback_limit,
        }
    }

    pub fn width(&self) -> usize {
        self.screen.width
    }

    pub fn height(&self) -> usize {
        self.screen.height
    }

    pub fn cursor_row(&self) -> usize {
        self.screen.row
    }

    pub fn cursor_col(&self) -> usize {
        self.screen.col
    }

    pub fn in_alt_screen(&self) -> bool {
        self.screen.in_alt_screen()
    }

    pub fn scrollback_len(&self) -> usize {
        self.screen.scrollback.len()
    }

    /// Process a chunk of terminal output.
    ///
    /// Returns the sorted viewport rows that changed, or `None` if the
    /// chunk could not be processed (state is left unchanged).
    pub fn process(&mut self, data: &str) -> Option<Vec<usize>> {
        self.transact(|screen, parser| {
            let mut performer = TerminalPerformer::new(screen);
            parser.advance(&mut performer, data.as_bytes());
        })
    }

    /// Run `apply` against the screen, undoing everything it did if it panics.
    ///
    /// The scrollback is not cloned for the checkpoint: it only ever grows
    /// at the end while a chunk is processed, so truncating it back is enough.
    pub(super) fn transact<F>(&mut self, apply: F) -> Option<Vec<usize>>
    where
        F: FnOnce(&mut Screen, &mut Parser),
    {
        let scrollback = std::mem::take(&mut self.screen.scrollback);
        let scrollback_len = scrollback.len();
        let checkpoint = self.screen.clone();
        self.screen.scrollback = scrollback;
        self.screen.changed.clear();

        let screen = &mut self.screen;
        let parser = &mut self.parser;
        let result = panic::catch_unwind(AssertUnwindSafe(|| apply(screen, parser)));

        match result {
            Ok(()) => {
                self.enforce_scrollback_limit();
                Some(std::mem::take(&mut self.screen.changed).into_iter().collect())
            }
            Err(_) => {
                let mut scrollback = std::mem::take(&mut self.screen.scrollback);
                scrollback.truncate(scrollback_len);
                self.screen = checkpoint;
                self.screen.scrollback = scrollback;
                self.screen.changed.clear();
                self.parser = Parser::new();
                None
            }
        }
    }

    fn enforce_scrollback_limit(&mut self) {
        let excess = self
            .screen
            .scrollback
            .len()
            .saturating_sub(self.scrollback_limit);
        if excess > 0 {
            self.screen.scrollback.drain(..excess);
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.screen.resize(width, height);
        self.enforce_scrollback_limit();
    }

    /// Visible rows as styled lines (not trimmed).
    pub fn view_lines(&self) -> Vec<Line> {
        self.screen.grid.iter().map(|row| Line::from_cells(row)).collect()
    }

    /// Scrollback followed by the viewport, trailing blank lines trimmed.
    pub fn lines(&self) -> Vec<Line> {
        let mut lines: Vec<Line> = self
            .screen
            .scrollback
            .iter()
            .chain(self.screen.grid.iter())
            .map(|row| Line::from_cells(row))
            .collect();
        while lines.last().is_some_and(Line::is_blank) {
            lines.pop();
        }
        lines
    }

    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            cols: self.screen.width,
            rows: self.screen.height,
            lines: self.view_lines(),
        }
    }
}

impl std::fmt::Display for TerminalBuffer {
    /// Plain text of the visible screen, one line per row.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, line) in self.view_lines().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line.text())?;
        }
        Ok(())
    }
}

impl Emulator for TerminalBuffer {
    fn feed(&mut self, data: &str) -> Option<Vec<usize>> {
        self.process(data)
    }

    fn resize(&mut self, cols: usize, rows: usize) {
        TerminalBuffer::resize(self, cols, rows);
    }

    fn cursor(&self) -> Option<(usize, usize)> {
        self.screen
            .cursor_visible
            .then_some((self.screen.col, self.screen.row))
    }

    fn size(&self) -> (usize, usize) {
        (self.screen.width, self.screen.height)
    }

    fn captured_line_count(&self) -> usize {
        let trailing_scrollback_blanks = if self.screen.used_rows() == 0 {
            self.screen
                .scrollback
                .iter()
                .rev()
                .take_while(|row| row_is_blank(row))
                .count()
        } else {
            0
        };
        self.screen.scrollback.len() - trailing_scrollback_blanks + self.screen.used_rows()
    }

    fn committed_line_count(&self) -> usize {
        self.screen.scrollback.len()
    }

    fn all_lines(&self) -> Vec<Line> {
        self.lines()
    }

    fn view(&self) -> ViewportSnapshot {
        self.snapshot()
    }
}

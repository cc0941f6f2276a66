//! Cursor movement handlers.
//!
//! Handles CSI sequences:
//! - A/e: Cursor up / vertical position relative (down)
//! - B: Cursor down
//! - C/a: Cursor forward
//! - D: Cursor back
//! - E/F: Cursor next/previous line
//! - H/f: Cursor position
//! - G/`: Cursor horizontal absolute
//! - d: Cursor vertical absolute
//! - s/u: Save/restore cursor
//!
//! And ESC sequences:
//! - ESC 7: DEC save cursor
//! - ESC 8: DEC restore cursor

use crate::terminal::screen::Screen;

impl Screen {
    pub(crate) fn cursor_up(&mut self, n: usize) {
        let floor = if self.row >= self.scroll_top { self.scroll_top } else { 0 };
        self.row = self.row.saturating_sub(n).max(floor);
        self.pending_wrap = false;
    }

    pub(crate) fn cursor_down(&mut self, n: usize) {
        let ceiling = if self.row <= self.scroll_bottom {
            self.scroll_bottom
        } else {
            self.height - 1
        };
        self.row = (self.row + n).min(ceiling);
        self.pending_wrap = false;
    }

    pub(crate) fn cursor_forward(&mut self, n: usize) {
        self.col = (self.col + n).min(self.width - 1);
        self.pending_wrap = false;
    }

    pub(crate) fn cursor_back(&mut self, n: usize) {
        self.col = self.col.saturating_sub(n);
        self.pending_wrap = false;
    }

    /// CUP / HVP with 1-based arguments.
    pub(crate) fn cursor_position(&mut self, row: usize, col: usize) {
        self.row = row.saturating_sub(1).min(self.height - 1);
        self.col = col.saturating_sub(1).min(self.width - 1);
        self.pending_wrap = false;
    }

    pub(crate) fn cursor_column(&mut self, col: usize) {
        self.col = col.saturating_sub(1).min(self.width - 1);
        self.pending_wrap = false;
    }

    pub(crate) fn cursor_row(&mut self, row: usize) {
        self.row = row.saturating_sub(1).min(self.height - 1);
        self.pending_wrap = false;
    }

    pub(crate) fn backspace(&mut self) {
        if self.pending_wrap {
            self.pending_wrap = false;
        } else {
            self.col = self.col.saturating_sub(1);
        }
    }

    pub(crate) fn tab(&mut self) {
        let next = (self.col / 8 + 1) * 8;
        self.col = next.min(self.width - 1);
    }

    pub(crate) fn decsc(&mut self) {
        self.saved = Some(self.save_cursor());
    }

    pub(crate) fn decrc(&mut self) {
        let saved = self.saved;
        self.restore_cursor(saved);
    }
}

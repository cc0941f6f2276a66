//! Erase and delete handlers.
//!
//! Handles CSI sequences:
//! - J: Erase in display (0 below, 1 above, 2 all; 3 keeps the scrollback)
//! - K: Erase in line (0 right, 1 left, 2 all)
//! - @: Insert blank characters
//! - P: Delete characters
//! - X: Erase characters
//! - L: Insert lines
//! - M: Delete lines

use crate::terminal::screen::{blank_row, Screen};

impl Screen {
    pub(crate) fn erase_in_display(&mut self, mode: usize) {
        match mode {
            0 => {
                self.erase_in_line(0);
                for r in self.row + 1..self.height {
                    self.grid[r] = blank_row(self.width);
                }
                self.mark_range(self.row, self.height - 1);
            }
            1 => {
                self.erase_in_line(1);
                for r in 0..self.row {
                    self.grid[r] = blank_row(self.width);
                }
                self.mark_range(0, self.row);
            }
            2 => {
                for r in 0..self.height {
                    self.grid[r] = blank_row(self.width);
                }
                self.mark_all();
            }
            // Captured history is only ever dropped by the scrollback limit.
            3 => {}
            _ => {}
        }
    }

    pub(crate) fn erase_in_line(&mut self, mode: usize) {
        let row = self.row;
        let range = match mode {
            0 => self.col..self.width,
            1 => 0..(self.col + 1).min(self.width),
            2 => 0..self.width,
            _ => return,
        };
        for c in range {
            self.clear_cell(row, c);
        }
        self.mark(row);
    }

    pub(crate) fn erase_chars(&mut self, n: usize) {
        let row = self.row;
        let end = (self.col + n).min(self.width);
        for c in self.col..end {
            self.clear_cell(row, c);
        }
        self.pending_wrap = false;
        self.mark(row);
    }

    pub(crate) fn insert_chars(&mut self, n: usize) {
        let (row, col, width) = (self.row, self.col, self.width);
        let n = n.min(width - col);
        let blank = self.blank();
        let line = &mut self.grid[row];
        for _ in 0..n {
            line.insert(col, blank);
        }
        line.truncate(width);
        self.pending_wrap = false;
        self.mark(row);
    }

    pub(crate) fn delete_chars(&mut self, n: usize) {
        let (row, col, width) = (self.row, self.col, self.width);
        let n = n.min(width - col);
        let blank = self.blank();
        let line = &mut self.grid[row];
        line.drain(col..col + n);
        line.resize(width, blank);
        self.pending_wrap = false;
        self.mark(row);
    }

    pub(crate) fn insert_lines(&mut self, n: usize) {
        if self.row < self.scroll_top || self.row > self.scroll_bottom {
            return;
        }
        let saved_top = self.scroll_top;
        self.scroll_top = self.row;
        self.scroll_down(n);
        self.scroll_top = saved_top;
        self.col = 0;
        self.pending_wrap = false;
    }

    pub(crate) fn delete_lines(&mut self, n: usize) {
        if self.row < self.scroll_top || self.row > self.scroll_bottom {
            return;
        }
        // Lines deleted inside the screen never reach the scrollback.
        let bottom = self.scroll_bottom;
        let n = n.min(bottom - self.row + 1);
        for _ in 0..n {
            self.grid.remove(self.row);
            self.grid.insert(bottom, blank_row(self.width));
        }
        self.mark_range(self.row, bottom);
        self.col = 0;
        self.pending_wrap = false;
    }
}

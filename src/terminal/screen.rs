//! Screen state shared by the escape sequence handlers.
//!
//! The grid holds the active screen (primary or alternate). Lines that
//! scroll off the top of the primary screen are appended to the
//! scrollback; the alternate screen never contributes to it.

use std::collections::{BTreeSet, VecDeque};

use super::types::{Cell, CellStyle};

pub(crate) type Row = Vec<Cell>;

/// Cursor state saved by DECSC / `CSI s` / mode 1049.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SavedCursor {
    pub row: usize,
    pub col: usize,
    pub style: CellStyle,
}

#[derive(Debug, Clone)]
pub(crate) struct Screen {
    pub width: usize,
    pub height: usize,
    pub grid: Vec<Row>,
    /// Primary grid, stashed while the alternate screen is active
    pub primary: Option<Vec<Row>>,
    pub scrollback: VecDeque<Row>,
    pub row: usize,
    pub col: usize,
    /// Set after printing into the last column; the next printable wraps
    pub pending_wrap: bool,
    pub style: CellStyle,
    pub saved: Option<SavedCursor>,
    pub alt_saved: Option<SavedCursor>,
    pub scroll_top: usize,
    pub scroll_bottom: usize,
    pub cursor_visible: bool,
    pub autowrap: bool,
    pub changed: BTreeSet<usize>,
}

impl Screen {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            grid: vec![blank_row(width); height],
            primary: None,
            scrollback: VecDeque::new(),
            row: 0,
            col: 0,
            pending_wrap: false,
            style: CellStyle::default(),
            saved: None,
            alt_saved: None,
            scroll_top: 0,
            scroll_bottom: height - 1,
            cursor_visible: true,
            autowrap: true,
            changed: BTreeSet::new(),
        }
    }

    pub fn in_alt_screen(&self) -> bool {
        self.primary.is_some()
    }

    pub fn mark(&mut self, row: usize) {
        if row < self.height {
            self.changed.insert(row);
        }
    }

    pub fn mark_range(&mut self, from: usize, to_inclusive: usize) {
        for r in from..=to_inclusive.min(self.height.saturating_sub(1)) {
            self.changed.insert(r);
        }
    }

    pub fn mark_all(&mut self) {
        self.mark_range(0, self.height.saturating_sub(1));
    }

    /// Blank cell used for erase operations.
    pub fn blank(&self) -> Cell {
        Cell::default()
    }

    /// Write a blank over `col` in `row`, repairing any wide character it splits.
    pub fn clear_cell(&mut self, row: usize, col: usize) {
        if row >= self.height || col >= self.width {
            return;
        }
        let blank = self.blank();
        let line = &mut self.grid[row];
        match line[col].width {
            0 if col > 0 => line[col - 1] = blank,
            2 if col + 1 < line.len() => line[col + 1] = blank,
            _ => {}
        }
        line[col] = blank;
    }

    /// Scroll the region `[scroll_top, scroll_bottom]` up by `n` lines.
    pub fn scroll_up(&mut self, n: usize) {
        let (top, bottom) = (self.scroll_top, self.scroll_bottom);
        let n = n.min(bottom - top + 1);
        for _ in 0..n {
            let line = self.grid.remove(top);
            if top == 0 && !self.in_alt_screen() {
                self.scrollback.push_back(line);
            }
            self.grid.insert(bottom, blank_row(self.width));
        }
        self.mark_range(top, bottom);
    }

    /// Scroll the region `[scroll_top, scroll_bottom]` down by `n` lines.
    pub fn scroll_down(&mut self, n: usize) {
        let (top, bottom) = (self.scroll_top, self.scroll_bottom);
        let n = n.min(bottom - top + 1);
        for _ in 0..n {
            self.grid.remove(bottom);
            self.grid.insert(top, blank_row(self.width));
        }
        self.mark_range(top, bottom);
    }

    /// Line feed: move down, scrolling at the bottom margin.
    pub fn linefeed(&mut self) {
        self.pending_wrap = false;
        if self.row == self.scroll_bottom {
            self.scroll_up(1);
        } else if self.row + 1 < self.height {
            self.row += 1;
        }
    }

    /// Reverse index: move up, scrolling down at the top margin.
    pub fn reverse_index(&mut self) {
        self.pending_wrap = false;
        if self.row == self.scroll_top {
            self.scroll_down(1);
        } else if self.row > 0 {
            self.row -= 1;
        }
    }

    pub fn carriage_return(&mut self) {
        self.col = 0;
        self.pending_wrap = false;
    }

    /// Put a printable character at the cursor.
    pub fn print(&mut self, c: char, width: usize) {
        if width == 0 {
            // Combining marks are dropped; the base character stays.
            return;
        }

        if self.pending_wrap {
            if self.autowrap {
                self.carriage_return();
                self.linefeed();
            }
            self.pending_wrap = false;
        }

        if self.col + width > self.width {
            if self.autowrap && width <= self.width {
                for c in self.col..self.width {
                    self.clear_cell(self.row, c);
                }
                self.carriage_return();
                self.linefeed();
            } else {
                self.col = self.width.saturating_sub(width);
            }
        }

        let (row, col) = (self.row, self.col);
        self.clear_cell(row, col);
        if width == 2 && col + 1 < self.width {
            self.clear_cell(row, col + 1);
            self.grid[row][col + 1] = Cell::new(' ', self.style, 0);
        }
        self.grid[row][col] = Cell::new(c, self.style, width as u8);
        self.mark(row);

        self.col += width;
        if self.col >= self.width {
            self.col = self.width - 1;
            self.pending_wrap = true;
        }
    }

    pub fn save_cursor(&self) -> SavedCursor {
        SavedCursor {
            row: self.row,
            col: self.col,
            style: self.style,
        }
    }

    pub fn restore_cursor(&mut self, saved: Option<SavedCursor>) {
        let saved = saved.unwrap_or_default();
        self.row = saved.row.min(self.height - 1);
        self.col = saved.col.min(self.width - 1);
        self.style = saved.style;
        self.pending_wrap = false;
    }

    pub fn enter_alt_screen(&mut self, save_cursor: bool) {
        if self.in_alt_screen() {
            return;
        }
        if save_cursor {
            self.alt_saved = Some(self.save_cursor());
        }
        let alt = vec![blank_row(self.width); self.height];
        self.primary = Some(std::mem::replace(&mut self.grid, alt));
        self.mark_all();
    }

    pub fn exit_alt_screen(&mut self, restore_cursor: bool) {
        if let Some(primary) = self.primary.take() {
            self.grid = primary;
            if restore_cursor {
                let saved = self.alt_saved.take();
                self.restore_cursor(saved);
            }
            self.mark_all();
        }
    }

    /// Full reset (RIS). Scrollback is kept.
    pub fn reset(&mut self) {
        let scrollback = std::mem::take(&mut self.scrollback);
        *self = Screen::new(self.width, self.height);
        self.scrollback = scrollback;
        self.mark_all();
    }

    /// Resize the screen, pushing rows that no longer fit above the cursor
    /// into the scrollback.
    pub fn resize(&mut self, width: usize, height: usize) {
        let width = width.max(1);
        let height = height.max(1);

        for row in self.grid.iter_mut() {
            resize_row(row, width);
        }
        if let Some(primary) = self.primary.as_mut() {
            for row in primary.iter_mut() {
                resize_row(row, width);
            }
        }

        if height < self.height {
            let excess = (self.row + 1).saturating_sub(height);
            for _ in 0..excess {
                let line = self.grid.remove(0);
                if !self.in_alt_screen() {
                    self.scrollback.push_back(line);
                }
            }
            self.grid.truncate(height);
            self.row -= excess;
            if let Some(primary) = self.primary.as_mut() {
                let drop = primary.len().saturating_sub(height);
                let pushed: Vec<Row> = primary.drain(..drop).collect();
                self.scrollback.extend(pushed);
            }
        } else {
            self.grid.resize(height, blank_row(width));
            if let Some(primary) = self.primary.as_mut() {
                primary.resize(height, blank_row(width));
            }
        }

        self.width = width;
        self.height = height;
        self.scroll_top = 0;
        self.scroll_bottom = height - 1;
        self.row = self.row.min(height - 1);
        self.col = self.col.min(width - 1);
        self.pending_wrap = false;
        self.changed.clear();
        self.mark_all();
    }

    /// Number of viewport rows up to and including the last non-blank one.
    pub fn used_rows(&self) -> usize {
        self.grid
            .iter()
            .rposition(|row| !row_is_blank(row))
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

/// True if the row shows no visible character (styled spaces count as blank).
pub(crate) fn row_is_blank(row: &[Cell]) -> bool {
    row.iter().all(|c| c.width == 0 || c.char.is_whitespace())
}

pub(crate) fn blank_row(width: usize) -> Row {
    vec![Cell::default(); width]
}

fn resize_row(row: &mut Row, width: usize) {
    row.resize(width, Cell::default());
    if let Some(last) = row.last_mut() {
        if last.width == 2 {
            *last = Cell::default();
        }
    }
}

//! Scroll region handlers.
//!
//! Handles CSI sequences:
//! - r: DECSTBM (Set Top and Bottom Margins)
//! - S: Scroll up
//! - T: Scroll down
//!
//! And ESC sequences:
//! - ESC D: Index
//! - ESC E: Next line
//! - ESC M: Reverse index

use crate::terminal::screen::Screen;

impl Screen {
    /// DECSTBM with 1-based, inclusive margins. Invalid regions are ignored.
    pub(crate) fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let top = top.saturating_sub(1);
        let bottom = bottom.min(self.height).saturating_sub(1);
        if top >= bottom {
            return;
        }
        self.scroll_top = top;
        self.scroll_bottom = bottom;
        self.row = 0;
        self.col = 0;
        self.pending_wrap = false;
    }

    pub(crate) fn next_line(&mut self) {
        self.carriage_return();
        self.linefeed();
    }
}

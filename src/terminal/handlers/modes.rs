//! DEC private mode handlers (`CSI ? Pm h` / `CSI ? Pm l`).
//!
//! - 7: Autowrap
//! - 25: Cursor visibility
//! - 47 / 1047: Alternate screen
//! - 1048: Save/restore cursor
//! - 1049: Alternate screen with cursor save/restore

use vte::Params;

use crate::terminal::screen::Screen;

impl Screen {
    pub(crate) fn set_private_modes(&mut self, params: &Params, enable: bool) {
        for param in params.iter() {
            let mode = param.first().copied().unwrap_or(0);
            match (mode, enable) {
                (7, _) => self.autowrap = enable,
                (25, _) => self.cursor_visible = enable,
                (47 | 1047, true) => self.enter_alt_screen(false),
                (47 | 1047, false) => self.exit_alt_screen(false),
                (1048, true) => self.decsc(),
                (1048, false) => self.decrc(),
                (1049, true) => self.enter_alt_screen(true),
                (1049, false) => self.exit_alt_screen(true),
                _ => {}
            }
        }
    }
}

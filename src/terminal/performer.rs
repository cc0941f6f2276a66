//! VTE performer: routes parsed sequences to the screen handlers.

use unicode_width::UnicodeWidthChar;
use vte::{Params, Perform};

use super::handlers::{arg, raw_arg};
use super::screen::Screen;

pub(crate) struct TerminalPerformer<'a> {
    pub screen: &'a mut Screen,
}

impl<'a> TerminalPerformer<'a> {
    pub fn new(screen: &'a mut Screen) -> Self {
        Self { screen }
    }
}

impl Perform for TerminalPerformer<'_> {
    fn print(&mut self, c: char) {
        let width = c.width().unwrap_or(0);
        self.screen.print(c, width);
    }

    fn execute(&mut self, byte: u8) {
        let screen = &mut *self.screen;
        match byte {
            0x08 => screen.backspace(),
            0x09 => screen.tab(),
            0x0A..=0x0C => screen.linefeed(),
            0x0D => screen.carriage_return(),
            _ => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        if ignore {
            return;
        }
        let screen = &mut *self.screen;

        if intermediates == b"?" {
            match action {
                'h' => screen.set_private_modes(params, true),
                'l' => screen.set_private_modes(params, false),
                _ => {}
            }
            return;
        }
        if !intermediates.is_empty() {
            return;
        }

        match action {
            'A' => screen.cursor_up(arg(params, 0, 1)),
            'B' | 'e' => screen.cursor_down(arg(params, 0, 1)),
            'C' | 'a' => screen.cursor_forward(arg(params, 0, 1)),
            'D' => screen.cursor_back(arg(params, 0, 1)),
            'E' => {
                screen.cursor_down(arg(params, 0, 1));
                screen.carriage_return();
            }
            'F' => {
                screen.cursor_up(arg(params, 0, 1));
                screen.carriage_return();
            }
            'G' | '`' => screen.cursor_column(arg(params, 0, 1)),
            'H' | 'f' => screen.cursor_position(arg(params, 0, 1), arg(params, 1, 1)),
            'd' => screen.cursor_row(arg(params, 0, 1)),
            'J' => screen.erase_in_display(raw_arg(params, 0)),
            'K' => screen.erase_in_line(raw_arg(params, 0)),
            '@' => screen.insert_chars(arg(params, 0, 1)),
            'P' => screen.delete_chars(arg(params, 0, 1)),
            'X' => screen.erase_chars(arg(params, 0, 1)),
            'L' => screen.insert_lines(arg(params, 0, 1)),
            'M' => screen.delete_lines(arg(params, 0, 1)),
            'S' => screen.scroll_up(arg(params, 0, 1)),
            'T' => screen.scroll_down(arg(params, 0, 1)),
            'r' => {
                let bottom = arg(params, 1, screen.height);
                screen.set_scroll_region(arg(params, 0, 1), bottom);
            }
            'm' => screen.set_graphics_rendition(params),
            's' => screen.decsc(),
            'u' => screen.decrc(),
            _ => {}
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        if !intermediates.is_empty() {
            return;
        }
        let screen = &mut *self.screen;
        match byte {
            b'7' => screen.decsc(),
            b'8' => screen.decrc(),
            b'D' => screen.linefeed(),
            b'E' => screen.next_line(),
            b'M' => screen.reverse_index(),
            b'c' => screen.reset(),
            _ => {}
        }
    }
}

//! SGR (Select Graphic Rendition) handler.
//!
//! Handles CSI m sequence for text styling:
//! - Reset (0)
//! - Bold, dim, italic, underline, blink, reverse, strikethrough (1-9)
//! - Attribute resets (21-29)
//! - Standard foreground/background colors (30-47)
//! - Extended colors - 256-color mode (38;5;n, 48;5;n)
//! - Extended colors - RGB mode (38;2;r;g;b, 48;2;r;g;b), also in colon form
//! - Bright foreground/background colors (90-107)

use vte::{Params, ParamsIter};

use crate::terminal::screen::Screen;
use crate::terminal::types::{CellStyle, Color};

impl Screen {
    pub(crate) fn set_graphics_rendition(&mut self, params: &Params) {
        if params.is_empty() {
            self.style = CellStyle::default();
            return;
        }

        let mut iter = params.iter();
        while let Some(param) = iter.next() {
            let code = param.first().copied().unwrap_or(0);
            let style = &mut self.style;
            match code {
                0 => *style = CellStyle::default(),
                1 => style.bold = true,
                2 => style.dim = true,
                3 => style.italic = true,
                // `4:0` is the colon form of "underline off"
                4 => style.underline = param.get(1).map_or(true, |&sub| sub != 0),
                5 | 6 => style.blink = true,
                7 => style.reverse = true,
                9 => style.strikethrough = true,
                21 => style.underline = true,
                22 => {
                    style.bold = false;
                    style.dim = false;
                }
                23 => style.italic = false,
                24 => style.underline = false,
                25 => style.blink = false,
                27 => style.reverse = false,
                29 => style.strikethrough = false,
                30..=37 => style.fg = Color::from_index((code - 30) as u8),
                38 => {
                    if let Some(color) = extended_color(param, &mut iter) {
                        style.fg = color;
                    }
                }
                39 => style.fg = Color::Default,
                40..=47 => style.bg = Color::from_index((code - 40) as u8),
                48 => {
                    if let Some(color) = extended_color(param, &mut iter) {
                        style.bg = color;
                    }
                }
                49 => style.bg = Color::Default,
                // Underline color: parse to keep the argument stream aligned
                58 => {
                    let _ = extended_color(param, &mut iter);
                }
                90..=97 => style.fg = Color::from_index((code - 90 + 8) as u8),
                100..=107 => style.bg = Color::from_index((code - 100 + 8) as u8),
                _ => {}
            }
        }
    }
}

/// Parse the color following 38/48/58, in colon (`38:5:n`) or
/// semicolon (`38;5;n`) form.
fn extended_color(param: &[u16], iter: &mut ParamsIter<'_>) -> Option<Color> {
    if param.len() > 1 {
        return match param[1] {
            5 => param.get(2).map(|&n| Color::Indexed(n as u8)),
            2 => {
                // 38:2:r:g:b or 38:2:<colorspace>:r:g:b
                let rgb = if param.len() >= 6 {
                    &param[3..6]
                } else {
                    param.get(2..5)?
                };
                Some(Color::Rgb(rgb[0] as u8, rgb[1] as u8, rgb[2] as u8))
            }
            _ => None,
        };
    }

    let mut next = || iter.next().and_then(|p| p.first().copied());
    match next()? {
        5 => next().map(|n| Color::Indexed(n as u8)),
        2 => {
            let r = next()?;
            let g = next()?;
            let b = next()?;
            Some(Color::Rgb(r as u8, g as u8, b as u8))
        }
        _ => None,
    }
}

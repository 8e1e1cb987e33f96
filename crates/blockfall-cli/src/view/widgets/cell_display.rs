use blockfall_engine::Rgb;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::view::widgets::{color, style, terminal_color};

/// One playfield cell, drawn two terminal columns wide.
#[derive(Debug, Clone, Copy)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    /// An empty cell on the `background` color, optionally marked with a dot.
    pub const fn empty(background: Rgb, show_dots: bool) -> Self {
        let background = terminal_color(background);
        if show_dots {
            Self {
                style: style::fg_bg(color::GRAY, background),
                symbol: ".",
            }
        } else {
            Self {
                style: style::bg_only(background),
                symbol: "",
            }
        }
    }

    /// Landing preview of the falling piece.
    pub const fn ghost(background: Rgb) -> Self {
        Self {
            style: style::fg_bg(color::WHITE, terminal_color(background)),
            symbol: "[]",
        }
    }

    pub const fn filled(color: Rgb) -> Self {
        Self {
            style: style::bg_only(terminal_color(color)),
            symbol: "",
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // A Paragraph fills the whole area, not only the symbol cells.
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}

use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};
use tetrion_engine::PieceColor;

use crate::ui::widgets::style;

/// What occupies one grid cell on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Empty,
    /// Landing position of the falling piece.
    Ghost,
    Filled(PieceColor),
}

#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_kind(kind: BlockKind, show_dots: bool) -> Self {
        match kind {
            BlockKind::Empty if show_dots => Self::new(style::EMPTY_DOT, "."),
            BlockKind::Empty => Self::new(style::EMPTY, ""),
            BlockKind::Ghost => Self::new(style::GHOST, "[]"),
            BlockKind::Filled(color) => Self::new(style::piece(color), ""),
        }
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Paragraph fills the whole area, not just the cells under the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}

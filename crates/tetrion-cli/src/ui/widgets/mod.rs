use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, key_binding_display::*, piece_display::*,
    session_display::*, session_stats_display::*, status_line::*,
};

mod block_display;
mod board_display;
mod key_binding_display;
mod piece_display;
mod session_display;
mod session_stats_display;
mod status_line;

mod color {
    use ratatui::style::Color;

    // Common colors as associated constants
    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(63, 63, 63);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};
    use tetrion_engine::PieceColor;

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::DARK_GRAY, color::BLACK);
    pub const GHOST: Style = fg_bg(color::GRAY, color::BLACK);
    pub const SELECTED: Style = fg_bg(color::BLACK, color::CYAN);
    pub const INFO: Style = fg_bg(color::GREEN, color::BLACK);
    pub const ERROR: Style = fg_bg(color::RED, color::BLACK);

    pub const fn piece(piece_color: PieceColor) -> Style {
        let color = match piece_color {
            PieceColor::Cyan => color::CYAN,
            PieceColor::Yellow => color::YELLOW,
            PieceColor::Green => color::GREEN,
            PieceColor::Red => color::RED,
            PieceColor::Blue => color::BLUE,
            PieceColor::Orange => color::ORANGE,
            PieceColor::Magenta => color::MAGENTA,
            PieceColor::Gray => color::GRAY,
        };
        bg_only(color)
    }
}

/// Label for a boolean option.
pub fn on_off(enabled: bool) -> String {
    if enabled { "ON" } else { "OFF" }.to_owned()
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}

/// Paints `cells` onto a `width` x `height` grid of [`BlockKind::Empty`].
///
/// Cells outside the grid are skipped.
fn paint_grid<I>(width: usize, height: usize, cells: I) -> Vec<Vec<BlockKind>>
where
    I: IntoIterator<Item = (i32, i32, BlockKind)>,
{
    let mut grid = vec![vec![BlockKind::Empty; width]; height];
    for (x, y, kind) in cells {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            continue;
        };
        if let Some(slot) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = kind;
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use tetrion_engine::PieceColor;

    use super::*;

    #[test]
    fn test_on_off() {
        assert_eq!(on_off(true), "ON");
        assert_eq!(on_off(false), "OFF");
    }

    #[test]
    fn test_paint_grid_skips_outside_cells() {
        let grid = paint_grid(
            3,
            2,
            [
                (0, 0, BlockKind::Ghost),
                (2, 1, BlockKind::Filled(PieceColor::Red)),
                (-1, 0, BlockKind::Ghost),
                (3, 0, BlockKind::Ghost),
                (0, 2, BlockKind::Ghost),
            ],
        );
        assert_eq!(
            grid,
            [
                vec![BlockKind::Ghost, BlockKind::Empty, BlockKind::Empty],
                vec![
                    BlockKind::Empty,
                    BlockKind::Empty,
                    BlockKind::Filled(PieceColor::Red)
                ],
            ]
        );
    }

    #[test]
    fn test_later_cells_win() {
        let grid = paint_grid(
            1,
            1,
            [
                (0, 0, BlockKind::Ghost),
                (0, 0, BlockKind::Filled(PieceColor::Blue)),
            ],
        );
        assert_eq!(grid[0][0], BlockKind::Filled(PieceColor::Blue));
    }
}

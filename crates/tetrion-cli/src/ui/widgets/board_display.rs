use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};
use tetrion_engine::{FIELD_HEIGHT, FIELD_WIDTH, Piece, RenderCell};

use crate::ui::widgets::{BlockDisplay, BlockKind};

const COLUMNS: u16 = 10;
const ROWS: u16 = 20;
const _: () = assert!(COLUMNS as i32 == FIELD_WIDTH && ROWS as i32 == FIELD_HEIGHT);

/// The visible rows of the field with the falling piece and its ghost.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    cells: &'a [RenderCell],
    ghost: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    /// `cells` are the render cells of the session: locked cells and the
    /// falling piece, already limited to the visible rows.
    pub fn new(cells: &'a [RenderCell]) -> Self {
        Self {
            cells,
            ghost: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        COLUMNS * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        ROWS * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    fn grid(&self) -> Vec<Vec<BlockKind>> {
        let ghost_cells = self
            .ghost
            .into_iter()
            .flat_map(|piece| piece.absolute_cells())
            .map(|(x, y)| (x, y, BlockKind::Ghost));
        let cells = self
            .cells
            .iter()
            .map(|cell| (cell.x, cell.y, BlockKind::Filled(cell.color)));
        super::paint_grid(
            usize::from(COLUMNS),
            usize::from(ROWS),
            ghost_cells.chain(cells),
        )
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..COLUMNS).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..ROWS).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.grid()) {
            for (grid_cell, kind) in iter::zip(grid_row, row) {
                BlockDisplay::from_kind(kind, true).render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tetrion_engine::{PieceColor, PieceKind, PiecePosition};

    use super::*;

    #[test]
    fn test_piece_cells_cover_ghost() {
        let piece = Piece::with_pose(PieceKind::O, 0, PiecePosition::new(0, 17));
        let ghost = Piece::with_pose(PieceKind::O, 0, PiecePosition::new(0, 18));
        let cells: Vec<_> = piece
            .absolute_cells()
            .into_iter()
            .map(|(x, y)| RenderCell {
                x,
                y,
                color: PieceColor::Yellow,
            })
            .collect();

        let grid = BoardDisplay::new(&cells).ghost(ghost).grid();
        assert_eq!(grid.len(), 20);
        assert_eq!(grid[17][0], BlockKind::Filled(PieceColor::Yellow));
        // Overlap row: the piece wins
        assert_eq!(grid[18][1], BlockKind::Filled(PieceColor::Yellow));
        assert_eq!(grid[19][0], BlockKind::Ghost);
        assert_eq!(grid[19][2], BlockKind::Empty);
    }

    #[test]
    fn test_size_includes_border() {
        let board = BoardDisplay::new(&[]).block(BlockWidget::bordered());
        assert_eq!(board.width(), 22);
        assert_eq!(board.height(), 22);
    }
}

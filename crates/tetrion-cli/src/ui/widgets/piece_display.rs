use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tetrion_engine::RenderCell;

use crate::ui::widgets::{BlockDisplay, BlockKind};

// Preview cells sit at `PREVIEW_ORIGIN` plus offsets of at most 3
const COLUMNS: u16 = 6;
const ROWS: u16 = 4;

/// Preview panel of the next piece.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    cells: &'a [RenderCell],
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    /// `cells` are preview-panel coordinates as produced by
    /// `GameSession::preview_cells`.
    pub fn new(cells: &'a [RenderCell]) -> Self {
        Self { cells, block: None }
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
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..COLUMNS).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..ROWS).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let grid = super::paint_grid(
            usize::from(COLUMNS),
            usize::from(ROWS),
            self.cells
                .iter()
                .map(|cell| (cell.x, cell.y, BlockKind::Filled(cell.color))),
        );
        for (grid_row, row) in iter::zip(grid_rows, grid) {
            for (grid_cell, kind) in iter::zip(grid_row, row) {
                BlockDisplay::from_kind(kind, false).render(grid_cell, buf);
            }
        }
    }
}

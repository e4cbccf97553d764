use crate::core::{FIELD_HEIGHT, LockedCell, PieceColor, PieceRotation};

use super::game_field::{GameField, NextPiece};

/// Origin of the next-piece preview panel, in preview-panel cells.
pub const PREVIEW_ORIGIN: (i32, i32) = (1, 1);

/// One colored cell handed to the render sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCell {
    pub x: i32,
    pub y: i32,
    pub color: PieceColor,
}

impl From<LockedCell> for RenderCell {
    fn from(cell: LockedCell) -> Self {
        Self {
            x: cell.x,
            y: cell.y,
            color: cell.color,
        }
    }
}

/// Field cells followed by the falling piece, limited to the visible rows.
pub(crate) fn field_cells(field: &GameField) -> Vec<RenderCell> {
    field
        .field()
        .cells()
        .iter()
        .copied()
        .chain(field.active_cells())
        .filter(|cell| (0..FIELD_HEIGHT).contains(&cell.y))
        .map(RenderCell::from)
        .collect()
}

/// The next piece at its spawn rotation, shifted to [`PREVIEW_ORIGIN`].
pub(crate) fn preview_cells(next: &NextPiece) -> Vec<RenderCell> {
    let (ox, oy) = PREVIEW_ORIGIN;
    next.kind
        .offsets(PieceRotation::SPAWN)
        .into_iter()
        .map(|(dx, dy)| RenderCell {
            x: ox + i32::from(dx),
            y: oy + i32::from(dy),
            color: next.color,
        })
        .collect()
}

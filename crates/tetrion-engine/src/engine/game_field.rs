use serde::{Deserialize, Serialize};

use crate::{
    CompletePieceDropError, PieceCollisionError,
    core::{Field, LockedCell, Piece, PieceColor, PieceKind},
};

use super::{options::GameOptions, randomizer::Randomizer};

/// The falling piece together with the color its cells will lock with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePiece {
    pub piece: Piece,
    pub color: PieceColor,
}

/// The piece shown in the preview panel, spawned after the next lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextPiece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

/// Single-turn game state: the locked field, the falling piece and the
/// piece that follows it.
///
/// `GameField` knows nothing about time or session state. It only applies
/// placements and locks; deciding *when* to lock is up to
/// [`GameSession`](crate::GameSession).
#[derive(Debug, Clone)]
pub struct GameField {
    field: Field,
    active: ActivePiece,
    next: NextPiece,
    randomizer: Randomizer,
}

impl GameField {
    /// Creates a field pre-filled for `options.difficulty` with a fresh
    /// current/next pair.
    #[must_use]
    pub fn new(randomizer: Randomizer, options: &GameOptions) -> Self {
        let placeholder = PieceKind::O;
        let mut field = Self {
            field: Field::new(),
            active: ActivePiece {
                piece: Piece::new(placeholder),
                color: PieceColor::DEFAULT,
            },
            next: NextPiece {
                kind: placeholder,
                color: PieceColor::DEFAULT,
            },
            randomizer,
        };
        field.restart(options);
        field
    }

    /// Clears the field, fills the bottom rows for the configured
    /// difficulty and draws a new current/next pair.
    pub fn restart(&mut self, options: &GameOptions) {
        self.field.clear();
        let rows = i32::from(options.difficulty.rows());
        for y in (Field::HEIGHT - rows)..Field::HEIGHT {
            for cell in self.randomizer.difficulty_row(y, options.colors_enabled) {
                self.field.insert(cell);
            }
        }

        let kind = self.randomizer.next_piece_kind();
        let color = self.draw_color(options.colors_enabled, None);
        self.active = ActivePiece {
            piece: Piece::new(kind),
            color,
        };
        self.next = self.draw_next(options.colors_enabled, color);
    }

    /// Replaces the whole state with a previously saved one.
    ///
    /// The caller is responsible for validation; see
    /// [`GameSession::load`](crate::GameSession::load).
    pub(crate) fn restore(&mut self, field: Field, active: ActivePiece, next: NextPiece) {
        self.field = field;
        self.active = active;
        self.next = next;
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    pub fn active_piece(&self) -> &ActivePiece {
        &self.active
    }

    #[must_use]
    pub fn next_piece(&self) -> &NextPiece {
        &self.next
    }

    /// Moves the falling piece to `piece` if that placement is legal.
    pub fn set_active_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.field.is_legal(piece) {
            return Err(PieceCollisionError);
        }
        self.active.piece = piece;
        Ok(())
    }

    /// Returns where the falling piece would land if dropped straight down.
    #[must_use]
    pub fn simulate_drop_position(&self) -> Piece {
        let mut piece = self.active.piece;
        while self.field.is_legal(piece.down()) {
            piece = piece.down();
        }
        piece
    }

    /// Locks the falling piece, clears full rows and spawns the next piece.
    ///
    /// Returns the number of cleared rows, and an error if the newly spawned
    /// piece overlaps the field at its spawn pose (top-out).
    pub fn complete_piece_drop(
        &mut self,
        colors_enabled: bool,
    ) -> (usize, Result<(), CompletePieceDropError>) {
        self.field.lock_piece(self.active.piece, self.active.color);
        let cleared_lines = self.field.clear_full_rows();

        self.active = ActivePiece {
            piece: Piece::new(self.next.kind),
            color: self.next.color,
        };
        self.next = self.draw_next(colors_enabled, self.next.color);

        if !self.field.is_legal(self.active.piece) {
            return (
                cleared_lines,
                Err(CompletePieceDropError::NewPieceCollision),
            );
        }
        (cleared_lines, Ok(()))
    }

    /// Paints the field, the falling piece and the next piece with `color`.
    pub fn recolor(&mut self, color: PieceColor) {
        self.field.recolor(color);
        self.active.color = color;
        self.next.color = color;
    }

    /// Cells of the falling piece, tagged with its color.
    pub(crate) fn active_cells(&self) -> impl Iterator<Item = LockedCell> + '_ {
        self.active
            .piece
            .absolute_cells()
            .into_iter()
            .map(|(x, y)| LockedCell::new(x, y, self.active.color))
    }

    fn draw_next(&mut self, colors_enabled: bool, previous: PieceColor) -> NextPiece {
        NextPiece {
            kind: self.randomizer.next_piece_kind(),
            color: self.draw_color(colors_enabled, Some(previous)),
        }
    }

    fn draw_color(&mut self, colors_enabled: bool, previous: Option<PieceColor>) -> PieceColor {
        if colors_enabled {
            self.randomizer.next_color(previous)
        } else {
            PieceColor::DEFAULT
        }
    }
}

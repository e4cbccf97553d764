//! Core data structures: piece shapes, colors and the locked-cell field.
//!
//! Nothing in this module knows about time or game state. The legality rules
//! live here as pure functions of a [`Piece`] placement and a [`Field`].

pub use self::{color::*, field::*, piece::*};

pub(crate) mod color;
pub(crate) mod field;
pub(crate) mod piece;

/// Number of columns in the grid.
pub const FIELD_WIDTH: i32 = 10;
/// Number of visible rows in the grid.
pub const FIELD_HEIGHT: i32 = 20;

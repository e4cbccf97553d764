use serde::{Deserialize, Serialize};

/// Color of a piece and of the cells it leaves behind when it locks.
///
/// Colors are independent of the piece kind: each new piece draws a color
/// from [`PieceColor::PALETTE`], never repeating the previous one.
/// [`PieceColor::DEFAULT`] is used for every piece while colors are disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceColor {
    Cyan,
    Yellow,
    Green,
    Red,
    Blue,
    Orange,
    Magenta,
    Gray,
}

impl PieceColor {
    /// Colors a piece can be drawn with while colors are enabled.
    pub const PALETTE: [Self; 7] = [
        PieceColor::Cyan,
        PieceColor::Yellow,
        PieceColor::Green,
        PieceColor::Red,
        PieceColor::Blue,
        PieceColor::Orange,
        PieceColor::Magenta,
    ];

    /// The single color used while colors are disabled.
    pub const DEFAULT: Self = PieceColor::Gray;
}

// Drawing "any palette color except the previous one" needs a choice left.
const _: () = assert!(PieceColor::PALETTE.len() >= 2);

use serde::{Deserialize, Serialize};

use crate::core::{FieldError, LockedCell};

use super::game_field::{ActivePiece, NextPiece};

/// Everything needed to resume a game: the falling piece, the next piece,
/// the locked cells and the score.
///
/// Options and statistics other than the score are not part of a save.
/// The value is format-agnostic; any serde format can carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub active_piece: ActivePiece,
    pub next_piece: NextPiece,
    pub field: Vec<LockedCell>,
    pub score: usize,
}

/// Reasons a [`SavedGame`] is rejected by [`GameSession::load`](crate::GameSession::load).
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("invalid field: {_0}")]
    Field(FieldError),
    #[display("active piece overlaps the field or leaves its bounds")]
    ActivePieceCollision,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Piece, PieceColor, PieceKind, PiecePosition};

    #[test]
    fn test_json_layout() {
        let saved = SavedGame {
            active_piece: ActivePiece {
                piece: Piece::with_pose(PieceKind::T, 2, PiecePosition::new(3, 5)),
                color: PieceColor::Magenta,
            },
            next_piece: NextPiece {
                kind: PieceKind::I,
                color: PieceColor::Cyan,
            },
            field: vec![LockedCell::new(0, 19, PieceColor::Gray)],
            score: 140,
        };
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "active_piece": { "piece": "T#2@3,5", "color": "magenta" },
                "next_piece": { "kind": "I", "color": "cyan" },
                "field": [{ "x": 0, "y": 19, "color": "gray" }],
                "score": 140,
            })
        );
        let back: SavedGame = serde_json::from_value(json).unwrap();
        assert_eq!(back, saved);
    }

    #[test]
    fn test_invalid_rotation_is_rejected_on_parse() {
        let json = serde_json::json!({
            "active_piece": { "piece": "O#3@3,5", "color": "yellow" },
            "next_piece": { "kind": "I", "color": "cyan" },
            "field": [],
            "score": 0,
        });
        assert!(serde_json::from_value::<SavedGame>(json).is_err());
    }

    #[test]
    fn test_far_away_piece_is_rejected_on_parse() {
        let json = serde_json::json!({
            "active_piece": { "piece": "T#0@2147483647,5", "color": "magenta" },
            "next_piece": { "kind": "I", "color": "cyan" },
            "field": [],
            "score": 0,
        });
        assert!(serde_json::from_value::<SavedGame>(json).is_err());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tetrion_engine::SavedGame;

/// On-disk envelope of a saved game.
///
/// The engine only hands out a [`SavedGame`] value; this type adds the
/// timestamp and is what the play and inspect commands read and write as
/// JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub saved_at: DateTime<Utc>,
    pub game: SavedGame,
}

impl SaveFile {
    /// Wraps `game`, stamped with the current time.
    pub fn new(game: SavedGame) -> Self {
        Self {
            saved_at: Utc::now(),
            game,
        }
    }
}

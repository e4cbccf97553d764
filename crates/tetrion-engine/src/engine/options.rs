use serde::{Deserialize, Serialize};

/// Number of bottom rows pre-filled with a random pattern at restart.
///
/// Valid values are `0..=10`. Anything else, negative or too large, is
/// coerced to `0` rather than clamped to the nearest bound.
///
/// # Example
///
/// ```
/// use tetrion_engine::Difficulty;
///
/// assert_eq!(Difficulty::new(7).rows(), 7);
/// assert_eq!(Difficulty::new(-1).rows(), 0);
/// assert_eq!(Difficulty::new(11).rows(), 0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MAX: u8 = 10;

    #[must_use]
    pub fn new(value: i32) -> Self {
        match u8::try_from(value) {
            Ok(rows) if rows <= Self::MAX => Self(rows),
            _ => Self(0),
        }
    }

    #[must_use]
    pub const fn rows(self) -> u8 {
        self.0
    }

    /// Next difficulty, wrapping from the maximum back to zero.
    #[must_use]
    pub const fn cycled_up(self) -> Self {
        if self.0 >= Self::MAX {
            Self(0)
        } else {
            Self(self.0 + 1)
        }
    }

    /// Previous difficulty, wrapping from zero to the maximum.
    #[must_use]
    pub const fn cycled_down(self) -> Self {
        if self.0 == 0 {
            Self(Self::MAX)
        } else {
            Self(self.0 - 1)
        }
    }
}

impl From<i32> for Difficulty {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<Difficulty> for i32 {
    fn from(value: Difficulty) -> Self {
        i32::from(value.0)
    }
}

/// Player-controlled options of a session.
///
/// These are plain fields on the session's configuration, mutated only
/// through the session's option setters (see
/// [`GameSession::set_difficulty`](crate::GameSession::set_difficulty) and
/// friends), never through process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    /// Pre-filled rows applied at the next restart.
    pub difficulty: Difficulty,
    /// When `false`, every piece and locked cell uses [`PieceColor::DEFAULT`](crate::PieceColor::DEFAULT).
    pub colors_enabled: bool,
    /// When `true`, the fall speed increases with play time.
    pub accelerate: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            colors_enabled: true,
            accelerate: false,
        }
    }
}

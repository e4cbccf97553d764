use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{FIELD_WIDTH, LockedCell, PieceColor, PieceKind};

/// Source of piece types, piece colors and pre-filled difficulty rows.
///
/// # Piece Types
///
/// Each piece type is drawn uniformly and independently from the seven
/// kinds. There is no bag: the same kind can come up several times in a row.
///
/// # Colors
///
/// Colors are drawn independently of the kind, uniformly from
/// [`PieceColor::PALETTE`] minus the previously returned color, so two
/// consecutive pieces never share a color.
///
/// # Example
///
/// ```
/// use tetrion_engine::engine::Randomizer;
///
/// let mut randomizer = Randomizer::new();
///
/// let kind = randomizer.next_piece_kind();
/// let first = randomizer.next_color(None);
/// let second = randomizer.next_color(Some(first));
/// assert_ne!(first, second);
/// ```
#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: Pcg32,
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator. Using the same seed produces the same sequence of kinds,
/// colors and difficulty rows, enabling reproducible sessions and
/// deterministic tests.
///
/// Seeds are written as 32 hexadecimal characters, both by serde and by
/// [`Display`](fmt::Display)/[`FromStr`].
///
/// # Example
///
/// ```
/// use tetrion_engine::{GameOptions, GameSession, PieceSeed};
///
/// let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
///
/// let session1 = GameSession::with_seed(seed, GameOptions::default());
/// let session2 = GameSession::with_seed(seed, GameOptions::default());
/// assert_eq!(session1.active_piece(), session2.active_piece());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

/// Error returned when a seed string is not exactly 32 hex characters.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {reason}")]
pub struct ParseSeedError {
    #[error(not(source))]
    reason: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(ParseSeedError {
                reason: format!("expected 32 characters, got {}", hex_str.len()),
            });
        }
        let num = u128::from_str_radix(hex_str, 16).map_err(|e| ParseSeedError {
            reason: format!("{hex_str} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl Randomizer {
    /// Creates a randomizer with a random seed.
    ///
    /// For deterministic generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Draws a piece type uniformly from the seven kinds.
    pub fn next_piece_kind(&mut self) -> PieceKind {
        self.rng.random()
    }

    /// Draws a palette color different from `previous`.
    ///
    /// `previous` may be `None` or a color outside the palette (such as
    /// [`PieceColor::DEFAULT`]), in which case every palette color is a
    /// candidate.
    pub fn next_color(&mut self, previous: Option<PieceColor>) -> PieceColor {
        let candidates: ArrayVec<PieceColor, { PieceColor::PALETTE.len() }> = PieceColor::PALETTE
            .into_iter()
            .filter(|color| Some(*color) != previous)
            .collect();
        candidates[self.rng.random_range(0..candidates.len())]
    }

    /// Generates the cells of one pre-filled difficulty row at `y`.
    ///
    /// Each column is filled with probability 1/2, but the row always keeps
    /// at least one hole so it can never be complete on its own.
    pub fn difficulty_row(&mut self, y: i32, colors_enabled: bool) -> Vec<LockedCell> {
        let mut filled = [false; FIELD_WIDTH as usize];
        for cell in &mut filled {
            *cell = self.rng.random_bool(0.5);
        }
        if filled.iter().all(|&f| f) {
            let hole = self.rng.random_range(0..filled.len());
            filled[hole] = false;
        }

        let mut previous = None;
        let mut cells = Vec::new();
        for (x, _) in (0..).zip(filled).filter(|(_, f)| *f) {
            let color = if colors_enabled {
                let color = self.next_color(previous);
                previous = Some(color);
                color
            } else {
                PieceColor::DEFAULT
            };
            cells.push(LockedCell::new(x, y, color));
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_from_bytes(bytes: [u8; 16]) -> PieceSeed {
        PieceSeed(bytes)
    }

    #[test]
    fn test_next_color_never_repeats() {
        let mut randomizer = Randomizer::with_seed(seed_from_bytes([7; 16]));
        let mut previous = randomizer.next_color(None);
        for _ in 0..1000 {
            let color = randomizer.next_color(Some(previous));
            assert_ne!(color, previous);
            assert!(PieceColor::PALETTE.contains(&color));
            previous = color;
        }
    }

    #[test]
    fn test_next_color_after_default_uses_whole_palette() {
        let mut randomizer = Randomizer::with_seed(seed_from_bytes([3; 16]));
        let mut seen = Vec::new();
        for _ in 0..1000 {
            let color = randomizer.next_color(Some(PieceColor::DEFAULT));
            if !seen.contains(&color) {
                seen.push(color);
            }
        }
        assert_eq!(seen.len(), PieceColor::PALETTE.len());
    }

    #[test]
    fn test_piece_kinds_cover_all_types() {
        let mut randomizer = Randomizer::with_seed(seed_from_bytes([1; 16]));
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..1000 {
            seen[randomizer.next_piece_kind() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_difficulty_row_always_has_a_hole() {
        let mut randomizer = Randomizer::with_seed(seed_from_bytes([9; 16]));
        for _ in 0..1000 {
            let row = randomizer.difficulty_row(19, true);
            assert!(row.len() < FIELD_WIDTH as usize);
            assert!(row.iter().all(|c| c.y == 19 && (0..FIELD_WIDTH).contains(&c.x)));
        }
    }

    #[test]
    fn test_difficulty_row_without_colors_uses_default() {
        let mut randomizer = Randomizer::with_seed(seed_from_bytes([5; 16]));
        let row = randomizer.difficulty_row(10, false);
        assert!(row.iter().all(|c| c.color == PieceColor::DEFAULT));
    }

    #[test]
    fn test_deterministic_generation() {
        let seed = seed_from_bytes([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ]);

        let mut randomizer1 = Randomizer::with_seed(seed);
        let mut randomizer2 = Randomizer::with_seed(seed);

        for _ in 0..20 {
            assert_eq!(randomizer1.next_piece_kind(), randomizer2.next_piece_kind());
            assert_eq!(randomizer1.next_color(None), randomizer2.next_color(None));
        }
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_known_value_sequential_bytes() {
            // Big-endian: bytes appear in order as hex pairs
            let seed = seed_from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_parse_accepts_uppercase_hex() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_error_cases() {
            for json in [
                "\"ghijklmnopqrstuvwxyzghijklmnopqr\"",
                "\"0123456789abcdef0123456789abcde\"",
                "\"0123456789abcdef0123456789abcdef0\"",
                "\"\"",
            ] {
                let result: Result<PieceSeed, _> = serde_json::from_str(json);
                let err_msg = result.unwrap_err().to_string();
                assert!(err_msg.contains("invalid hex"), "{json}: {err_msg}");
            }
        }

        #[test]
        fn test_random_seed_round_trip_preserves_generation() {
            let original: PieceSeed = rand::rng().random();
            let serialized = serde_json::to_string(&original).unwrap();
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();

            let mut randomizer1 = Randomizer::with_seed(original);
            let mut randomizer2 = Randomizer::with_seed(deserialized);
            for _ in 0..20 {
                assert_eq!(randomizer1.next_piece_kind(), randomizer2.next_piece_kind());
            }
        }
    }
}

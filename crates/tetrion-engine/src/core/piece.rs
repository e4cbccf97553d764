use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{FIELD_HEIGHT, FIELD_WIDTH};

/// A piece placement: type, rotation state and grid position.
///
/// This is the unit the legality engine reasons about. Placements are
/// immutable; movement and rotation return new values and never check
/// legality themselves (see [`Field::is_legal`](super::Field::is_legal)).
///
/// # Coordinate System
///
/// - `x` grows rightward, `y` grows downward
/// - The position is the logical origin of the rotation state's offsets
/// - `y` may be negative while the piece is above the visible grid
///
/// # Example
///
/// ```
/// use tetrion_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.right().down();
/// let rotated = moved.rotated();
/// assert_eq!(rotated.position(), moved.position());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@x,y" (e.g., "S#1@4,-1")
        let s = format!(
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.position.x,
            self.position.y
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let s = String::deserialize(deserializer)?;

        let (kind_str, rest) = s.split_once('#').ok_or_else(|| {
            D::Error::custom(format!(
                "missing '#' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;
        let mut kind_chars = kind_str.chars();
        let kind = match (kind_chars.next(), kind_chars.next()) {
            (Some(c), None) => PieceKind::from_char(c)
                .ok_or_else(|| D::Error::custom(format!("invalid piece kind: {c}")))?,
            _ => {
                return Err(D::Error::custom(format!(
                    "piece kind must be single character, got '{kind_str}'"
                )));
            }
        };

        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(|| {
            D::Error::custom(format!(
                "missing '@' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;
        let rotation_num = rotation_str.parse::<u8>().map_err(|e| {
            D::Error::custom(format!("invalid rotation: {rotation_str} ({e})"))
        })?;
        if usize::from(rotation_num) >= kind.rotation_count() {
            return Err(D::Error::custom(format!(
                "rotation must be below {} for {kind_str}, got {rotation_num}",
                kind.rotation_count()
            )));
        }

        let (x_str, y_str) = position_str.split_once(',').ok_or_else(|| {
            D::Error::custom(format!(
                "missing ',' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;
        let x = x_str
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid y position: {y_str} ({e})")))?;
        if !PiecePosition::X_RANGE.contains(&x) || !PiecePosition::Y_RANGE.contains(&y) {
            return Err(D::Error::custom(format!(
                "position ({x}, {y}) is too far from the field"
            )));
        }

        Ok(Piece {
            position: PiecePosition::new(x, y),
            rotation: PieceRotation(rotation_num),
            kind,
        })
    }
}

impl Piece {
    /// Creates a piece of the given kind at the spawn pose.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self {
            position: PiecePosition::SPAWN_POSITION,
            rotation: PieceRotation::SPAWN,
            kind,
        }
    }

    /// Creates a piece at an arbitrary pose.
    ///
    /// The rotation index is reduced modulo the kind's rotation count.
    #[must_use]
    pub fn with_pose(kind: PieceKind, rotation: usize, position: PiecePosition) -> Self {
        #[expect(clippy::cast_possible_truncation)]
        let rotation = PieceRotation((rotation % kind.rotation_count()) as u8);
        Self {
            position,
            rotation,
            kind,
        }
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Maps each offset of the current rotation state to absolute grid coordinates.
    #[must_use]
    pub fn absolute_cells(&self) -> [(i32, i32); 4] {
        self.kind
            .offsets(self.rotation)
            .map(|(dx, dy)| (self.position.x + i32::from(dx), self.position.y + i32::from(dy)))
    }

    #[must_use]
    pub fn left(&self) -> Self {
        Self {
            position: self.position.left(),
            ..*self
        }
    }

    #[must_use]
    pub fn right(&self) -> Self {
        Self {
            position: self.position.right(),
            ..*self
        }
    }

    #[must_use]
    pub fn down(&self) -> Self {
        Self {
            position: self.position.down(),
            ..*self
        }
    }

    /// Returns the piece advanced to its next rotation state, position unchanged.
    ///
    /// There is no wall-kick search: callers reject the result if it is illegal.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.next(self.kind),
            ..*self
        }
    }
}

/// Grid position of a piece's logical origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    /// Where every new piece appears: one row above the visible grid.
    pub const SPAWN_POSITION: Self = Self::new(4, -1);

    /// Origins a saved piece may have. Every piece cell lies within four
    /// columns of the field and at most four rows above it.
    pub const X_RANGE: std::ops::Range<i32> = -4..FIELD_WIDTH + 4;
    pub const Y_RANGE: std::ops::Range<i32> = -4..FIELD_HEIGHT;

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn left(self) -> Self {
        Self::new(self.x - 1, self.y)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        Self::new(self.x + 1, self.y)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.x, self.y + 1)
    }
}

/// Index into a piece kind's rotation state list.
///
/// Rotation is cyclic: advancing past the last state returns to state 0.
/// The number of states depends on the kind (see [`PieceKind::rotation_count`]).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    /// Rotation state of a freshly spawned piece.
    pub const SPAWN: Self = Self(0);

    /// Returns `(current + 1) mod kind.rotation_count()`.
    #[must_use]
    pub fn next(self, kind: PieceKind) -> Self {
        #[expect(clippy::cast_possible_truncation)]
        let count = kind.rotation_count() as u8;
        Self((self.0 + 1) % count)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Returns the number of defined rotation states for this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrion_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::O.rotation_count(), 1);
    /// assert_eq!(PieceKind::I.rotation_count(), 2);
    /// assert_eq!(PieceKind::T.rotation_count(), 4);
    /// ```
    #[must_use]
    pub const fn rotation_count(self) -> usize {
        ROTATION_STATES[self as usize].len()
    }

    /// Returns the 4 relative offsets of the given rotation state.
    ///
    /// # Panics
    ///
    /// Panics if `rotation` is not a valid state of this kind. Rotations built
    /// through [`PieceRotation::next`] and [`Piece::with_pose`] always are.
    #[must_use]
    pub fn offsets(self, rotation: PieceRotation) -> [(i8, i8); 4] {
        ROTATION_STATES[self as usize][rotation.index()]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrion_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrion_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

type RotationState = [(i8, i8); 4];

// Offsets are (dx, dy) from the piece origin, y pointing down.
const ROTATION_STATES: [&[RotationState]; PieceKind::LEN] = [
    // I-piece
    &[
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(1, 0), (1, 1), (1, 2), (1, 3)],
    ],
    // O-piece
    &[[(0, 0), (1, 0), (0, 1), (1, 1)]],
    // S-piece
    &[
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(0, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // Z-piece
    &[
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
    ],
    // J-piece
    &[
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // L-piece
    &[
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
    // T-piece
    &[
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
];

// Every offset must fit inside the grid so that a centered piece is placeable.
const _: () = {
    let mut k = 0;
    while k < PieceKind::LEN {
        let states = ROTATION_STATES[k];
        let mut r = 0;
        while r < states.len() {
            let mut c = 0;
            while c < 4 {
                let (dx, dy) = states[r][c];
                assert!(dx >= 0 && (dx as i32) < FIELD_WIDTH);
                assert!(dy >= 0 && (dy as i32) < FIELD_HEIGHT);
                c += 1;
            }
            r += 1;
        }
        k += 1;
    }
};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_rotation_cycle_returns_to_start() {
        for kind in PieceKind::ALL {
            for start in 0..kind.rotation_count() {
                let start = Piece::with_pose(kind, start, PiecePosition::SPAWN_POSITION);
                let mut piece = start;
                for _ in 0..kind.rotation_count() {
                    piece = piece.rotated();
                }
                assert_eq!(piece, start, "{kind:?} did not cycle");
            }
        }
    }

    #[test]
    fn test_rotation_states_have_four_distinct_cells() {
        for kind in PieceKind::ALL {
            for r in 0..kind.rotation_count() {
                let piece = Piece::with_pose(kind, r, PiecePosition::new(0, 0));
                let cells: HashSet<_> = piece.absolute_cells().into_iter().collect();
                assert_eq!(cells.len(), 4, "{kind:?} state {r}");
            }
        }
    }

    #[test]
    fn test_absolute_cells_are_offset_by_position() {
        let piece = Piece::with_pose(PieceKind::O, 0, PiecePosition::new(3, 7));
        assert_eq!(piece.absolute_cells(), [(3, 7), (4, 7), (3, 8), (4, 8)]);
    }

    #[test]
    fn test_with_pose_wraps_rotation() {
        let piece = Piece::with_pose(PieceKind::S, 3, PiecePosition::new(0, 0));
        assert_eq!(piece.rotation().index(), 1);
        let piece = Piece::with_pose(PieceKind::O, 2, PiecePosition::new(0, 0));
        assert_eq!(piece.rotation().index(), 0);
    }

    #[test]
    fn test_movement_keeps_rotation_and_kind() {
        let piece = Piece::with_pose(PieceKind::L, 2, PiecePosition::new(5, 5));
        assert_eq!(piece.left().position(), PiecePosition::new(4, 5));
        assert_eq!(piece.right().position(), PiecePosition::new(6, 5));
        assert_eq!(piece.down().position(), PiecePosition::new(5, 6));
        assert_eq!(piece.down().rotation(), piece.rotation());
        assert_eq!(piece.left().kind(), PieceKind::L);
    }

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::with_pose(PieceKind::S, 1, PiecePosition::new(4, -1));

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"S#1@4,-1\"");

        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_piece_deserialization_error_cases() {
        // Invalid format
        assert!(serde_json::from_str::<Piece>("\"S1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1#4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@4\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"SS#1@4,18\"").is_err());

        // Invalid piece kind
        assert!(serde_json::from_str::<Piece>("\"X#1@4,18\"").is_err());

        // Rotation out of range for the kind
        assert!(serde_json::from_str::<Piece>("\"S#2@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"O#1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"T#-1@4,18\"").is_err());

        // Invalid coordinates
        assert!(serde_json::from_str::<Piece>("\"S#1@abc,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@4,xyz\"").is_err());

        // Origin far outside the field
        assert!(serde_json::from_str::<Piece>("\"T#0@2147483647,5\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"T#0@4,-2147483648\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"T#0@14,5\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"T#0@4,20\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"I#1@-4,-4\"").is_ok());
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }
}

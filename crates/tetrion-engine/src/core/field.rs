use std::fmt;

use serde::{Deserialize, Serialize};

use super::{FIELD_HEIGHT, FIELD_WIDTH, color::PieceColor, piece::Piece};

/// A block that has been merged into the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LockedCell {
    pub x: i32,
    pub y: i32,
    pub color: PieceColor,
}

impl LockedCell {
    #[must_use]
    pub const fn new(x: i32, y: i32, color: PieceColor) -> Self {
        Self { x, y, color }
    }
}

/// Reasons a set of cells cannot form a field.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum FieldError {
    #[display("cell ({x}, {y}) is outside the field")]
    OutOfBounds { x: i32, y: i32 },
    #[display("cell ({x}, {y}) appears more than once")]
    DuplicateCell { x: i32, y: i32 },
    #[display("row {y} is full but was never cleared")]
    FullRow { y: i32 },
}

/// The set of locked cells.
///
/// The field is a plain growable list of [`LockedCell`]s. It never holds two
/// cells at the same coordinate; every mutating operation preserves this.
///
/// # Coordinate System
///
/// - Columns are `0..FIELD_WIDTH`, visible rows are `0..FIELD_HEIGHT`
/// - `y` grows downward, so row `FIELD_HEIGHT - 1` is the floor
/// - Cells above the visible grid (`y < 0`) can exist after a piece locks
///   while partly above the top
///
/// # Example
///
/// ```
/// use tetrion_engine::{Field, Piece, PieceColor, PieceKind};
///
/// let mut field = Field::new();
/// let piece = Piece::new(PieceKind::O);
/// assert!(field.is_legal(piece));
///
/// field.lock_piece(piece, PieceColor::Red);
/// assert_eq!(field.len(), 4);
/// assert!(!field.is_legal(piece));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "Vec<LockedCell>", into = "Vec<LockedCell>")]
pub struct Field {
    cells: Vec<LockedCell>,
}

impl TryFrom<Vec<LockedCell>> for Field {
    type Error = FieldError;

    fn try_from(cells: Vec<LockedCell>) -> Result<Self, Self::Error> {
        Self::from_cells(cells)
    }
}

impl From<Field> for Vec<LockedCell> {
    fn from(field: Field) -> Self {
        field.cells
    }
}

impl Field {
    pub const WIDTH: i32 = FIELD_WIDTH;
    pub const HEIGHT: i32 = FIELD_HEIGHT;

    #[must_use]
    pub const fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Builds a field from previously saved cells.
    ///
    /// Rejects cells outside the legal area, duplicate coordinates and rows
    /// that are already full, so the invariants of a live field hold.
    pub fn from_cells(cells: Vec<LockedCell>) -> Result<Self, FieldError> {
        let mut field = Self::new();
        for cell in cells {
            if !Self::is_in_bounds(cell.x, cell.y) {
                return Err(FieldError::OutOfBounds {
                    x: cell.x,
                    y: cell.y,
                });
            }
            if field.is_occupied(cell.x, cell.y) {
                return Err(FieldError::DuplicateCell {
                    x: cell.x,
                    y: cell.y,
                });
            }
            field.cells.push(cell);
        }
        if let Some(&y) = field.full_rows().first() {
            return Err(FieldError::FullRow { y });
        }
        Ok(field)
    }

    #[must_use]
    pub fn cells(&self) -> &[LockedCell] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `(x, y)` is inside the area a piece may occupy.
    ///
    /// There is no upper bound: pieces spawn above the visible grid.
    #[must_use]
    pub const fn is_in_bounds(x: i32, y: i32) -> bool {
        0 <= x && x < FIELD_WIDTH && y < FIELD_HEIGHT
    }

    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.cells.iter().any(|c| c.x == x && c.y == y)
    }

    #[must_use]
    pub fn color_at(&self, x: i32, y: i32) -> Option<PieceColor> {
        self.cells
            .iter()
            .find(|c| c.x == x && c.y == y)
            .map(|c| c.color)
    }

    /// Returns the number of locked cells in row `y`.
    #[must_use]
    pub fn row_len(&self, y: i32) -> usize {
        self.cells.iter().filter(|c| c.y == y).count()
    }

    /// Checks whether the piece can occupy its current placement.
    ///
    /// A placement is legal iff every absolute cell is within the columns,
    /// not below the floor, and not on top of a locked cell.
    #[must_use]
    pub fn is_legal(&self, piece: Piece) -> bool {
        piece
            .absolute_cells()
            .into_iter()
            .all(|(x, y)| Self::is_in_bounds(x, y) && !self.is_occupied(x, y))
    }

    /// Merges a piece into the field, tagging every cell with `color`.
    ///
    /// The piece must be at a legal placement.
    pub fn lock_piece(&mut self, piece: Piece, color: PieceColor) {
        debug_assert!(self.is_legal(piece), "locking an illegal piece");
        self.cells.extend(
            piece
                .absolute_cells()
                .into_iter()
                .map(|(x, y)| LockedCell::new(x, y, color)),
        );
    }

    /// Inserts a single cell, e.g. a pre-filled difficulty block.
    ///
    /// Returns `false` and leaves the field unchanged if the coordinate is
    /// out of bounds or already occupied.
    pub fn insert(&mut self, cell: LockedCell) -> bool {
        if !Self::is_in_bounds(cell.x, cell.y) || self.is_occupied(cell.x, cell.y) {
            return false;
        }
        self.cells.push(cell);
        true
    }

    /// Returns the visible rows whose cell count equals the width, in ascending order.
    #[must_use]
    pub fn full_rows(&self) -> Vec<i32> {
        let mut counts = [0_i32; FIELD_HEIGHT as usize];
        for cell in &self.cells {
            if let Ok(y) = usize::try_from(cell.y)
                && let Some(count) = counts.get_mut(y)
            {
                *count += 1;
            }
        }
        (0..FIELD_HEIGHT)
            .zip(counts)
            .filter_map(|(y, count)| (count == FIELD_WIDTH).then_some(y))
            .collect()
    }

    /// Clears filled rows and returns the number of rows cleared.
    ///
    /// Full rows are collected in a single scan before anything moves. They
    /// are then processed from top to bottom: the row's cells are removed and
    /// every cell above it (smaller `y`) falls by one. Processing a row only
    /// touches cells at or above it, so the rows still pending keep their
    /// original `y`, and the result equals clearing bottom-up one at a time.
    pub fn clear_full_rows(&mut self) -> usize {
        let full_rows = self.full_rows();
        for &row in &full_rows {
            self.cells.retain(|c| c.y != row);
            for cell in &mut self.cells {
                if cell.y < row {
                    cell.y += 1;
                }
            }
        }
        full_rows.len()
    }

    /// Paints every locked cell with `color`.
    pub fn recolor(&mut self, color: PieceColor) {
        for cell in &mut self.cells {
            cell.color = color;
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Creates a `Field` from ASCII art, mainly for tests.
    ///
    /// '#' is an occupied cell (colored [`PieceColor::DEFAULT`]), '.' is empty.
    /// Every row must be exactly `FIELD_WIDTH` cells wide. Rows are given top
    /// to bottom and the last row lands on the floor, so only the interesting
    /// bottom part of the field needs to be drawn.
    ///
    /// # Panics
    ///
    /// Panics if a row has the wrong width or there are more than
    /// `FIELD_HEIGHT` rows.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        let height = i32::try_from(lines.len()).expect("too many rows");
        assert!(
            height <= FIELD_HEIGHT,
            "At most {FIELD_HEIGHT} rows are allowed, got {height}"
        );

        let mut field = Self::new();
        for (y, line) in (FIELD_HEIGHT - height..).zip(lines) {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                FIELD_WIDTH as usize,
                "Each row must have exactly {FIELD_WIDTH} cells, got {} at row {y}",
                chars.len(),
            );
            for (x, ch) in (0..).zip(chars) {
                if ch == '#' {
                    field.cells.push(LockedCell::new(x, y, PieceColor::DEFAULT));
                }
            }
        }
        field
    }
}

/// Draws the visible rows as ASCII art, in the format read by [`Field::from_ascii`].
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..FIELD_HEIGHT {
            for x in 0..FIELD_WIDTH {
                let c = if self.is_occupied(x, y) { '#' } else { '.' };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::core::{PieceKind, PiecePosition};

    const BOTTOM: i32 = FIELD_HEIGHT - 1;

    fn assert_no_duplicates(field: &Field) {
        let unique: HashSet<_> = field.cells().iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(unique.len(), field.len(), "duplicate cells in\n{field}");
    }

    #[test]
    fn test_empty_field_accepts_spawn() {
        let field = Field::new();
        for kind in PieceKind::ALL {
            assert!(field.is_legal(Piece::new(kind)), "{kind:?}");
        }
    }

    #[test]
    fn test_legality_rejects_walls_and_floor() {
        let field = Field::new();
        let origin = Piece::with_pose(PieceKind::O, 0, PiecePosition::new(0, 0));
        assert!(field.is_legal(origin));
        assert!(!field.is_legal(origin.left()));

        let right_edge = Piece::with_pose(PieceKind::O, 0, PiecePosition::new(8, 0));
        assert!(field.is_legal(right_edge));
        assert!(!field.is_legal(right_edge.right()));

        let floor = Piece::with_pose(PieceKind::O, 0, PiecePosition::new(4, BOTTOM - 1));
        assert!(field.is_legal(floor));
        assert!(!field.is_legal(floor.down()));
    }

    #[test]
    fn test_legality_allows_cells_above_top() {
        let field = Field::new();
        let piece = Piece::with_pose(PieceKind::I, 1, PiecePosition::new(3, -10));
        assert!(field.is_legal(piece));
        // x-bounds still apply above the grid
        let piece = Piece::with_pose(PieceKind::I, 0, PiecePosition::new(7, -10));
        assert!(!field.is_legal(piece));
    }

    #[test]
    fn test_legality_rejects_overlap() {
        let field = Field::from_ascii(
            r"
            .....#....
            ",
        );
        let piece = Piece::with_pose(PieceKind::O, 0, PiecePosition::new(4, BOTTOM - 1));
        assert!(!field.is_legal(piece));
        let piece = Piece::with_pose(PieceKind::O, 0, PiecePosition::new(4, BOTTOM - 2));
        assert!(field.is_legal(piece));
    }

    #[test]
    fn test_legal_placements_stay_in_bounds() {
        let field = Field::new();
        for kind in PieceKind::ALL {
            for rotation in 0..kind.rotation_count() {
                for x in -4..FIELD_WIDTH + 4 {
                    for y in -4..FIELD_HEIGHT + 4 {
                        let piece = Piece::with_pose(kind, rotation, PiecePosition::new(x, y));
                        if field.is_legal(piece) {
                            for (cx, cy) in piece.absolute_cells() {
                                assert!((0..FIELD_WIDTH).contains(&cx));
                                assert!(cy < FIELD_HEIGHT);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_clear_single_bottom_row() {
        let mut field = Field::from_ascii(
            r"
            #.........
            ##########
            ",
        );
        assert_eq!(field.full_rows(), vec![BOTTOM]);
        assert_eq!(field.clear_full_rows(), 1);
        assert_eq!(field.cells(), &[LockedCell::new(0, BOTTOM, PieceColor::DEFAULT)]);
    }

    #[test]
    fn test_clear_shifts_rows_above_downward() {
        let mut field = Field::from_ascii(
            r"
            ..#.......
            ##########
            #........#
            ",
        );
        assert_eq!(field.clear_full_rows(), 1);
        // The row below the cleared one does not move
        assert!(field.is_occupied(0, BOTTOM));
        assert!(field.is_occupied(9, BOTTOM));
        // The row above falls into the gap
        assert!(field.is_occupied(2, BOTTOM - 1));
        assert!(!field.is_occupied(2, BOTTOM - 2));
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn test_clear_non_adjacent_rows_matches_bottom_up() {
        let art = r"
            .#........
            ##########
            ...#......
            ##########
            ....#.....
            ##########
            ";
        let mut field = Field::from_ascii(art);
        assert_eq!(field.clear_full_rows(), 3);

        let expected = Field::from_ascii(
            r"
            .#........
            ...#......
            ....#.....
            ",
        );
        assert_eq!(field.to_string(), expected.to_string());
        assert_no_duplicates(&field);
    }

    #[test]
    fn test_clear_without_full_rows_is_noop() {
        let mut field = Field::from_ascii(
            r"
            #########.
            ",
        );
        let before = field.clone();
        assert_eq!(field.clear_full_rows(), 0);
        assert_eq!(field, before);
    }

    #[test]
    fn test_clear_moves_cells_above_top() {
        let mut field = Field::from_ascii(
            r"
            ##########
            ",
        );
        field.cells.push(LockedCell::new(3, -1, PieceColor::Red));
        assert_eq!(field.clear_full_rows(), 1);
        assert_eq!(field.cells(), &[LockedCell::new(3, 0, PieceColor::Red)]);
    }

    #[test]
    fn test_lock_piece_adds_four_cells_without_duplicates() {
        let mut field = Field::from_ascii(
            r"
            ##.....###
            ",
        );
        let piece = Piece::with_pose(PieceKind::T, 0, PiecePosition::new(3, BOTTOM - 1));
        assert!(field.is_legal(piece));
        field.lock_piece(piece, PieceColor::Blue);
        assert_eq!(field.len(), 9);
        assert_eq!(field.color_at(4, BOTTOM - 1), Some(PieceColor::Blue));
        assert_no_duplicates(&field);
    }

    #[test]
    fn test_insert_rejects_occupied_and_out_of_bounds() {
        let mut field = Field::new();
        assert!(field.insert(LockedCell::new(0, BOTTOM, PieceColor::Red)));
        assert!(!field.insert(LockedCell::new(0, BOTTOM, PieceColor::Blue)));
        assert!(!field.insert(LockedCell::new(FIELD_WIDTH, BOTTOM, PieceColor::Blue)));
        assert!(!field.insert(LockedCell::new(0, FIELD_HEIGHT, PieceColor::Blue)));
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_from_cells_validation() {
        let ok = Field::from_cells(vec![
            LockedCell::new(0, BOTTOM, PieceColor::Red),
            LockedCell::new(1, BOTTOM, PieceColor::Red),
        ]);
        assert!(ok.is_ok());

        assert_eq!(
            Field::from_cells(vec![LockedCell::new(-1, 0, PieceColor::Red)]),
            Err(FieldError::OutOfBounds { x: -1, y: 0 })
        );
        assert_eq!(
            Field::from_cells(vec![
                LockedCell::new(2, 3, PieceColor::Red),
                LockedCell::new(2, 3, PieceColor::Blue),
            ]),
            Err(FieldError::DuplicateCell { x: 2, y: 3 })
        );
        let full_row = (0..FIELD_WIDTH)
            .map(|x| LockedCell::new(x, BOTTOM, PieceColor::Red))
            .collect();
        assert_eq!(
            Field::from_cells(full_row),
            Err(FieldError::FullRow { y: BOTTOM })
        );
    }

    #[test]
    fn test_recolor() {
        let mut field = Field::new();
        field.lock_piece(Piece::new(PieceKind::I), PieceColor::Cyan);
        field.recolor(PieceColor::DEFAULT);
        assert!(field.cells().iter().all(|c| c.color == PieceColor::DEFAULT));
    }

    #[test]
    fn test_display_round_trips_through_ascii() {
        let field = Field::from_ascii(
            r"
            #.#.#.#.#.
            .#.#.#.#.#
            ",
        );
        assert_eq!(Field::from_ascii(&field.to_string()), field);
    }

    #[test]
    fn test_serialization_is_cell_list() {
        let field = Field::from_cells(vec![LockedCell::new(1, 2, PieceColor::Orange)]).unwrap();
        let json = serde_json::to_string(&field).unwrap();
        assert_eq!(json, r#"[{"x":1,"y":2,"color":"orange"}]"#);
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }

    #[test]
    fn test_deserialization_checks_invariants() {
        let duplicate = r#"[{"x":1,"y":2,"color":"red"},{"x":1,"y":2,"color":"blue"}]"#;
        assert!(serde_json::from_str::<Field>(duplicate).is_err());

        let out_of_bounds = r#"[{"x":10,"y":2,"color":"red"}]"#;
        assert!(serde_json::from_str::<Field>(out_of_bounds).is_err());

        let full_row: Vec<_> = (0..FIELD_WIDTH)
            .map(|x| LockedCell::new(x, BOTTOM, PieceColor::Red))
            .collect();
        let json = serde_json::to_string(&full_row).unwrap();
        assert!(serde_json::from_str::<Field>(&json).is_err());
    }
}

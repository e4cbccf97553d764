/// Score values for row clears.
///
/// Index corresponds to number of rows cleared by a single lock:
/// - 0 rows: 0 points
/// - 1 row: 40 points
/// - 2 rows: 100 points
/// - 3 rows: 300 points
/// - 4 rows: 1200 points
pub const SCORE_TABLE: [usize; 5] = [0, 40, 100, 300, 1200];

/// Game statistics tracking score, rows cleared, and piece count.
///
/// - **Score**: Points earned from row clears, the only value that is saved
/// - **Completed pieces**: Total number of pieces locked
/// - **Row clear distribution**: Count of single, double, triple, quad clears
///
/// Scoring has no level multiplier, combo or back-to-back bonus.
///
/// # Example
///
/// ```
/// use tetrion_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// let delta = stats.complete_piece_drop(4);
///
/// assert_eq!(delta, 1200);
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_score(0)
    }

    /// Creates statistics for a restored game: the score carries over, the
    /// counters start from zero.
    #[must_use]
    pub const fn with_score(score: usize) -> Self {
        Self {
            score,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by number of rows cleared (index 0 to 4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece locks and returns the score delta.
    ///
    /// # Panics
    ///
    /// Panics if `cleared_lines` is greater than 4. A piece spans at most four
    /// rows and the field never holds a full row between locks, so a single
    /// lock cannot clear more.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) -> usize {
        let delta = SCORE_TABLE[cleared_lines];
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.line_cleared_counter[cleared_lines] += 1;
        self.score = self.score.saturating_add(delta);
        delta
    }
}

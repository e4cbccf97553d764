use std::time::Duration;

use crate::{
    IntentError,
    core::{Field, Piece, PieceColor},
};

use super::{
    fall_speed::FallSpeed,
    game_field::{ActivePiece, GameField, NextPiece},
    game_stats::GameStats,
    options::{Difficulty, GameOptions},
    randomizer::{PieceSeed, Randomizer},
    saved_game::{LoadError, SavedGame},
    snapshot::{self, RenderCell},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// What a logic tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The session is not playing; nothing changed.
    Idle,
    /// The falling piece moved down one row.
    Descended,
    /// The piece could not descend and gets one more tick before locking.
    LockPending,
    /// The piece locked and the next one spawned.
    Locked {
        cleared_lines: usize,
        score_delta: usize,
    },
    /// The piece locked but the next one could not spawn.
    GameOver,
}

/// A game from start to top-out: the field, statistics, options and the
/// fall/lock state machine.
///
/// # Ticks and Lock Delay
///
/// [`tick`](Self::tick) is the only place where the piece falls on its own.
/// The scheduler calls it every [`tick_interval`](Self::tick_interval).
/// When the piece cannot descend the first time, the session only marks a
/// pending lock; the piece locks on the following tick if it still cannot
/// descend. Any successful descent clears the mark.
///
/// # Intents
///
/// Movement, rotation and drops act only while [`SessionState::Playing`];
/// in any other state they return [`IntentError::NotPlaying`] without
/// touching the game.
///
/// # Example
///
/// ```
/// use tetrion_engine::{GameSession, TickOutcome};
///
/// let mut session = GameSession::new();
/// _ = session.try_move_left();
/// _ = session.try_rotate();
/// assert_eq!(session.tick(), TickOutcome::Descended);
///
/// session.toggle_pause();
/// assert_eq!(session.tick(), TickOutcome::Idle);
/// assert!(session.try_move_right().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    field: GameField,
    stats: GameStats,
    options: GameOptions,
    fall_speed: FallSpeed,
    session_state: SessionState,
    lock_pending: bool,
    play_time: Duration,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Starts a session with default options and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(GameOptions::default())
    }

    #[must_use]
    pub fn with_options(options: GameOptions) -> Self {
        Self::with_randomizer(Randomizer::new(), options)
    }

    /// Starts a reproducible session: the same seed and options give the
    /// same pieces, colors and pre-filled rows.
    #[must_use]
    pub fn with_seed(seed: PieceSeed, options: GameOptions) -> Self {
        Self::with_randomizer(Randomizer::with_seed(seed), options)
    }

    fn with_randomizer(randomizer: Randomizer, options: GameOptions) -> Self {
        Self {
            field: GameField::new(randomizer, &options),
            stats: GameStats::new(),
            options,
            fall_speed: FallSpeed::new(options.accelerate),
            session_state: SessionState::Playing,
            lock_pending: false,
            play_time: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        self.field.field()
    }

    #[must_use]
    pub fn active_piece(&self) -> &ActivePiece {
        self.field.active_piece()
    }

    #[must_use]
    pub fn next_piece(&self) -> &NextPiece {
        self.field.next_piece()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    /// Whether the falling piece is waiting out its lock delay.
    #[must_use]
    pub fn is_lock_pending(&self) -> bool {
        self.lock_pending
    }

    /// Play time accumulated by logic ticks while playing.
    #[must_use]
    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    /// Interval the scheduler should wait before the next [`tick`](Self::tick).
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.fall_speed.interval()
    }

    /// Landing position of the falling piece, for a drop preview.
    #[must_use]
    pub fn simulate_drop_position(&self) -> Piece {
        self.field.simulate_drop_position()
    }

    /// Composite of the field and the falling piece, visible rows only.
    #[must_use]
    pub fn render_cells(&self) -> Vec<RenderCell> {
        snapshot::field_cells(&self.field)
    }

    /// Cells of the next piece, offset to [`PREVIEW_ORIGIN`](super::PREVIEW_ORIGIN).
    #[must_use]
    pub fn preview_cells(&self) -> Vec<RenderCell> {
        snapshot::preview_cells(self.field.next_piece())
    }

    /// Advances the fall/lock state machine by one logic tick.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.session_state.is_playing() {
            return TickOutcome::Idle;
        }

        let interval = self.fall_speed.interval();
        self.play_time += interval;
        self.fall_speed.advance(interval);

        let down = self.field.active_piece().piece.down();
        if self.field.set_active_piece(down).is_ok() {
            self.lock_pending = false;
            return TickOutcome::Descended;
        }
        if !self.lock_pending {
            self.lock_pending = true;
            return TickOutcome::LockPending;
        }
        self.complete_piece_drop()
    }

    pub fn try_move_left(&mut self) -> Result<(), IntentError> {
        self.ensure_playing()?;
        let piece = self.field.active_piece().piece.left();
        Ok(self.field.set_active_piece(piece)?)
    }

    pub fn try_move_right(&mut self) -> Result<(), IntentError> {
        self.ensure_playing()?;
        let piece = self.field.active_piece().piece.right();
        Ok(self.field.set_active_piece(piece)?)
    }

    /// Rotates in place. There are no wall kicks: a colliding rotation is rejected.
    pub fn try_rotate(&mut self) -> Result<(), IntentError> {
        self.ensure_playing()?;
        let piece = self.field.active_piece().piece.rotated();
        Ok(self.field.set_active_piece(piece)?)
    }

    /// Moves the piece down one row. A successful step clears a pending lock.
    pub fn try_soft_drop(&mut self) -> Result<(), IntentError> {
        self.ensure_playing()?;
        let piece = self.field.active_piece().piece.down();
        self.field.set_active_piece(piece)?;
        self.lock_pending = false;
        Ok(())
    }

    /// Drops the piece as far as it goes and locks it without lock delay.
    ///
    /// Unlike a blocked gravity tick, there is no grace tick before the lock:
    /// the piece is merged and the next one spawned within this call.
    pub fn hard_drop(&mut self) -> Result<TickOutcome, IntentError> {
        self.ensure_playing()?;
        let landed = self.field.simulate_drop_position();
        self.field.set_active_piece(landed)?;
        Ok(self.complete_piece_drop())
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Starts over from any state with the current options.
    ///
    /// The field is cleared and pre-filled for the difficulty, the score and
    /// statistics reset, the fall speed goes back to its start value and a
    /// fresh current/next pair is drawn.
    pub fn restart(&mut self) {
        self.field.restart(&self.options);
        self.stats = GameStats::new();
        self.fall_speed.reset();
        self.session_state = SessionState::Playing;
        self.lock_pending = false;
        self.play_time = Duration::ZERO;
    }

    /// Sets the number of pre-filled rows used by the next [`restart`](Self::restart).
    ///
    /// Values outside `0..=10` become `0`.
    pub fn set_difficulty(&mut self, difficulty: i32) {
        self.options.difficulty = Difficulty::new(difficulty);
    }

    /// Enables or disables piece colors.
    ///
    /// Disabling repaints the field, the falling piece and the next piece with
    /// [`PieceColor::DEFAULT`]. Enabling only affects pieces drawn afterwards.
    pub fn set_colors_enabled(&mut self, enabled: bool) {
        self.options.colors_enabled = enabled;
        if !enabled {
            self.field.recolor(PieceColor::DEFAULT);
        }
    }

    /// Enables or disables fall acceleration. Disabling resets the interval.
    pub fn set_accelerate(&mut self, accelerate: bool) {
        self.options.accelerate = accelerate;
        self.fall_speed.set_accelerate(accelerate);
    }

    /// Captures the state needed to resume this game later.
    #[must_use]
    pub fn save(&self) -> SavedGame {
        SavedGame {
            active_piece: *self.field.active_piece(),
            next_piece: *self.field.next_piece(),
            field: self.field.field().cells().to_vec(),
            score: self.stats.score(),
        }
    }

    /// Replaces the current game with a saved one and resumes playing.
    ///
    /// The saved field must satisfy the field invariants and the active piece
    /// must be at a legal placement; otherwise the session is left untouched.
    /// Statistics other than the score start from zero. If colors are
    /// disabled, the restored cells and pieces are repainted with the default
    /// color.
    pub fn load(&mut self, saved: SavedGame) -> Result<(), LoadError> {
        let field = Field::from_cells(saved.field).map_err(LoadError::Field)?;
        if !field.is_legal(saved.active_piece.piece) {
            return Err(LoadError::ActivePieceCollision);
        }

        self.field.restore(field, saved.active_piece, saved.next_piece);
        if !self.options.colors_enabled {
            self.field.recolor(PieceColor::DEFAULT);
        }
        self.stats = GameStats::with_score(saved.score);
        self.fall_speed.reset();
        self.session_state = SessionState::Playing;
        self.lock_pending = false;
        self.play_time = Duration::ZERO;
        Ok(())
    }

    fn ensure_playing(&self) -> Result<(), IntentError> {
        if self.session_state.is_playing() {
            Ok(())
        } else {
            Err(IntentError::NotPlaying)
        }
    }

    fn complete_piece_drop(&mut self) -> TickOutcome {
        self.lock_pending = false;
        let (cleared_lines, result) = self
            .field
            .complete_piece_drop(self.options.colors_enabled);
        let score_delta = self.stats.complete_piece_drop(cleared_lines);
        if result.is_err() {
            self.session_state = SessionState::GameOver;
            return TickOutcome::GameOver;
        }
        TickOutcome::Locked {
            cleared_lines,
            score_delta,
        }
    }
}

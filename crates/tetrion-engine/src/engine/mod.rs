//! Game engine logic and state management.
//!
//! This module orchestrates the core data structures into a playable game:
//!
//! - [`GameField`] - Single-turn state (field, falling piece, next piece)
//! - [`GameSession`] - Fall/lock state machine, session state, options and persistence
//! - [`GameStats`] - Score, cleared rows and locked pieces
//! - [`FallSpeed`] - Tick interval derived from play time
//! - [`Randomizer`] - Piece kinds, non-repeating colors and difficulty rows
//! - [`PieceSeed`] - Seed for deterministic generation
//! - [`GameOptions`] - Difficulty, colors and acceleration
//! - [`SavedGame`] - Format-agnostic snapshot for save/load
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] (pre-filled per difficulty)
//! 2. The scheduler calls [`GameSession::tick`]; the piece descends, waits
//!    out one tick of lock delay on contact, then locks
//! 3. Full rows are cleared, the score grows and the next piece spawns
//! 4. Repeat until a spawned piece overlaps the field (game over)
//!
//! # Example
//!
//! ```
//! use tetrion_engine::{GameOptions, GameSession, PieceSeed, TickOutcome};
//!
//! let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let mut session = GameSession::with_seed(seed, GameOptions::default());
//!
//! // Steer, then let gravity do the rest
//! _ = session.try_move_right();
//! loop {
//!     match session.tick() {
//!         TickOutcome::Locked { .. } => break,
//!         TickOutcome::GameOver => unreachable!(),
//!         _ => {}
//!     }
//! }
//! assert_eq!(session.stats().completed_pieces(), 1);
//! assert_eq!(session.field().len(), 4);
//! ```

pub use self::{
    fall_speed::*, game_field::*, game_session::*, game_stats::*, options::*, randomizer::*,
    saved_game::*, snapshot::{PREVIEW_ORIGIN, RenderCell},
};

mod fall_speed;
mod game_field;
mod game_session;
mod game_stats;
mod options;
mod randomizer;
mod saved_game;
mod snapshot;

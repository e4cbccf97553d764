//! Falling-block puzzle engine.
//!
//! - [`core`]: piece shapes, colors and the locked-cell field with its
//!   legality and row-clear rules
//! - [`engine`]: randomizer, fall speed, the fall/lock state machine,
//!   options, render snapshots and saved games
//!
//! The engine never reads a clock or touches the terminal. A front end drives
//! it by calling [`GameSession::tick`] every [`GameSession::tick_interval`],
//! forwarding player intents, and drawing [`GameSession::render_cells`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting active piece")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CompletePieceDropError {
    #[display("new piece colliding at spawn position")]
    NewPieceCollision,
}

/// Why a player intent (move, rotate, drop) had no effect.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum IntentError {
    #[display("piece colliding when applying intent")]
    PieceCollision(PieceCollisionError),
    #[display("intent ignored while not playing")]
    NotPlaying,
}

impl From<PieceCollisionError> for IntentError {
    fn from(err: PieceCollisionError) -> Self {
        Self::PieceCollision(err)
    }
}

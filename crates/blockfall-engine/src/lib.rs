//! Falling-block puzzle engine.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - data: piece shapes and rotation, the piece catalog, and the
//!   playfield grid with collision detection and line clearing.
//! - [`engine`] - behavior: the game state machine that spawns, moves, drops
//!   and locks pieces, together with its configuration, statistics and timer.
//!
//! Rendering, input mapping and frame pacing are left to the caller, which
//! reads state through the query methods of [`GameState`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Returned when a candidate piece placement overlaps a wall, the floor or a
/// locked cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with playfield")]
pub struct PieceCollisionError;

/// Reason a command left the game state untouched.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::From,
    derive_more::IsVariant,
)]
pub enum ActionError {
    #[display("{_0}")]
    #[from]
    PieceCollision(PieceCollisionError),
    #[display("game is over")]
    GameOver,
    #[display("game is paused")]
    Paused,
}

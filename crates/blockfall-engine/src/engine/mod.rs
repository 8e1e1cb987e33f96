//! Game behavior built on top of [`core`](crate::core) data.
//!
//! - [`GameState`] - the game state machine: falling and next piece, locking,
//!   line clearing, scoring, pause and game over
//! - [`GameConfig`] - playfield size, fall interval and seed for one game
//! - [`Piece`] - a shape placed on the playfield with its catalog index
//! - [`PieceGenerator`] - uniform random piece source driven by a [`PieceSeed`]
//! - [`FallTimer`] - automatic fall schedule driven by caller supplied instants
//! - [`GameStats`] - score, locked pieces and cleared lines
//!
//! # Game Flow
//!
//! 1. Create a [`GameState`] from a [`GameConfig`]; the first piece spawns
//!    at the top center of an empty playfield
//! 2. Every frame, call [`GameState::advance_time`] with the current instant
//! 3. Apply player commands as they arrive (move, rotate, soft or hard drop)
//! 4. When a piece cannot fall further it locks, full rows are cleared and
//!    scored, and the next piece spawns
//! 5. The game ends when a freshly spawned piece collides; call
//!    [`GameState::reset`] to start over

pub use self::{
    config::*, fall_timer::*, game_state::*, game_stats::*, piece::*, piece_generator::*,
};

mod config;
mod fall_timer;
mod game_state;
mod game_stats;
mod piece;
mod piece_generator;

use std::{mem, time::Instant};

use rand::Rng as _;

use crate::{
    ActionError, PieceCollisionError,
    core::{catalog::PieceCatalog, playfield::Playfield},
};

use super::{
    config::{ConfigError, GameConfig},
    fall_timer::FallTimer,
    game_stats::GameStats,
    piece::Piece,
    piece_generator::{PieceGenerator, PieceSeed},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Result of locking a piece into the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    /// Rows removed by this lock.
    pub cleared_lines: usize,
    /// Points added to the score by this lock.
    pub score_delta: usize,
    /// Whether the piece spawned after this lock collided, ending the game.
    pub game_over: bool,
}

/// Result of a single-row drop attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved one row down.
    Moved,
    /// The piece could not move and was locked instead.
    Locked(LockReport),
}

/// A single game: playfield, falling and next pieces, score and fall timer.
///
/// Every command either applies completely or returns an [`ActionError`]
/// with the state untouched. Once a spawned piece collides the game is
/// over and all commands except [`reset`](Self::reset) are rejected.
///
/// Time never comes from a clock inside the engine; commands that depend on
/// it take the current [`Instant`] from the caller.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use blockfall_engine::{DropOutcome, GameConfig, GameState, PieceSeed};
///
/// let start = Instant::now();
/// let config = GameConfig {
///     seed: Some(PieceSeed::from_u64(42)),
///     ..GameConfig::default()
/// };
/// let mut game = GameState::new(config, start).unwrap();
///
/// game.try_move_left().unwrap();
/// let outcome = game.advance_time(start + Duration::from_millis(500)).unwrap();
/// assert_eq!(outcome, Some(DropOutcome::Moved));
///
/// let report = game.hard_drop(start + Duration::from_millis(600)).unwrap();
/// assert_eq!(report.cleared_lines, 0);
/// assert_eq!(game.stats().completed_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    generator: PieceGenerator,
    playfield: Playfield,
    falling_piece: Piece,
    next_piece: Piece,
    stats: GameStats,
    session_state: SessionState,
    timer: FallTimer,
}

impl GameState {
    /// Starts a game with the standard seven-piece catalog.
    pub fn new(config: GameConfig, now: Instant) -> Result<Self, ConfigError> {
        Self::with_catalog(config, PieceCatalog::standard(), now)
    }

    /// Starts a game drawing pieces from `catalog`.
    pub fn with_catalog(
        config: GameConfig,
        catalog: PieceCatalog,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        config.validate(&catalog)?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut generator = PieceGenerator::new(catalog, seed);
        let falling_piece = generator.next_piece(config.width);
        let next_piece = generator.next_piece(config.width);
        tracing::info!(
            %seed,
            width = config.width,
            height = config.height,
            fall_interval = ?config.fall_interval,
            "game started"
        );
        Ok(Self {
            playfield: Playfield::new(config.width, config.height),
            timer: FallTimer::new(config.fall_interval, now),
            config,
            generator,
            falling_piece,
            next_piece,
            stats: GameStats::new(),
            session_state: SessionState::Playing,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &PieceCatalog {
        self.generator.catalog()
    }

    /// Seed of the current game's piece sequence.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.generator.seed()
    }

    #[must_use]
    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    /// Where the falling piece would lock if hard-dropped now.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.falling_piece.simulate_drop_position(&self.playfield)
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.session_state.is_game_over()
    }

    #[must_use]
    pub fn fall_timer(&self) -> &FallTimer {
        &self.timer
    }

    pub fn try_move_left(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        let piece = self.falling_piece.left();
        self.set_falling_piece(piece)?;
        Ok(())
    }

    pub fn try_move_right(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        let piece = self.falling_piece.right();
        self.set_falling_piece(piece)?;
        Ok(())
    }

    /// Rotates clockwise, falling back to a one column kick right, then left.
    pub fn try_rotate(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;
        let piece = self
            .falling_piece
            .kicked_rotation(&self.playfield)
            .ok_or(PieceCollisionError)?;
        self.falling_piece = piece;
        Ok(())
    }

    /// Moves the piece one row down, or locks it where it is.
    ///
    /// Restarts the fall timer either way.
    pub fn soft_drop(&mut self, now: Instant) -> Result<DropOutcome, ActionError> {
        self.ensure_playing()?;
        let outcome = self.step_down();
        self.timer.mark_advanced(now);
        Ok(outcome)
    }

    /// Drops the piece to its landing row and locks it.
    pub fn hard_drop(&mut self, now: Instant) -> Result<LockReport, ActionError> {
        self.ensure_playing()?;
        // Each step strictly increases the row, so the field height bounds the loop.
        for _ in 0..self.playfield.height() {
            let piece = self.falling_piece.down();
            if self.set_falling_piece(piece).is_err() {
                break;
            }
        }
        let report = self.lock_piece();
        self.timer.mark_advanced(now);
        Ok(report)
    }

    /// Applies the automatic fall if the fall interval has elapsed.
    ///
    /// Meant to be called once per frame. Returns `Ok(None)` when no fall was
    /// due. A late call drops the piece at most one row.
    pub fn advance_time(&mut self, now: Instant) -> Result<Option<DropOutcome>, ActionError> {
        self.ensure_playing()?;
        if !self.timer.is_due(now) {
            return Ok(None);
        }
        let outcome = self.step_down();
        self.timer.mark_advanced(now);
        Ok(Some(outcome))
    }

    /// Switches between playing and paused, returning the new state.
    ///
    /// Resuming restarts the fall timer so that time spent paused never
    /// forces a drop.
    pub fn toggle_pause(&mut self, now: Instant) -> Result<SessionState, ActionError> {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => {
                self.timer.mark_advanced(now);
                SessionState::Playing
            }
            SessionState::GameOver => return Err(ActionError::GameOver),
        };
        tracing::debug!(state = ?self.session_state, "pause toggled");
        Ok(self.session_state)
    }

    /// Discards the current game and starts a fresh one with the same
    /// configuration and catalog.
    ///
    /// A configured seed replays the same piece sequence; otherwise a new
    /// random seed is drawn.
    pub fn reset(&mut self, now: Instant) {
        let catalog = self.generator.catalog().clone();
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut generator = PieceGenerator::new(catalog, seed);
        self.falling_piece = generator.next_piece(self.config.width);
        self.next_piece = generator.next_piece(self.config.width);
        self.generator = generator;
        self.playfield = Playfield::new(self.config.width, self.config.height);
        self.stats = GameStats::new();
        self.session_state = SessionState::Playing;
        self.timer = FallTimer::new(self.config.fall_interval, now);
        tracing::info!(%seed, "game reset");
    }

    fn ensure_playing(&self) -> Result<(), ActionError> {
        match self.session_state {
            SessionState::Playing => Ok(()),
            SessionState::Paused => Err(ActionError::Paused),
            SessionState::GameOver => Err(ActionError::GameOver),
        }
    }

    fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if piece.is_colliding(&self.playfield) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    fn step_down(&mut self) -> DropOutcome {
        let piece = self.falling_piece.down();
        match self.set_falling_piece(piece) {
            Ok(()) => DropOutcome::Moved,
            Err(PieceCollisionError) => DropOutcome::Locked(self.lock_piece()),
        }
    }

    fn lock_piece(&mut self) -> LockReport {
        let piece = &self.falling_piece;
        self.playfield
            .fill_shape(piece.shape(), piece.position(), piece.color());
        let cleared_lines = self.playfield.clear_lines();
        let score_delta = self.stats.complete_piece_drop(cleared_lines);
        tracing::debug!(
            color = piece.color().get(),
            row = piece.position().row,
            col = piece.position().col,
            cleared_lines,
            score_delta,
            "piece locked"
        );

        let next = self.generator.next_piece(self.config.width);
        self.falling_piece = mem::replace(&mut self.next_piece, next);

        // The colliding piece stays in place, frozen, and is not written to the field.
        let game_over = self.falling_piece.is_colliding(&self.playfield);
        if game_over {
            self.session_state = SessionState::GameOver;
            tracing::info!(
                score = self.stats.score(),
                pieces = self.stats.completed_pieces(),
                lines = self.stats.total_cleared_lines(),
                "game over"
            );
        }
        LockReport {
            cleared_lines,
            score_delta,
            game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::core::{
        catalog::{ColorIndex, Rgb},
        playfield::{Cell, Position},
        shape::Shape,
    };

    use super::*;

    fn config(width: usize, height: usize) -> GameConfig {
        GameConfig {
            width,
            height,
            seed: Some(PieceSeed::from_u64(1)),
            ..GameConfig::default()
        }
    }

    fn dot_catalog() -> PieceCatalog {
        let dot = Shape::from_rows(&[&[true]]).unwrap();
        PieceCatalog::new(vec![dot], vec![Rgb(0, 0, 0), Rgb(255, 255, 255)]).unwrap()
    }

    fn dot_game(field: &[&[u8]], now: Instant) -> GameState {
        let playfield = Playfield::from_values(field).unwrap();
        let config = config(playfield.width(), playfield.height());
        let mut game = GameState::with_catalog(config, dot_catalog(), now).unwrap();
        game.playfield = playfield;
        game
    }

    fn filled(value: u8) -> Cell {
        Cell::Filled(ColorIndex::new(value).unwrap())
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = GameState::new(config(0, 20), Instant::now());
        assert_eq!(result.err(), Some(ConfigError::EmptyPlayfield));
    }

    #[test]
    fn test_initial_state() {
        let game = GameState::new(config(10, 20), Instant::now()).unwrap();
        assert_eq!(game.session_state(), SessionState::Playing);
        assert_eq!(game.score(), 0);
        assert!(game.playfield().rows().flatten().all(|cell| cell.is_empty()));
        assert_eq!(game.falling_piece().position().row, 0);
        assert_eq!(game.next_piece().position().row, 0);
        assert_eq!(game.seed(), PieceSeed::from_u64(1));
    }

    #[test]
    fn test_hard_drop_o_piece_on_empty_field() {
        let mut game = GameState::new(config(10, 20), Instant::now()).unwrap();
        let color = ColorIndex::new(2).unwrap();
        let o = game.catalog().template(color).unwrap().clone();
        game.falling_piece = Piece::spawned(o, color, 10);
        assert_eq!(game.falling_piece().position(), Position::new(0, 4));

        let report = game.hard_drop(Instant::now()).unwrap();
        assert_eq!(
            report,
            LockReport {
                cleared_lines: 0,
                score_delta: 0,
                game_over: false,
            }
        );
        for (row, col) in [(18, 4), (18, 5), (19, 4), (19, 5)] {
            assert_eq!(game.playfield().cell(row, col), Some(Cell::Filled(color)));
        }
        let filled_count = game
            .playfield()
            .rows()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count();
        assert_eq!(filled_count, 4);
        assert_eq!(game.score(), 0);
        assert_eq!(game.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_single_line_clear_scores_100() {
        let mut rows = vec![[0u8; 10]; 20];
        rows[19] = [0, 1, 1, 1, 1, 1, 1, 1, 1, 1];
        let rows: Vec<&[u8]> = rows.iter().map(|row| row.as_slice()).collect();
        let mut game = dot_game(&rows, Instant::now());
        assert_eq!(game.falling_piece().position(), Position::new(0, 5));

        for _ in 0..5 {
            game.try_move_left().unwrap();
        }
        let report = game.hard_drop(Instant::now()).unwrap();
        assert_eq!(report.cleared_lines, 1);
        assert_eq!(report.score_delta, 100);
        assert_eq!(game.score(), 100);
        assert!(game.playfield().rows().flatten().all(|cell| cell.is_empty()));
    }

    #[test]
    fn test_multi_line_clear_is_scored_once() {
        let mut game = dot_game(
            &[&[0, 0, 0], &[1, 0, 1], &[2, 2, 2], &[0, 1, 0], &[3, 3, 3]],
            Instant::now(),
        );
        assert_eq!(game.falling_piece().position(), Position::new(0, 1));

        let report = game.hard_drop(Instant::now()).unwrap();
        assert_eq!(report.cleared_lines, 3);
        assert_eq!(report.score_delta, 500);
        assert_eq!(game.stats().line_cleared_counter(), &[0, 0, 0, 1, 0]);

        let expected = Playfield::from_values(&[
            [0u8, 0, 0],
            [0, 0, 0],
            [0, 0, 0],
            [0, 0, 0],
            [0, 1, 0],
        ])
        .unwrap();
        assert_eq!(game.playfield(), &expected);
    }

    #[test]
    fn test_move_left_against_wall_is_idempotent() {
        let mut game = dot_game(&[&[0, 0, 0], &[0, 0, 0]], Instant::now());
        game.try_move_left().unwrap();
        assert_eq!(game.falling_piece().position(), Position::new(0, 0));
        for _ in 0..3 {
            assert_eq!(
                game.try_move_left(),
                Err(ActionError::PieceCollision(PieceCollisionError))
            );
            assert_eq!(game.falling_piece().position(), Position::new(0, 0));
        }
        game.try_move_right().unwrap();
        game.try_move_right().unwrap();
        assert!(game.try_move_right().is_err());
        assert_eq!(game.falling_piece().position(), Position::new(0, 2));
    }

    #[test]
    fn test_rotate_kicks_away_from_wall() {
        let mut game = GameState::new(config(10, 20), Instant::now()).unwrap();
        let color = ColorIndex::new(1).unwrap();
        let i = game.catalog().template(color).unwrap().clone();
        game.falling_piece = Piece::spawned(i, color, 10);

        // Upright I pushed against the right wall.
        game.try_rotate().unwrap();
        assert_eq!(game.falling_piece().shape().height(), 4);
        while game.try_move_right().is_ok() {}
        assert_eq!(game.falling_piece().position(), Position::new(0, 9));

        // Cols 9, 10 and 8 all overflow the flat I.
        let before = game.falling_piece().clone();
        assert!(game.try_rotate().unwrap_err().is_piece_collision());
        assert_eq!(game.falling_piece(), &before);

        game.try_move_left().unwrap();
        game.try_move_left().unwrap();
        game.try_rotate().unwrap();
        assert_eq!(game.falling_piece().position(), Position::new(0, 6));
        assert_eq!(game.falling_piece().shape().width(), 4);
    }

    #[test]
    fn test_soft_drop_moves_then_locks() {
        let start = Instant::now();
        let mut game = dot_game(&[&[0, 0, 0], &[0, 0, 0]], start);
        assert_eq!(game.soft_drop(start), Ok(DropOutcome::Moved));
        assert_eq!(game.falling_piece().position(), Position::new(1, 1));

        let later = start + Duration::from_millis(100);
        let outcome = game.soft_drop(later).unwrap();
        assert_eq!(
            outcome,
            DropOutcome::Locked(LockReport {
                cleared_lines: 0,
                score_delta: 0,
                game_over: false,
            })
        );
        assert_eq!(game.playfield().cell(1, 1), Some(filled(1)));
        assert_eq!(game.falling_piece().position(), Position::new(0, 1));
        assert_eq!(game.fall_timer().last_fall(), later);
    }

    #[test]
    fn test_timed_fall() {
        let start = Instant::now();
        let ms = Duration::from_millis;
        let mut game = GameState::new(config(10, 20), start).unwrap();

        assert_eq!(game.advance_time(start + ms(499)), Ok(None));
        assert_eq!(game.falling_piece().position().row, 0);
        assert_eq!(game.advance_time(start + ms(500)), Ok(Some(DropOutcome::Moved)));
        assert_eq!(game.falling_piece().position().row, 1);
        assert_eq!(game.advance_time(start + ms(999)), Ok(None));

        // A soft drop restarts the schedule.
        game.soft_drop(start + ms(900)).unwrap();
        assert_eq!(game.falling_piece().position().row, 2);
        assert_eq!(game.advance_time(start + ms(1000)), Ok(None));
        assert_eq!(game.advance_time(start + ms(1400)), Ok(Some(DropOutcome::Moved)));
        assert_eq!(game.falling_piece().position().row, 3);

        // Missed intervals yield a single fall.
        assert_eq!(game.advance_time(start + ms(10_000)), Ok(Some(DropOutcome::Moved)));
        assert_eq!(game.falling_piece().position().row, 4);
        assert_eq!(game.advance_time(start + ms(10_000)), Ok(None));
    }

    #[test]
    fn test_timed_fall_locks_at_bottom() {
        let start = Instant::now();
        let mut game = dot_game(&[&[0, 0, 0]], start);
        let outcome = game.advance_time(start + Duration::from_secs(1)).unwrap();
        assert!(outcome.is_some_and(|outcome| outcome.is_locked()));
        assert_eq!(game.playfield().cell(0, 1), Some(filled(1)));
        assert!(game.is_game_over());
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let start = Instant::now();
        let mut game = dot_game(&[&[0, 0, 0], &[0, 1, 0], &[0, 1, 0]], start);
        let report = game.hard_drop(start).unwrap();
        assert!(report.game_over);
        assert_eq!(report.cleared_lines, 0);
        assert!(game.is_game_over());

        // The new piece is not written into the field.
        let field = game.playfield().clone();
        assert_eq!(
            field,
            Playfield::from_values(&[[0u8, 1, 0], [0, 1, 0], [0, 1, 0]]).unwrap()
        );
        assert_eq!(game.falling_piece().position(), Position::new(0, 1));

        let later = start + Duration::from_secs(5);
        assert_eq!(game.try_move_left(), Err(ActionError::GameOver));
        assert_eq!(game.try_move_right(), Err(ActionError::GameOver));
        assert_eq!(game.try_rotate(), Err(ActionError::GameOver));
        assert_eq!(game.soft_drop(later), Err(ActionError::GameOver));
        assert_eq!(game.hard_drop(later), Err(ActionError::GameOver));
        assert_eq!(game.advance_time(later), Err(ActionError::GameOver));
        assert_eq!(game.toggle_pause(later), Err(ActionError::GameOver));
        assert_eq!(game.playfield(), &field);
        assert_eq!(game.falling_piece().position(), Position::new(0, 1));
        assert_eq!(game.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_pause_blocks_commands_and_time() {
        let start = Instant::now();
        let ms = Duration::from_millis;
        let mut game = GameState::new(config(10, 20), start).unwrap();
        let before = game.falling_piece().clone();

        assert_eq!(game.toggle_pause(start), Ok(SessionState::Paused));
        assert_eq!(game.try_move_left(), Err(ActionError::Paused));
        assert_eq!(game.advance_time(start + ms(10_000)), Err(ActionError::Paused));
        assert_eq!(game.hard_drop(start + ms(10_000)), Err(ActionError::Paused));
        assert_eq!(game.falling_piece(), &before);

        assert_eq!(game.toggle_pause(start + ms(10_000)), Ok(SessionState::Playing));
        assert_eq!(game.advance_time(start + ms(10_499)), Ok(None));
        assert_eq!(game.advance_time(start + ms(10_500)), Ok(Some(DropOutcome::Moved)));
    }

    #[test]
    fn test_reset_starts_fresh_game() {
        let start = Instant::now();
        let mut game = GameState::new(config(10, 20), start).unwrap();
        let first = game.falling_piece().clone();
        let second = game.next_piece().clone();
        while !game.is_game_over() {
            game.hard_drop(start).unwrap();
        }
        assert!(game.stats().completed_pieces() > 0);

        let later = start + Duration::from_secs(60);
        game.reset(later);
        assert_eq!(game.session_state(), SessionState::Playing);
        assert_eq!(game.stats(), &GameStats::new());
        assert!(game.playfield().rows().flatten().all(|cell| cell.is_empty()));
        assert_eq!(game.fall_timer().last_fall(), later);
        // The configured seed replays the same sequence.
        assert_eq!(game.falling_piece(), &first);
        assert_eq!(game.next_piece(), &second);
    }

    #[test]
    fn test_same_seed_same_game() {
        let start = Instant::now();
        let mut a = GameState::new(config(10, 20), start).unwrap();
        let mut b = GameState::new(config(10, 20), start).unwrap();
        for _ in 0..10 {
            assert_eq!(a.falling_piece(), b.falling_piece());
            assert_eq!(a.hard_drop(start), b.hard_drop(start));
        }
        assert_eq!(a.playfield(), b.playfield());
    }

    #[test]
    fn test_ghost_piece_marks_landing_row() {
        let mut game = dot_game(&[&[0, 0, 0], &[0, 0, 0], &[0, 0, 0], &[0, 2, 0]], Instant::now());
        assert_eq!(game.ghost_piece().position(), Position::new(2, 1));
        game.try_move_left().unwrap();
        assert_eq!(game.ghost_piece().position(), Position::new(3, 0));
        assert_eq!(game.falling_piece().position(), Position::new(0, 0));
    }
}

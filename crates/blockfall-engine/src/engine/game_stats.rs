/// Score values for line clears.
///
/// Index corresponds to number of lines cleared by one lock:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 or more lines: 800 points
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Points awarded for clearing `cleared_lines` rows with a single lock.
///
/// Clears of four or more rows (possible on custom catalogs) score as four.
#[must_use]
pub const fn score_for_lines(cleared_lines: usize) -> usize {
    let i = if cleared_lines < SCORE_TABLE.len() {
        cleared_lines
    } else {
        SCORE_TABLE.len() - 1
    };
    SCORE_TABLE[i]
}

/// Game statistics tracking score, lines cleared, and piece count.
///
/// - **Score**: Points earned from line clears, never decreasing
/// - **Completed pieces**: Total number of pieces locked
/// - **Line clear distribution**: Count of locks by rows cleared
///
/// There is no level, combo or back-to-back bonus.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 800);
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
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// - `[0]`: locks clearing nothing
    /// - `[1]`..`[3]`: singles, doubles, triples
    /// - `[4]`: four or more rows at once
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records a lock that cleared `cleared_lines` rows and returns the points earned.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) -> usize {
        let points = score_for_lines(cleared_lines);
        let bucket = if cleared_lines < self.line_cleared_counter.len() {
            cleared_lines
        } else {
            self.line_cleared_counter.len() - 1
        };
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.line_cleared_counter[bucket] += 1;
        self.score += points;
        points
    }
}

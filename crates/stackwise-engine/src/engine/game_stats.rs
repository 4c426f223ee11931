use serde::Serialize;

/// Base points for line clears, indexed by the number of lines cleared at once.
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Lines needed to advance one level.
const LINES_PER_LEVEL: usize = 10;

/// Score, level and line-clear statistics of a game.
///
/// Line clears are worth their base points multiplied by the level at the
/// time of the clear. The level starts at 1 and rises every ten lines.
///
/// # Example
///
/// ```
/// use stackwise_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
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

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.total_cleared_lines / LINES_PER_LEVEL + 1
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of drops by lines cleared, `[0]` being drops that cleared nothing.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records a locked piece and the lines it cleared.
    ///
    /// # Panics
    ///
    /// Panics if more than four lines are reported.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        assert!(cleared_lines < SCORE_TABLE.len(), "cannot clear {cleared_lines} lines at once");
        self.score += SCORE_TABLE[cleared_lines] * self.level();
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.line_cleared_counter[cleared_lines] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_scales_with_level() {
        let mut stats = GameStats::new();
        for _ in 0..2 {
            stats.complete_piece_drop(4);
        }
        stats.complete_piece_drop(1);
        assert_eq!(stats.total_cleared_lines(), 9);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.score(), 1700);

        // The clear that reaches ten lines still scores at the old level.
        stats.complete_piece_drop(2);
        assert_eq!(stats.level(), 2);
        assert_eq!(stats.score(), 2000);

        stats.complete_piece_drop(3);
        assert_eq!(stats.score(), 3000);
        stats.complete_piece_drop(0);
        assert_eq!(stats.completed_pieces(), 6);
        assert_eq!(stats.line_cleared_counter(), &[1, 1, 1, 1, 2]);
    }
}

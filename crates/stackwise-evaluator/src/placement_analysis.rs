//! Analysis of the board left behind by one placement.
//!
//! [`PlacementAnalysis`] pairs a simulated drop (lines cleared, resting row)
//! with a lazily evaluated [`BoardAnalysis`] of the resulting board.

use stackwise_engine::{Board, Placement, PlacementError, SimOutcome};

use crate::board_analysis::BoardAnalysis;

#[derive(Debug)]
pub struct PlacementAnalysis {
    placement: Placement,
    cleared_lines: usize,
    resting_row: usize,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    /// Simulates `placement` on `before_placement` and analyzes the result.
    pub fn from_board(
        before_placement: &Board,
        placement: Placement,
    ) -> Result<Self, PlacementError> {
        let outcome = placement.simulate(before_placement)?;
        Ok(Self::from_outcome(placement, outcome))
    }

    #[must_use]
    pub fn from_outcome(placement: Placement, outcome: SimOutcome) -> Self {
        let SimOutcome {
            board,
            lines_cleared,
            resting_row,
        } = outcome;
        Self {
            placement,
            cleared_lines: lines_cleared,
            resting_row,
            board_analysis: BoardAnalysis::new(board),
        }
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub fn resting_row(&self) -> usize {
        self.resting_row
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.board_analysis.board()
    }

    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }

    /// Rebuilds the simulation outcome this analysis was made from.
    #[must_use]
    pub fn to_outcome(&self) -> SimOutcome {
        SimOutcome {
            board: self.board().clone(),
            lines_cleared: self.cleared_lines,
            resting_row: self.resting_row,
        }
    }
}

//! Heuristic scoring of boards and placements.
//!
//! The score is a weighted sum of the eleven [`Metric`](crate::metrics::Metric)s:
//!
//! ```text
//! score = Σ weight[metric] × value[metric]
//! ```
//!
//! Higher is better. All metrics are computed on every call and reported
//! alongside the score.

use serde::Serialize;
use stackwise_engine::Board;

use crate::{
    board_analysis::BoardAnalysis, metrics::MetricValues, placement_analysis::PlacementAnalysis,
    weights::WeightProfile,
};

/// A score together with the metric values that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub score: f32,
    pub metrics: MetricValues,
}

impl EvaluationResult {
    #[must_use]
    pub fn new(metrics: MetricValues, weights: &WeightProfile) -> Self {
        Self {
            score: weights.score(&metrics),
            metrics,
        }
    }
}

/// Scores a board as it stands.
///
/// With no placement to credit, complete lines are the board's full rows.
///
/// # Example
///
/// ```
/// use stackwise_engine::Board;
/// use stackwise_evaluator::{evaluator::evaluate, weights::WeightProfile};
///
/// let result = evaluate(&Board::new(10, 20), &WeightProfile::NORMAL);
/// assert_eq!(result.metrics.holes, 0.0);
/// assert!(result.score < 0.0);
/// ```
#[must_use]
pub fn evaluate(board: &Board, weights: &WeightProfile) -> EvaluationResult {
    let analysis = BoardAnalysis::from_board(board);
    EvaluationResult::new(MetricValues::measure(&analysis, board.full_rows()), weights)
}

/// Scores the board left by a placement, crediting the lines it cleared.
#[must_use]
pub fn evaluate_placement(
    analysis: &PlacementAnalysis,
    weights: &WeightProfile,
) -> EvaluationResult {
    let metrics = MetricValues::measure(analysis.board_analysis(), analysis.cleared_lines());
    EvaluationResult::new(metrics, weights)
}

#[cfg(test)]
mod tests {
    use stackwise_engine::{PieceKind, Placement, Rotation};

    use super::*;

    #[test]
    fn test_evaluate_counts_full_rows_as_lines() {
        let board = Board::from_ascii(
            "
            ....
            ....
            ####
            #.##
            ",
        );
        let result = evaluate(&board, &WeightProfile::NORMAL);
        assert_eq!(result.metrics.complete_lines, 1.0);
        assert_eq!(result.metrics.holes, 1.0);
        assert_eq!(result.metrics.pits, 0.0);
    }

    #[test]
    fn test_score_is_weighted_sum() {
        let board = Board::from_ascii(
            "
            .....
            .....
            #....
            ##.#.
            ",
        );
        let result = evaluate(&board, &WeightProfile::NORMAL);
        let m = result.metrics;
        let w = WeightProfile::NORMAL;
        let expected = w.aggregate_height * m.aggregate_height
            + w.holes * m.holes
            + w.bumpiness * m.bumpiness
            + w.complete_lines * m.complete_lines
            + w.max_height * m.max_height
            + w.wells * m.wells
            + w.row_transitions * m.row_transitions
            + w.column_transitions * m.column_transitions
            + w.pits * m.pits
            + w.i_well_quality * m.i_well_quality
            + w.clear_readiness * m.clear_readiness;
        assert!((result.score - expected).abs() < 1e-4);
    }

    #[test]
    fn test_placement_credits_cleared_lines() {
        let board = Board::from_ascii(
            "
            ......
            #####.
            #####.
            #####.
            #####.
            ",
        );
        let placement = Placement::new(PieceKind::I, Rotation::from_index(1), 5);
        let analysis = PlacementAnalysis::from_board(&board, placement).unwrap();
        let result = evaluate_placement(&analysis, &WeightProfile::NORMAL);
        assert_eq!(analysis.cleared_lines(), 4);
        assert_eq!(result.metrics.complete_lines, 4.0);
        assert_eq!(result.metrics.aggregate_height, 0.0);
        assert!(result.score > evaluate(&board, &WeightProfile::NORMAL).score);
    }

    #[test]
    fn test_pits_are_penalized_beyond_holes() {
        let shallow = Board::from_ascii(
            "
            ....
            ....
            #...
            .###
            ",
        );
        let deep = Board::from_ascii(
            "
            ....
            #...
            #...
            .###
            ",
        );
        let shallow = evaluate(&shallow, &WeightProfile::NORMAL);
        let deep = evaluate(&deep, &WeightProfile::NORMAL);
        assert_eq!((shallow.metrics.holes, shallow.metrics.pits), (1.0, 0.0));
        assert_eq!((deep.metrics.holes, deep.metrics.pits), (1.0, 1.0));
        assert!(deep.score < shallow.score);
    }
}

//! Property tests for the evaluator and the search.

use proptest::prelude::*;
use stackwise_engine::{Board, PieceKind};
use stackwise_evaluator::{
    board_analysis::BoardAnalysis,
    evaluator::evaluate,
    lookahead::choose_best_placement,
    weights::{Mode, select_mode, weights_for},
};

/// Board with a random bottom region, so that most cases are still playable.
fn stacked_board() -> impl Strategy<Value = Board> {
    (4usize..=10, 8usize..=20)
        .prop_flat_map(|(w, h)| {
            let full = (1u32 << w) - 1;
            (Just((w, h)), prop::collection::vec(0..=full, h / 2))
        })
        .prop_map(|((w, h), rows)| {
            let mut board = Board::new(w, h);
            let top = h - rows.len();
            for (i, bits) in rows.into_iter().enumerate() {
                let y = i32::try_from(top + i).unwrap();
                let cells = (0..w)
                    .filter(|x| bits & (1 << x) != 0)
                    .map(|x| (i32::try_from(x).unwrap(), y));
                board.fill_cells(cells);
            }
            board
        })
}

fn any_kind() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn pits_never_exceed_holes(board in stacked_board()) {
        let analysis = BoardAnalysis::from_board(&board);
        prop_assert!(analysis.num_pits() <= analysis.num_holes());
        prop_assert_eq!(analysis.num_holes(), board.count_holes());

        let result = evaluate(&board, weights_for(Mode::Normal));
        prop_assert!(result.metrics.pits <= result.metrics.holes);
        prop_assert!(result.score.is_finite());
    }

    #[test]
    fn mode_follows_fill_fraction(board in stacked_board()) {
        let panic = board.occupied_cells() * 10 > board.total_cells() * 6;
        prop_assert_eq!(select_mode(&board).is_panic(), panic);
    }

    #[test]
    fn search_is_deterministic(board in stacked_board(), active in any_kind(), next in any_kind()) {
        let first = choose_best_placement(&board, active, next);
        let again = choose_best_placement(&board, active, next);
        prop_assert_eq!(first, again);
    }
}

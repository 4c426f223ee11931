//! Two-piece lookahead: choosing where the active piece goes.
//!
//! # How It Works
//!
//! 1. **Select weights** - the board's [`Mode`] picks a [`WeightProfile`]
//! 2. **Enumerate** - every rotation of the active piece, then every column
//!    where it fits
//! 3. **Look ahead** - for each resulting board, every placement of the next
//!    piece is scored and the best one kept
//! 4. **Select** - the highest `first + best second` score wins; ties go to
//!    the candidate enumerated first
//!
//! With [`SearchDepth::Single`], step 3 is skipped and candidates are ranked
//! by their own score.
//!
//! A placement that tops out is a losing move. It is only chosen when every
//! candidate tops out, and the decision then says so.
//!
//! At most `4 × width` placements per level are simulated, so a decision costs
//! at most `(4 × width)²` drops and needs no pruning.
//!
//! # Example
//!
//! ```
//! use stackwise_engine::{Board, PieceKind, Rotation};
//! use stackwise_evaluator::lookahead::choose_best_placement;
//!
//! let board = Board::new(10, 20);
//! let placement = choose_best_placement(&board, PieceKind::O, PieceKind::O).unwrap();
//! assert_eq!(placement.rotation, Rotation::SPAWN);
//! ```

use serde::Serialize;
use stackwise_engine::{Board, PieceKind, Placement, PlacementError, SimOutcome};

use crate::{
    evaluator::{EvaluationResult, evaluate_placement},
    placement_analysis::PlacementAnalysis,
    weights::{Mode, WeightConfig, WeightProfile, select_mode},
};

/// Score given to a branch that cannot avoid topping out.
pub const LOSING_SCORE: f32 = -1.0e6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EngineError {
    #[display("no legal placement for {kind}-piece")]
    NoLegalPlacement { kind: PieceKind },
}

/// How many pieces the search places before scoring.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SearchDepth {
    /// Only the active piece; the next piece is ignored.
    Single,
    /// The active piece and the best reply of the next one.
    #[default]
    TwoPiece,
}

/// A scored first-level placement.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub placement: Placement,
    /// Evaluation of the board after this placement; `None` when it tops out.
    pub evaluation: Option<EvaluationResult>,
    /// Best placement of the next piece, if any survives.
    pub follow_up: Option<Placement>,
    /// First-level score plus the best second-level score, or the first-level
    /// score alone at [`SearchDepth::Single`].
    pub combined_score: f32,
}

impl Candidate {
    #[must_use]
    pub fn is_top_out(&self) -> bool {
        self.evaluation.is_none()
    }
}

/// The chosen placement and how it was chosen.
#[derive(Debug, Clone)]
pub struct Decision {
    pub placement: Placement,
    pub combined_score: f32,
    pub mode: Mode,
    /// Every candidate topped out; this move ends the game.
    pub losing: bool,
    /// Simulated result of the placement, absent for a losing move.
    pub outcome: Option<SimOutcome>,
}

/// Lookahead search over a pair of weight profiles.
#[derive(Debug, Clone, Default)]
pub struct LookaheadSearch {
    weights: WeightConfig,
    depth: SearchDepth,
}

impl LookaheadSearch {
    #[must_use]
    pub fn new(weights: WeightConfig) -> Self {
        Self {
            weights,
            depth: SearchDepth::TwoPiece,
        }
    }

    #[must_use]
    pub fn with_depth(self, depth: SearchDepth) -> Self {
        Self { depth, ..self }
    }

    #[must_use]
    pub fn weights(&self) -> &WeightConfig {
        &self.weights
    }

    #[must_use]
    pub fn depth(&self) -> SearchDepth {
        self.depth
    }

    /// Scores every placement of `active` in enumeration order.
    ///
    /// `next` is only looked at with [`SearchDepth::TwoPiece`].
    #[must_use]
    pub fn rank_placements(
        &self,
        board: &Board,
        active: PieceKind,
        next: PieceKind,
    ) -> Vec<Candidate> {
        let weights = self.weights.weights_for(select_mode(board));
        legal_placements(board, active)
            .map(|(placement, analysis)| {
                let Some(analysis) = analysis else {
                    return Candidate {
                        placement,
                        evaluation: None,
                        follow_up: None,
                        combined_score: LOSING_SCORE,
                    };
                };
                let evaluation = evaluate_placement(&analysis, weights);
                let (follow_up, second_score) = match self.depth {
                    SearchDepth::Single => (None, 0.0),
                    SearchDepth::TwoPiece => best_follow_up(analysis.board(), next, weights)
                        .map_or((None, LOSING_SCORE), |(p, score)| (Some(p), score)),
                };
                Candidate {
                    placement,
                    evaluation: Some(evaluation),
                    follow_up,
                    combined_score: evaluation.score + second_score,
                }
            })
            .collect()
    }

    /// Chooses the placement of `active`, knowing `next` comes after it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoLegalPlacement`] if `active` fits nowhere on
    /// the board.
    pub fn decide(
        &self,
        board: &Board,
        active: PieceKind,
        next: PieceKind,
    ) -> Result<Decision, EngineError> {
        let mode = select_mode(board);
        let candidates = self.rank_placements(board, active, next);

        let best = candidates
            .iter()
            .filter(|c| !c.is_top_out())
            .fold(None::<&Candidate>, |best, c| match best {
                Some(b) if b.combined_score >= c.combined_score => Some(b),
                _ => Some(c),
            });

        let decision = match best {
            Some(best) => Decision {
                placement: best.placement,
                combined_score: best.combined_score,
                mode,
                losing: false,
                outcome: best.placement.simulate(board).ok(),
            },
            None => {
                let first = candidates
                    .first()
                    .ok_or(EngineError::NoLegalPlacement { kind: active })?;
                tracing::debug!(placement = %first.placement, "every placement tops out");
                Decision {
                    placement: first.placement,
                    combined_score: LOSING_SCORE,
                    mode,
                    losing: true,
                    outcome: None,
                }
            }
        };

        tracing::debug!(
            %mode,
            depth = ?self.depth,
            placement = %decision.placement,
            score = decision.combined_score,
            candidates = candidates.len(),
            "decided placement"
        );
        Ok(decision)
    }

    /// Like [`Self::decide`], returning only the placement.
    pub fn choose_best_placement(
        &self,
        board: &Board,
        active: PieceKind,
        next: PieceKind,
    ) -> Result<Placement, EngineError> {
        self.decide(board, active, next).map(|d| d.placement)
    }
}

/// Chooses the placement of `active` with the built-in weight profiles.
///
/// The result depends only on the arguments.
///
/// # Errors
///
/// Returns [`EngineError::NoLegalPlacement`] if `active` fits nowhere on the
/// board.
pub fn choose_best_placement(
    board: &Board,
    active: PieceKind,
    next: PieceKind,
) -> Result<Placement, EngineError> {
    LookaheadSearch::default().choose_best_placement(board, active, next)
}

/// Placements of `kind` that fit horizontally, each with its analysis or
/// `None` when it tops out.
fn legal_placements(
    board: &Board,
    kind: PieceKind,
) -> impl Iterator<Item = (Placement, Option<PlacementAnalysis>)> + '_ {
    Placement::enumerate(kind, board.width()).filter_map(move |placement| {
        match PlacementAnalysis::from_board(board, placement) {
            Ok(analysis) => Some((placement, Some(analysis))),
            Err(PlacementError::TopOut) => Some((placement, None)),
            Err(PlacementError::ColumnOutOfRange { .. }) => None,
        }
    })
}

fn best_follow_up(
    board: &Board,
    kind: PieceKind,
    weights: &WeightProfile,
) -> Option<(Placement, f32)> {
    legal_placements(board, kind)
        .filter_map(|(placement, analysis)| {
            analysis.map(|a| (placement, evaluate_placement(&a, weights).score))
        })
        .fold(None, |best, (placement, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((placement, score)),
        })
}

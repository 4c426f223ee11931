use std::path::PathBuf;

use serde::Serialize;
use stackwise_engine::{PieceKind, Placement};
use stackwise_evaluator::{lookahead::Candidate, weights::Mode};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DecideArg {
    /// Board file: one line per row, `#` for occupied and `.` for empty
    board_path: PathBuf,
    /// Kind of the piece to place (I, O, T, S, Z, J or L)
    #[arg(long)]
    active: PieceKind,
    /// Kind of the piece that comes after it
    #[arg(long)]
    next: PieceKind,
    /// Number of ranked candidates to report
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Place only the active piece, ignoring the next one
    #[arg(long)]
    no_lookahead: bool,
    /// Weight profiles (JSON) to use instead of the built-in ones
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DecisionReport {
    mode: Mode,
    placement: Placement,
    combined_score: f32,
    losing: bool,
    lines_cleared: usize,
    board_after: Vec<String>,
    candidates: Vec<Candidate>,
}

pub(crate) fn run(arg: &DecideArg) -> anyhow::Result<()> {
    let DecideArg {
        board_path,
        active,
        next,
        top,
        no_lookahead,
        weights,
        output,
    } = arg;

    let board = util::read_board_file(board_path)?;
    let search = util::build_search(weights.as_deref(), *no_lookahead)?;

    let decision = search.decide(&board, *active, *next)?;
    let mut candidates = search.rank_placements(&board, *active, *next);
    candidates.sort_by(|a, b| b.combined_score.total_cmp(&a.combined_score));
    candidates.truncate(*top);

    let report = DecisionReport {
        mode: decision.mode,
        placement: decision.placement,
        combined_score: decision.combined_score,
        losing: decision.losing,
        lines_cleared: decision.outcome.as_ref().map_or(0, |o| o.lines_cleared),
        board_after: decision
            .outcome
            .as_ref()
            .map(|o| util::board_lines(&o.board))
            .unwrap_or_default(),
        candidates,
    };
    util::write_json(&report, output.as_deref())?;
    Ok(())
}

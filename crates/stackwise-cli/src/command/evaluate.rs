use std::path::PathBuf;

use serde::Serialize;
use stackwise_evaluator::{
    board_analysis::BoardAnalysis,
    evaluator::{EvaluationResult, evaluate},
    weights::{Mode, select_mode},
};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Board file: one line per row, `#` for occupied and `.` for empty
    board_path: PathBuf,
    /// Weight profiles (JSON) to use instead of the built-in ones
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BoardReport {
    mode: Mode,
    fill_fraction: f32,
    i_well_column: Option<usize>,
    evaluation: EvaluationResult,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        board_path,
        weights,
        output,
    } = arg;

    let board = util::read_board_file(board_path)?;
    let weights = util::read_weights(weights.as_deref())?;

    let mode = select_mode(&board);
    let report = BoardReport {
        mode,
        fill_fraction: board.fill_fraction(),
        i_well_column: BoardAnalysis::from_board(&board).i_well().column,
        evaluation: evaluate(&board, weights.weights_for(mode)),
    };
    util::write_json(&report, output.as_deref())?;
    Ok(())
}

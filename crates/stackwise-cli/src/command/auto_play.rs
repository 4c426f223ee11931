use std::path::PathBuf;

use serde::Serialize;
use stackwise_engine::{GameSession, GameStats, PieceGenerator, PieceRule};
use stackwise_evaluator::{auto_play::AutoPlayer, weights::Mode};

use crate::{board_size::BoardSizeArg, util};

const PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    #[clap(flatten)]
    board_size: BoardSizeArg,
    /// Seed for the piece sequence; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// How piece kinds are drawn (`uniform` or `bag7`)
    #[arg(long, default_value = "uniform")]
    rule: PieceRule,
    /// Stop after this many pieces even if the game is not over
    #[arg(long, default_value_t = 1000)]
    pieces: usize,
    /// Simulated frames per second, which sets the gravity speed
    #[arg(long, default_value_t = 60)]
    fps: u64,
    /// Place only the active piece, ignoring the next one
    #[arg(long)]
    no_lookahead: bool,
    /// Weight profiles (JSON) to use instead of the built-in ones
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Output file path for the JSON summary
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct AutoPlaySummary<'a> {
    seed: u64,
    rule: PieceRule,
    width: usize,
    height: usize,
    game_over: bool,
    level: usize,
    stats: &'a GameStats,
    frames: u64,
    mode_switches: usize,
    final_mode: Option<Mode>,
    board: Vec<String>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        board_size,
        seed,
        rule,
        pieces,
        fps,
        no_lookahead,
        weights,
        output,
    } = arg;

    anyhow::ensure!(*fps > 0, "--fps must be positive");
    let (width, height) = board_size.resolve()?;
    let seed = seed.unwrap_or_else(rand::random);
    let search = util::build_search(weights.as_deref(), *no_lookahead)?;

    tracing::info!(width, height, seed, ?rule, depth = ?search.depth(), "starting auto-play");
    let session = GameSession::new(*fps, width, height, PieceGenerator::new(*rule, seed));
    let mut player = AutoPlayer::new(session, search);

    let mut limit = 0;
    while limit < *pieces && player.session().session_state().is_playing() {
        limit = (limit + PROGRESS_INTERVAL).min(*pieces);
        let stats = player.play(limit);
        tracing::info!(
            pieces = stats.completed_pieces(),
            lines = stats.total_cleared_lines(),
            score = stats.score(),
            "progress"
        );
    }

    let session = player.session();
    let summary = AutoPlaySummary {
        seed,
        rule: *rule,
        width,
        height,
        game_over: session.session_state().is_game_over(),
        level: session.stats().level(),
        stats: session.stats(),
        frames: session.total_frames(),
        mode_switches: player.mode_switches(),
        final_mode: player.mode(),
        board: util::board_lines(session.board()),
    };
    util::write_json(&summary, output.as_deref())?;
    Ok(())
}

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, prelude::*};

use self::{auto_play::AutoPlayArg, decide::DecideArg, evaluate::EvaluateArg};

mod auto_play;
mod decide;
mod evaluate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log more (-v for debug, -vv for trace); `RUST_LOG` takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Let the AI play a headless game and report the result
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Score a board and report every metric
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Choose a placement for a piece on a board
    Decide(#[clap(flatten)] DecideArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Decide(arg) => decide::run(&arg)?,
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

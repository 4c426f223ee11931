use std::{
    fs::{self, File},
    io::{self, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context;
use serde::Serialize;
use stackwise_engine::Board;
use stackwise_evaluator::{
    lookahead::{LookaheadSearch, SearchDepth},
    weights::WeightConfig,
};

/// Writes `value` as pretty-printed JSON to `path`, or to stdout without one.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    let (mut writer, target): (Box<dyn io::Write>, String) = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), path.display().to_string())
        }
        None => (Box::new(io::stdout().lock()), "stdout".to_owned()),
    };

    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush output to {target}"))?;
    if path.is_some() {
        tracing::info!(%target, "wrote output");
    }
    Ok(())
}

/// Read a board drawn with `#` (occupied) and `.` (empty), one line per row
///
/// # Errors
///
/// Returns error if the file cannot be read or the drawing is malformed
pub fn read_board_file<P>(path: P) -> anyhow::Result<Board>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file: {}", path.display()))?;
    let board = text
        .parse::<Board>()
        .with_context(|| format!("Failed to parse board file: {}", path.display()))?;
    Ok(board)
}

/// Read weight profiles from a JSON file, or use the built-in ones
///
/// # Errors
///
/// Returns error if the file cannot be parsed or the panic profile is not
/// harsher than the normal one
pub fn read_weights(path: Option<&Path>) -> anyhow::Result<WeightConfig> {
    let Some(path) = path else {
        return Ok(WeightConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read weights file: {}", path.display()))?;
    let config: WeightConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse weights JSON file: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid weights in {}", path.display()))?;
    Ok(config)
}

/// Search with the given weights, placing one piece or two
pub fn build_search(
    weights_path: Option<&Path>,
    no_lookahead: bool,
) -> anyhow::Result<LookaheadSearch> {
    let depth = if no_lookahead {
        SearchDepth::Single
    } else {
        SearchDepth::TwoPiece
    };
    Ok(LookaheadSearch::new(read_weights(weights_path)?).with_depth(depth))
}

pub fn board_lines(board: &Board) -> Vec<String> {
    board.to_string().lines().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_lines() {
        let board = Board::from_ascii(
            "
            ....
            ....
            #..#
            ##.#
            ",
        );
        assert_eq!(board_lines(&board), ["....", "....", "#..#", "##.#"]);
    }

    #[test]
    fn test_default_weights_without_file() {
        assert_eq!(read_weights(None).unwrap(), WeightConfig::default());
    }

    #[test]
    fn test_build_search_depth() {
        let search = build_search(None, false).unwrap();
        assert_eq!(search.depth(), SearchDepth::TwoPiece);
        assert_eq!(search.weights(), &WeightConfig::default());
        assert!(build_search(None, true).unwrap().depth().is_single());
    }
}

//! Board dimensions for a new game.
//!
//! Without explicit flags, the board is sized to fit the terminal next to a
//! side panel, staying close to the classic 10×20 proportions.

use stackwise_engine::Board;

/// Terminal size assumed when it cannot be queried.
const FALLBACK_TERMINAL: (u16, u16) = (80, 24);

/// Columns taken by the frame and side panel.
const HORIZONTAL_CHROME: usize = 16;
/// Rows taken by the header, stats and help lines.
const VERTICAL_CHROME: usize = 10;

const WIDTH_RANGE: (usize, usize) = (8, 14);
const HEIGHT_RANGE: (usize, usize) = (16, 26);

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BoardSizeArg {
    /// Board width in columns; fits the terminal when omitted
    #[arg(long)]
    width: Option<usize>,
    /// Board height in rows; fits the terminal when omitted
    #[arg(long)]
    height: Option<usize>,
}

impl BoardSizeArg {
    pub(crate) fn resolve(&self) -> anyhow::Result<(usize, usize)> {
        let (width, height) = match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (w, h) => {
                let (cols, rows) = crossterm::terminal::size().unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "terminal size unavailable");
                    FALLBACK_TERMINAL
                });
                let (fit_w, fit_h) = fit_terminal(cols, rows);
                (w.unwrap_or(fit_w), h.unwrap_or(fit_h))
            }
        };
        anyhow::ensure!(
            Board::is_supported_size(width, height),
            "unsupported board size {width}x{height}"
        );
        Ok((width, height))
    }
}

/// Largest board that fits a `cols` × `rows` terminal, at least 1.8 times as
/// tall as it is wide.
fn fit_terminal(cols: u16, rows: u16) -> (usize, usize) {
    let available_width = usize::from(cols).saturating_sub(HORIZONTAL_CHROME);
    let available_height = usize::from(rows).saturating_sub(VERTICAL_CHROME);

    let width = available_width.clamp(WIDTH_RANGE.0, WIDTH_RANGE.1);
    let mut height = available_height.clamp(HEIGHT_RANGE.0, HEIGHT_RANGE.1);
    if height * 5 < width * 9 {
        height = HEIGHT_RANGE.0.max(width * 2);
    }
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_terminal() {
        let cases = [
            ("tiny", (20, 10), (8, 16)),
            ("classic", (80, 24), (14, 28)),
            ("tall", (26, 40), (10, 26)),
            ("exact", (26, 30), (10, 20)),
            ("huge", (300, 100), (14, 26)),
            ("short and narrow", (24, 20), (8, 16)),
        ];
        for (name, (cols, rows), expected) in cases {
            assert_eq!(fit_terminal(cols, rows), expected, "{name}");
        }
    }

    #[test]
    fn test_explicit_size_wins() {
        let arg = BoardSizeArg {
            width: Some(10),
            height: Some(20),
        };
        assert_eq!(arg.resolve().unwrap(), (10, 20));

        let arg = BoardSizeArg {
            width: Some(2),
            height: Some(20),
        };
        assert!(arg.resolve().is_err());
    }
}

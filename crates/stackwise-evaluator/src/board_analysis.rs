use std::{cell::OnceCell, iter};

use arrayvec::ArrayVec;
use stackwise_engine::{Board, MAX_BOARD_WIDTH};

/// Rows a four-line clear needs.
const TETRIS_ROWS: usize = 4;

/// Bonus multiplier for an I-well that is empty all the way to the floor.
const CLEAN_WELL_BONUS: f32 = 1.5;

type ColumnValues = ArrayVec<usize, MAX_BOARD_WIDTH>;

/// The edge column kept open for a vertical I-piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IWell {
    /// Designated column, or `None` when neither edge is usable.
    pub column: Option<usize>,
    /// Quality of the designated well; zero when there is none.
    pub quality: f32,
}

/// Lazily computed structural metrics of a board.
///
/// Each metric is computed on first access and cached.
#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<ColumnValues>,
    ready_rows: OnceCell<ColumnValues>,
    well_depths: OnceCell<ColumnValues>,
    max_height: OnceCell<usize>,
    aggregate_height: OnceCell<usize>,
    num_holes: OnceCell<usize>,
    num_pits: OnceCell<usize>,
    bumpiness: OnceCell<usize>,
    row_transitions: OnceCell<u32>,
    column_transitions: OnceCell<u32>,
    i_well: OnceCell<IWell>,
    well_score: OnceCell<usize>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        Self::new(board.clone())
    }

    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            ready_rows: OnceCell::new(),
            well_depths: OnceCell::new(),
            max_height: OnceCell::new(),
            aggregate_height: OnceCell::new(),
            num_holes: OnceCell::new(),
            num_pits: OnceCell::new(),
            bumpiness: OnceCell::new(),
            row_transitions: OnceCell::new(),
            column_transitions: OnceCell::new(),
            i_well: OnceCell::new(),
            well_score: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn column_heights(&self) -> &[usize] {
        self.column_heights.get_or_init(|| self.board.column_heights())
    }

    #[must_use]
    pub fn max_height(&self) -> usize {
        *self
            .max_height
            .get_or_init(|| self.column_heights().iter().copied().max().unwrap_or(0))
    }

    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        *self
            .aggregate_height
            .get_or_init(|| self.column_heights().iter().sum())
    }

    #[must_use]
    pub fn num_holes(&self) -> usize {
        *self.num_holes.get_or_init(|| self.board.count_holes())
    }

    /// Holes with at least two occupied cells above them in the same column.
    ///
    /// Every pit is also a hole.
    #[must_use]
    pub fn num_pits(&self) -> usize {
        *self.num_pits.get_or_init(|| {
            let mut covered_once = 0u32;
            let mut covered_twice = 0u32;
            let mut pits = 0;
            for row in self.board.rows() {
                let bits = row.bits();
                pits += (covered_twice & !bits).count_ones() as usize;
                covered_twice |= covered_once & bits;
                covered_once |= bits;
            }
            pits
        })
    }

    #[must_use]
    pub fn bumpiness(&self) -> usize {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| w[0].abs_diff(w[1]))
                .sum()
        })
    }

    /// Occupied/empty changes along each row, with both walls counted as occupied.
    #[must_use]
    pub fn row_transitions(&self) -> u32 {
        *self.row_transitions.get_or_init(|| {
            let width = self.board.width();
            let pair_mask = (1u64 << (width + 1)) - 1;
            self.board
                .rows()
                .map(|row| {
                    let walled = (u64::from(row.bits()) << 1) | 1 | (1 << (width + 1));
                    ((walled ^ (walled >> 1)) & pair_mask).count_ones()
                })
                .sum()
        })
    }

    /// Occupied/empty changes down each column, from the empty space above the
    /// board to the occupied floor below it.
    #[must_use]
    pub fn column_transitions(&self) -> u32 {
        *self.column_transitions.get_or_init(|| {
            let mut prev = 0u32;
            let mut transitions = 0;
            for row in self.board.rows() {
                transitions += (prev ^ row.bits()).count_ones();
                prev = row.bits();
            }
            transitions + (prev ^ self.board.full_row_mask()).count_ones()
        })
    }

    /// For each column, the number of consecutive rows starting right above
    /// its stack in which that column is the only empty cell.
    #[must_use]
    pub fn ready_rows(&self) -> &[usize] {
        self.ready_rows.get_or_init(|| {
            let height = self.board.height();
            let full = self.board.full_row_mask();
            iter::zip(0..self.board.width(), self.column_heights())
                .map(|(x, &h)| {
                    let gap_row = full & !(1 << x);
                    (0..height - h)
                        .rev()
                        .take_while(|&y| self.board.row(y).bits() == gap_row)
                        .count()
                })
                .collect()
        })
    }

    /// Picks the better edge column as the I-well.
    ///
    /// An edge column scores by how many of the rows right above its stack
    /// are complete except for it (capped at four), with a bonus when the
    /// column is empty to the floor. Ties go to the left edge.
    #[must_use]
    pub fn i_well(&self) -> IWell {
        *self.i_well.get_or_init(|| {
            let last = self.board.width() - 1;
            let quality = |x: usize| {
                #[expect(clippy::cast_precision_loss)]
                let ready = self.ready_rows()[x].min(TETRIS_ROWS) as f32;
                if self.column_heights()[x] == 0 {
                    ready * CLEAN_WELL_BONUS
                } else {
                    ready
                }
            };
            let (column, quality) = [0, last]
                .into_iter()
                .map(|x| (x, quality(x)))
                .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
            if quality > 0.0 {
                IWell {
                    column: Some(column),
                    quality,
                }
            } else {
                IWell {
                    column: None,
                    quality: 0.0,
                }
            }
        })
    }

    /// Depth of each well: how far a column sits below its lower neighbour,
    /// when that is two or more. Edge columns compare against their one
    /// neighbour.
    #[must_use]
    pub fn well_depths(&self) -> &[usize] {
        self.well_depths.get_or_init(|| {
            let h = self.column_heights();
            (0..h.len())
                .map(|x| {
                    let left = x.checked_sub(1).map(|l| h[l]);
                    let right = h.get(x + 1).copied();
                    let rim = match (left, right) {
                        (Some(l), Some(r)) => l.min(r),
                        (Some(n), None) | (None, Some(n)) => n,
                        (None, None) => h[x],
                    };
                    let depth = rim.saturating_sub(h[x]);
                    if depth >= 2 { depth } else { 0 }
                })
                .collect()
        })
    }

    /// Sum of squared well depths, excluding the designated I-well.
    #[must_use]
    pub fn well_score(&self) -> usize {
        *self.well_score.get_or_init(|| {
            let i_well = self.i_well().column;
            self.well_depths()
                .iter()
                .enumerate()
                .filter(|(x, _)| Some(*x) != i_well)
                .map(|(_, d)| d * d)
                .sum()
        })
    }

    /// Whether some column is the only gap in four consecutive rows and is
    /// open from above, so a vertical I-piece would clear four lines.
    #[must_use]
    pub fn is_clear_ready(&self) -> bool {
        self.ready_rows().iter().any(|&r| r >= TETRIS_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(art: &str) -> BoardAnalysis {
        BoardAnalysis::new(Board::from_ascii(art))
    }

    #[test]
    fn test_empty_board() {
        let analysis = BoardAnalysis::new(Board::new(10, 20));
        assert_eq!(analysis.aggregate_height(), 0);
        assert_eq!(analysis.max_height(), 0);
        assert_eq!(analysis.num_holes(), 0);
        assert_eq!(analysis.num_pits(), 0);
        assert_eq!(analysis.bumpiness(), 0);
        assert_eq!(analysis.row_transitions(), 40);
        assert_eq!(analysis.column_transitions(), 10);
        assert_eq!(analysis.well_score(), 0);
        assert_eq!(analysis.i_well().column, None);
        assert!(!analysis.is_clear_ready());
    }

    #[test]
    fn test_holes_and_pits() {
        let analysis = analyze(
            "
            .#...
            .#.#.
            .#...
            ##.#.
            ",
        );
        assert_eq!(analysis.column_heights(), &[1, 4, 0, 3, 0]);
        assert_eq!(analysis.num_holes(), 1);
        assert_eq!(analysis.num_pits(), 0);

        let analysis = analyze(
            "
            ##..
            #...
            ....
            .#..
            ",
        );
        assert_eq!(analysis.num_holes(), 4);
        // column 0 has two cells over its bottom two rows, column 1 only one
        assert_eq!(analysis.num_pits(), 2);
    }

    #[test]
    fn test_transitions() {
        let analysis = analyze(
            "
            ....
            ....
            #..#
            ##.#
            ",
        );
        // rows: 2 + 2 + 2 + 2
        assert_eq!(analysis.row_transitions(), 8);
        // three stack tops, plus the empty column meeting the floor
        assert_eq!(analysis.column_transitions(), 4);
    }

    #[test]
    fn test_wells() {
        let analysis = analyze(
            "
            .#..#
            .#..#
            ##.##
            ##.##
            ",
        );
        assert_eq!(analysis.column_heights(), &[2, 4, 0, 2, 4]);
        assert_eq!(analysis.well_depths(), &[2, 0, 2, 0, 0]);
        assert_eq!(analysis.well_score(), 8);
    }

    #[test]
    fn test_i_well_and_readiness() {
        let analysis = analyze(
            "
            ......
            #####.
            #####.
            #####.
            #####.
            ",
        );
        assert_eq!(analysis.ready_rows(), &[0, 0, 0, 0, 0, 4]);
        assert_eq!(
            analysis.i_well(),
            IWell {
                column: Some(5),
                quality: 6.0
            }
        );
        assert_eq!(analysis.well_depths()[5], 4);
        assert_eq!(analysis.well_score(), 0);
        assert!(analysis.is_clear_ready());

        // a shallow right-edge gap on top of a stack
        let analysis = analyze(
            "
            ......
            ......
            .....#
            ######
            ",
        );
        assert_eq!(analysis.i_well().column, None);

        let analysis = analyze(
            "
            ......
            ######
            #####.
            ######
            ",
        );
        assert_eq!(analysis.i_well().column, None);
        assert_eq!(analysis.num_holes(), 1);
    }

    #[test]
    fn test_i_well_needs_gap_rows_above_stack() {
        let analysis = analyze(
            "
            ......
            ......
            .####.
            .####.
            ",
        );
        assert_eq!(analysis.ready_rows(), &[0, 0, 0, 0, 0, 0]);
        let analysis = analyze(
            "
            .....
            .....
            .....
            .###.
            ",
        );
        assert_eq!(analysis.i_well().column, None);

        let analysis = analyze(
            "
            .....
            .....
            .####
            ####.
            ",
        );
        assert_eq!(analysis.ready_rows()[0], 1);
        assert_eq!(analysis.ready_rows()[4], 0);
        assert_eq!(analysis.i_well().column, Some(0));
    }
}

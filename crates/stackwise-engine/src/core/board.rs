use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH, MIN_BOARD_HEIGHT, MIN_BOARD_WIDTH};

/// Error returned when a cell lookup falls outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell ({col}, {row}) is outside the {width}x{height} board")]
pub struct OutOfBounds {
    pub col: usize,
    pub row: usize,
    pub width: usize,
    pub height: usize,
}

/// Error returned when parsing a board from its ASCII form.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board has no rows")]
    Empty,
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("invalid cell {ch:?} at row {row}, column {col} (expected '#' or '.')")]
    InvalidCell { row: usize, col: usize, ch: char },
    #[display("unsupported board size {width}x{height}")]
    Dimensions { width: usize, height: usize },
    #[display("invalid row mask {text:?}")]
    InvalidMask { text: String },
}

/// Single row of the board as a bitmask.
///
/// Bit `x` is set when column `x` is occupied. Bits at or above the board
/// width are always clear.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRow {
    bits: u32,
}

impl BitRow {
    pub const EMPTY: Self = Self { bits: 0 };

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    #[inline]
    #[must_use]
    pub const fn is_cell_occupied(self, x: usize) -> bool {
        (self.bits & (1 << x)) != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_any_cell_occupied(self, mask: u32) -> bool {
        (self.bits & mask) != 0
    }

    #[inline]
    pub const fn occupy_cells(&mut self, mask: u32) {
        self.bits |= mask;
    }

    #[inline]
    #[must_use]
    pub const fn occupied_count(self) -> u32 {
        self.bits.count_ones()
    }
}

/// Occupancy grid of locked cells.
///
/// `Board` is a value type: every derived board (a simulated drop, a line
/// clear) is a fresh copy, so search branches never alias the live board.
/// Rows are stored top to bottom and row 0 is the topmost visible row.
///
/// # Example
///
/// ```
/// use stackwise_engine::Board;
///
/// let board = Board::from_ascii(
///     "
///     ....
///     ....
///     #...
///     #..#
///     ",
/// );
/// assert_eq!(board.column_height(0), 2);
/// assert_eq!(board.column_height(2), 0);
/// assert_eq!(board.count_holes(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    rows: ArrayVec<BitRow, MAX_BOARD_HEIGHT>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions are outside the supported range.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            Self::is_supported_size(width, height),
            "unsupported board size {width}x{height}"
        );
        let mut rows = ArrayVec::new();
        for _ in 0..height {
            rows.push(BitRow::EMPTY);
        }
        Self {
            width: u8::try_from(width).unwrap(),
            rows,
        }
    }

    #[must_use]
    pub fn is_supported_size(width: usize, height: usize) -> bool {
        (MIN_BOARD_WIDTH..=MAX_BOARD_WIDTH).contains(&width)
            && (MIN_BOARD_HEIGHT..=MAX_BOARD_HEIGHT).contains(&height)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.width() * self.height()
    }

    /// Mask with one bit set for every column of the board.
    #[must_use]
    pub fn full_row_mask(&self) -> u32 {
        if self.width() == 32 {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    #[must_use]
    pub fn row(&self, y: usize) -> BitRow {
        self.rows[y]
    }

    pub fn rows(&self) -> impl DoubleEndedIterator<Item = BitRow> + ExactSizeIterator + '_ {
        self.rows.iter().copied()
    }

    /// Returns the occupancy of a cell.
    pub fn is_occupied(&self, col: usize, row: usize) -> Result<bool, OutOfBounds> {
        if col >= self.width() || row >= self.height() {
            return Err(OutOfBounds {
                col,
                row,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(self.rows[row].is_cell_occupied(col))
    }

    /// Height of the topmost occupied cell in a column, counted from the floor.
    #[must_use]
    pub fn column_height(&self, col: usize) -> usize {
        assert!(col < self.width(), "column {col} out of range");
        self.rows
            .iter()
            .position(|row| row.is_cell_occupied(col))
            .map_or(0, |top| self.height() - top)
    }

    /// Heights of all columns, left to right.
    #[must_use]
    pub fn column_heights(&self) -> ArrayVec<usize, MAX_BOARD_WIDTH> {
        (0..self.width()).map(|x| self.column_height(x)).collect()
    }

    /// Number of empty cells with at least one occupied cell above them.
    #[must_use]
    pub fn count_holes(&self) -> usize {
        let mut covered = 0u32;
        let mut holes = 0;
        for row in &self.rows {
            holes += (covered & !row.bits).count_ones() as usize;
            covered |= row.bits;
        }
        holes
    }

    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.rows.iter().map(|r| r.occupied_count() as usize).sum()
    }

    /// Fraction of the grid that is occupied, in `[0.0, 1.0]`.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn fill_fraction(&self) -> f32 {
        self.occupied_cells() as f32 / self.total_cells() as f32
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].bits == self.full_row_mask()
    }

    /// Number of rows with no empty cell.
    #[must_use]
    pub fn full_rows(&self) -> usize {
        (0..self.height()).filter(|&y| self.is_row_full(y)).count()
    }

    /// Returns a board with every full row removed and the number removed.
    ///
    /// Rows above a removed row shift down; empty rows are inserted at the top.
    #[must_use]
    pub fn clear_full_rows(&self) -> (Self, usize) {
        let mut board = self.clone();
        let cleared = board.clear_lines();
        (board, cleared)
    }

    /// In-place variant of [`Board::clear_full_rows`].
    pub fn clear_lines(&mut self) -> usize {
        let full = self.full_row_mask();
        let height = self.height();
        let mut count = 0;
        for y in (0..height).rev() {
            if self.rows[y].bits == full {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BitRow::EMPTY);
        count
    }

    /// Checks whether any of the given cells is blocked.
    ///
    /// Cells left or right of the grid and below the floor are blocked. Cells
    /// above the top row are free, so a piece may hang partly above the board.
    #[must_use]
    pub fn collides<I>(&self, cells: I) -> bool
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        cells.into_iter().any(|(x, y)| {
            let Some(col) = usize::try_from(x).ok().filter(|&col| col < self.width()) else {
                return true;
            };
            match usize::try_from(y) {
                Ok(row) => row >= self.height() || self.rows[row].is_cell_occupied(col),
                Err(_) => false,
            }
        })
    }

    /// Sets the given cells as occupied.
    ///
    /// Cells above the top row are ignored.
    ///
    /// # Panics
    ///
    /// Panics if a cell is left, right or below the grid.
    pub fn fill_cells<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        for (x, y) in cells {
            let col = usize::try_from(x).expect("cell left of the board");
            assert!(col < self.width(), "cell right of the board");
            if let Ok(row) = usize::try_from(y) {
                self.rows[row].occupy_cells(1 << col);
            }
        }
    }

    pub(crate) fn occupy_row_mask(&mut self, y: usize, mask: u32) {
        self.rows[y].occupy_cells(mask);
    }

    /// Creates a board from ASCII art, for tests and examples.
    ///
    /// `#` is an occupied cell and `.` an empty one. Rows are given top to
    /// bottom and blank lines are skipped. The board takes the dimensions of
    /// the art.
    ///
    /// # Panics
    ///
    /// Panics if the art is malformed.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        match art.parse() {
            Ok(board) => board,
            Err(e) => panic!("invalid board art: {e}"),
        }
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().filter(|line| !line.trim().is_empty()).collect();
        let Some(first) = lines.first() else {
            return Err(ParseBoardError::Empty);
        };
        let width = first.chars().filter(|c| !c.is_whitespace()).count();
        let height = lines.len();
        if !Self::is_supported_size(width, height) {
            return Err(ParseBoardError::Dimensions { width, height });
        }

        let mut board = Self::new(width, height);
        for (y, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != width {
                return Err(ParseBoardError::RaggedRow {
                    row: y,
                    expected: width,
                    found: cells.len(),
                });
            }
            for (x, &ch) in cells.iter().enumerate() {
                match ch {
                    '#' => board.rows[y].occupy_cells(1 << x),
                    '.' => {}
                    _ => return Err(ParseBoardError::InvalidCell { row: y, col: x, ch }),
                }
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for x in 0..self.width() {
                f.write_char(if row.is_cell_occupied(x) { '#' } else { '.' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "10x20:00000000,...,000001ff" (one hex mask per row, top first)
        let mut s = String::with_capacity(8 + self.height() * 9);
        write!(&mut s, "{}x{}:", self.width(), self.height()).unwrap();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                s.push(',');
            }
            write!(&mut s, "{:08x}", row.bits).unwrap();
        }
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_hex_board(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_hex_board(s: &str) -> Result<Board, ParseBoardError> {
    let invalid = |text: &str| ParseBoardError::InvalidMask {
        text: text.to_owned(),
    };
    let (dims, masks) = s.split_once(':').ok_or_else(|| invalid(s))?;
    let (width, height) = dims.split_once('x').ok_or_else(|| invalid(dims))?;
    let width: usize = width.parse().map_err(|_| invalid(width))?;
    let height: usize = height.parse().map_err(|_| invalid(height))?;
    if !Board::is_supported_size(width, height) {
        return Err(ParseBoardError::Dimensions { width, height });
    }

    let mut board = Board::new(width, height);
    let parts: Vec<&str> = masks.split(',').collect();
    if parts.len() != height {
        return Err(invalid(masks));
    }
    for (y, part) in parts.iter().enumerate() {
        let bits = u32::from_str_radix(part, 16).map_err(|_| invalid(part))?;
        if bits & !board.full_row_mask() != 0 {
            return Err(invalid(part));
        }
        board.rows[y] = BitRow::from_bits(bits);
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(10, 20);
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
        assert_eq!(board.occupied_cells(), 0);
        assert_eq!(board.full_row_mask(), 0x3ff);
        for x in 0..10 {
            assert_eq!(board.column_height(x), 0);
        }
    }

    #[test]
    #[should_panic(expected = "unsupported board size")]
    fn test_new_board_rejects_tiny_width() {
        let _ = Board::new(3, 20);
    }

    #[test]
    fn test_is_occupied_bounds() {
        let board = Board::from_ascii(
            "
            ....
            ....
            ....
            #...
            ",
        );
        assert_eq!(board.is_occupied(0, 3), Ok(true));
        assert_eq!(board.is_occupied(1, 3), Ok(false));
        assert_eq!(
            board.is_occupied(4, 0),
            Err(OutOfBounds {
                col: 4,
                row: 0,
                width: 4,
                height: 4
            })
        );
        assert!(board.is_occupied(0, 4).is_err());
    }

    #[test]
    fn test_column_height_and_holes() {
        let board = Board::from_ascii(
            "
            .....
            #....
            ..#..
            #.#..
            .##.#
            ",
        );
        assert_eq!(board.column_heights().as_slice(), &[4, 1, 3, 0, 1]);
        // column 0 has two holes (rows 2 and 4), column 2 none
        assert_eq!(board.count_holes(), 2);
    }

    #[test]
    fn test_clear_full_rows_shifts_down() {
        let board = Board::from_ascii(
            "
            ....
            .#..
            ####
            #..#
            ####
            ",
        );
        let (cleared, lines) = board.clear_full_rows();
        assert_eq!(lines, 2);
        assert_eq!(
            cleared,
            Board::from_ascii(
                "
                ....
                ....
                ....
                .#..
                #..#
                ",
            )
        );
        // the source board is untouched
        assert_eq!(board.full_rows(), 2);
    }

    #[test]
    fn test_clear_all_rows() {
        let board = Board::from_ascii(
            "
            ####
            ####
            ####
            ####
            ",
        );
        let (cleared, lines) = board.clear_full_rows();
        assert_eq!(lines, 4);
        assert_eq!(cleared, Board::new(4, 4));
    }

    #[test]
    fn test_collides() {
        let board = Board::from_ascii(
            "
            ....
            ....
            ....
            .#..
            ",
        );
        assert!(!board.collides([(0, 0), (0, -3)]));
        assert!(board.collides([(1, 3)]));
        assert!(board.collides([(-1, 0)]));
        assert!(board.collides([(4, 0)]));
        assert!(board.collides([(0, 4)]));
    }

    #[test]
    fn test_fill_fraction() {
        let board = Board::from_ascii(
            "
            ....
            ....
            ##..
            ####
            ",
        );
        assert!((board.fill_fraction() - 6.0 / 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Board>(), Err(ParseBoardError::Empty));
        assert_eq!(
            "....\n...\n....\n....".parse::<Board>(),
            Err(ParseBoardError::RaggedRow {
                row: 1,
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            "....\n..x.\n....\n....".parse::<Board>(),
            Err(ParseBoardError::InvalidCell {
                row: 1,
                col: 2,
                ch: 'x'
            })
        );
        assert_eq!(
            "...\n...\n...\n...".parse::<Board>(),
            Err(ParseBoardError::Dimensions {
                width: 3,
                height: 4
            })
        );
    }

    #[test]
    fn test_display_matches_ascii() {
        let art = "....\n.#..\n##.#\n####\n";
        let board: Board = art.parse().unwrap();
        assert_eq!(board.to_string(), art);
    }

    #[test]
    fn test_board_serialization() {
        let board = Board::from_ascii(
            "
            ....
            ....
            #...
            ##.#
            ",
        );
        let serialized = serde_json::to_string(&board).unwrap();
        assert_eq!(
            serialized,
            "\"4x4:00000000,00000000,00000001,0000000b\""
        );
        let deserialized: Board = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, board);

        assert!(serde_json::from_str::<Board>("\"4x4:00000000\"").is_err());
        assert!(serde_json::from_str::<Board>("\"4x4:10,0,0,0\"").is_err());
        assert!(serde_json::from_str::<Board>("\"2x4:0,0,0,0\"").is_err());
    }
}

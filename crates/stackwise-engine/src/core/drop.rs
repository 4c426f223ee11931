use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    board::Board,
    piece::{PieceKind, Rotation},
};

/// Reasons a placement cannot be simulated.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum PlacementError {
    /// Some cell of the shifted piece lies outside `[0, width)`.
    #[display("column {column} is out of range for a board of width {width}")]
    ColumnOutOfRange { column: usize, width: usize },
    /// The piece overlaps the stack before it can start falling.
    #[display("piece cannot enter the board (top out)")]
    TopOut,
}

/// A horizontal and rotational target for a piece.
///
/// The resting row is derived by [`simulate_drop`], never chosen. `column` is
/// the board column of the piece's leftmost occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Placement {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub column: usize,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.kind, self.rotation.index(), self.column)
    }
}

impl Placement {
    #[must_use]
    pub fn new(kind: PieceKind, rotation: Rotation, column: usize) -> Self {
        Self {
            kind,
            rotation,
            column,
        }
    }

    /// Every placement of `kind` whose cells fit horizontally on a board of
    /// the given width, in rotation-then-column order.
    pub fn enumerate(kind: PieceKind, board_width: usize) -> impl Iterator<Item = Self> {
        kind.rotations().flat_map(move |rotation| {
            let shape_width = kind.shape(rotation).width();
            let columns = (board_width + 1).saturating_sub(shape_width);
            (0..columns).map(move |column| Self::new(kind, rotation, column))
        })
    }

    pub fn simulate(&self, board: &Board) -> Result<SimOutcome, PlacementError> {
        simulate_drop(board, self.kind, self.rotation, self.column)
    }
}

/// Result of dropping a piece onto a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimOutcome {
    /// Board after the piece is locked and full rows are cleared.
    pub board: Board,
    pub lines_cleared: usize,
    /// Row of the piece's top edge where it came to rest, before clearing.
    pub resting_row: usize,
}

/// Drops a piece straight down from the top of the board and locks it.
///
/// The piece enters with its top edge at row 0 and its leftmost cell at
/// `target_column`, then falls until one more step would overlap the stack or
/// pass the floor. The input board is left untouched.
///
/// # Errors
///
/// - [`PlacementError::ColumnOutOfRange`] if the piece does not fit
///   horizontally at `target_column`.
/// - [`PlacementError::TopOut`] if the piece already overlaps the stack at
///   its entry position.
///
/// # Panics
///
/// Panics if `rotation` is not valid for `kind`.
///
/// # Example
///
/// ```
/// use stackwise_engine::{Board, PieceKind, Rotation, simulate_drop};
///
/// let board = Board::new(10, 20);
/// let outcome = simulate_drop(&board, PieceKind::O, Rotation::SPAWN, 4).unwrap();
/// assert_eq!(outcome.resting_row, 18);
/// assert_eq!(outcome.board.column_height(4), 2);
/// assert_eq!(outcome.lines_cleared, 0);
/// ```
pub fn simulate_drop(
    board: &Board,
    kind: PieceKind,
    rotation: Rotation,
    target_column: usize,
) -> Result<SimOutcome, PlacementError> {
    let shape = kind.shape(rotation);
    if target_column
        .checked_add(shape.width())
        .is_none_or(|end| end > board.width())
    {
        return Err(PlacementError::ColumnOutOfRange {
            column: target_column,
            width: board.width(),
        });
    }
    if shape.height() > board.height() {
        return Err(PlacementError::TopOut);
    }

    let masks: [u32; 4] = std::array::from_fn(|dy| shape.row_mask(dy, target_column));
    let fits_at = |top: usize| {
        (0..shape.height()).all(|dy| !board.row(top + dy).is_any_cell_occupied(masks[dy]))
    };

    if !fits_at(0) {
        return Err(PlacementError::TopOut);
    }
    let mut top = 0;
    while top + shape.height() < board.height() && fits_at(top + 1) {
        top += 1;
    }

    let mut locked = board.clone();
    for (dy, &mask) in masks.iter().enumerate().take(shape.height()) {
        locked.occupy_row_mask(top + dy, mask);
    }
    let lines_cleared = locked.clear_lines();

    Ok(SimOutcome {
        board: locked,
        lines_cleared,
        resting_row: top,
    })
}

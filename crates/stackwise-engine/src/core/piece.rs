use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Enum representing the type of piece.
///
/// Parses case-insensitively from its letter, so `"t"` and `"T"` are both
/// [`PieceKind::T`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Deserialize,
    Serialize,
    derive_more::FromStr,
)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Number of distinct rotation states (1, 2 or 4).
    #[must_use]
    pub const fn rotation_count(self) -> usize {
        PIECE_SHAPES[self as usize].len()
    }

    /// Iterates rotation states in catalog order, starting from spawn.
    pub fn rotations(self) -> impl Iterator<Item = Rotation> {
        (0..self.rotation_count()).map(Rotation::from_index)
    }

    /// Returns the shape of the given rotation state.
    ///
    /// # Panics
    ///
    /// Panics if the rotation is not valid for this kind.
    #[must_use]
    pub fn shape(self, rotation: Rotation) -> &'static PieceShape {
        let shapes = PIECE_SHAPES[self as usize];
        assert!(
            rotation.index() < shapes.len(),
            "rotation {} is not valid for {self}-piece",
            rotation.index()
        );
        &shapes[rotation.index()]
    }

    #[must_use]
    pub fn is_valid_rotation(self, rotation: Rotation) -> bool {
        rotation.index() < self.rotation_count()
    }

    /// Spawn anchor `(column, row)` on a board of the given width.
    ///
    /// The piece is centered horizontally and starts two rows above the
    /// visible area so it falls into view.
    #[must_use]
    pub fn spawn_anchor(self, board_width: usize) -> (i32, i32) {
        let shape_width = self.shape(Rotation::SPAWN).width();
        let col = board_width.saturating_sub(shape_width) / 2;
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        (col as i32, SPAWN_ROW)
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackwise_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }
}

const SPAWN_ROW: i32 = -2;

/// Rotation state of a piece.
///
/// An index into the kind's rotation list; state `n + 1` is the clockwise
/// turn of state `n`, wrapping at [`PieceKind::rotation_count`].
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct Rotation(u8);

impl Rotation {
    pub const SPAWN: Self = Self(0);

    /// # Panics
    ///
    /// Panics if `index` is 4 or more.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        assert!(index < 4, "rotation index out of range");
        #[expect(clippy::cast_possible_truncation)]
        Self(index as u8)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Next clockwise rotation state for the given kind.
    #[must_use]
    pub const fn rotated_right(self, kind: PieceKind) -> Self {
        Self::from_index((self.index() + 1) % kind.rotation_count())
    }
}

/// Occupied cells of one rotation state.
///
/// Offsets are `(dx, dy)` from the top-left of the shape's tight bounding box:
/// the leftmost occupied column is `dx == 0` and the topmost row is `dy == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    cells: [(u8, u8); 4],
    width: u8,
    height: u8,
}

impl PieceShape {
    const fn new(cells: [(u8, u8); 4]) -> Self {
        let mut width = 0;
        let mut height = 0;
        let mut i = 0;
        while i < cells.len() {
            if cells[i].0 + 1 > width {
                width = cells[i].0 + 1;
            }
            if cells[i].1 + 1 > height {
                height = cells[i].1 + 1;
            }
            i += 1;
        }
        Self {
            cells,
            width,
            height,
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .map(|&(dx, dy)| (usize::from(dx), usize::from(dy)))
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Bitmask of row `dy` with the shape's left edge at column `x0`.
    #[must_use]
    pub fn row_mask(&self, dy: usize, x0: usize) -> u32 {
        self.cells()
            .filter(|&(_, y)| y == dy)
            .fold(0, |mask, (x, _)| mask | (1 << (x0 + x)))
    }
}

/// Rotation states per kind, in clockwise order.
const PIECE_SHAPES: [&[PieceShape]; PieceKind::LEN] = {
    const fn s(cells: [(u8, u8); 4]) -> PieceShape {
        PieceShape::new(cells)
    }
    [
        // I: ####
        &[
            s([(0, 0), (1, 0), (2, 0), (3, 0)]),
            s([(0, 0), (0, 1), (0, 2), (0, 3)]),
        ],
        // O: ##/##
        &[s([(0, 0), (1, 0), (0, 1), (1, 1)])],
        // T: .#./###
        &[
            s([(1, 0), (0, 1), (1, 1), (2, 1)]),
            s([(0, 0), (0, 1), (1, 1), (0, 2)]),
            s([(0, 0), (1, 0), (2, 0), (1, 1)]),
            s([(1, 0), (0, 1), (1, 1), (1, 2)]),
        ],
        // S: .##/##.
        &[
            s([(1, 0), (2, 0), (0, 1), (1, 1)]),
            s([(0, 0), (0, 1), (1, 1), (1, 2)]),
        ],
        // Z: ##./.##
        &[
            s([(0, 0), (1, 0), (1, 1), (2, 1)]),
            s([(1, 0), (0, 1), (1, 1), (0, 2)]),
        ],
        // J: #../###
        &[
            s([(0, 0), (0, 1), (1, 1), (2, 1)]),
            s([(0, 0), (1, 0), (0, 1), (0, 2)]),
            s([(0, 0), (1, 0), (2, 0), (2, 1)]),
            s([(1, 0), (1, 1), (0, 2), (1, 2)]),
        ],
        // L: ..#/###
        &[
            s([(2, 0), (0, 1), (1, 1), (2, 1)]),
            s([(0, 0), (0, 1), (0, 2), (1, 2)]),
            s([(0, 0), (1, 0), (2, 0), (0, 1)]),
            s([(0, 0), (1, 0), (1, 1), (1, 2)]),
        ],
    ]
};

/// A falling piece with its live anchor.
///
/// The anchor is the top-left of the shape's bounding box. The row may be
/// negative while the piece is still above the visible area. Pieces are
/// immutable: movement and rotation return new values.
///
/// # Example
///
/// ```
/// use stackwise_engine::{Piece, PieceKind};
///
/// let piece = Piece::spawn(PieceKind::T, 10);
/// assert_eq!(piece.col(), 3);
/// let moved = piece.shifted(1, 0).rotated_right();
/// assert_eq!(moved.col(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: Rotation,
    col: i32,
    row: i32,
}

impl Piece {
    #[must_use]
    pub fn new(kind: PieceKind, rotation: Rotation, col: i32, row: i32) -> Self {
        assert!(kind.is_valid_rotation(rotation));
        Self {
            kind,
            rotation,
            col,
            row,
        }
    }

    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let (col, row) = kind.spawn_anchor(board_width);
        Self::new(kind, Rotation::SPAWN, col, row)
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn col(&self) -> i32 {
        self.col
    }

    #[must_use]
    pub fn row(&self) -> i32 {
        self.row
    }

    #[must_use]
    pub fn shape(&self) -> &'static PieceShape {
        self.kind.shape(self.rotation)
    }

    /// Board coordinates `(col, row)` of the occupied cells.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape()
            .cells
            .iter()
            .map(move |&(dx, dy)| (self.col + i32::from(dx), self.row + i32::from(dy)))
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            col: self.col + dx,
            row: self.row + dy,
            ..*self
        }
    }

    #[must_use]
    pub fn rotated_right(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_right(self.kind),
            ..*self
        }
    }
}

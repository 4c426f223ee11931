pub use self::{board::*, drop::*, piece::*};

pub(crate) mod board;
pub(crate) mod drop;
pub(crate) mod piece;

/// Narrowest supported board.
pub const MIN_BOARD_WIDTH: usize = 4;
/// Widest supported board (one `u32` bitmask per row).
pub const MAX_BOARD_WIDTH: usize = 32;
/// Shortest supported board.
pub const MIN_BOARD_HEIGHT: usize = 4;
/// Tallest supported board.
pub const MAX_BOARD_HEIGHT: usize = 64;

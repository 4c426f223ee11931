use crate::{
    LockPieceError, PieceCollisionError,
    core::{
        board::Board,
        piece::{Piece, PieceKind},
    },
};

use super::piece_generator::PieceGenerator;

/// Offsets tried in order when a clockwise rotation collides in place.
const WALL_KICKS: [(i32, i32); 5] = [(-1, 0), (1, 0), (0, -1), (-2, 0), (2, 0)];

/// Live game state: the locked stack, the falling piece and the preview.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Piece,
    next_kind: PieceKind,
    generator: PieceGenerator,
    spawn_count: usize,
}

impl GameField {
    /// Creates an empty field and spawns the first piece.
    ///
    /// # Panics
    ///
    /// Panics if the board size is not supported.
    #[must_use]
    pub fn new(width: usize, height: usize, mut generator: PieceGenerator) -> Self {
        let board = Board::new(width, height);
        let falling_piece = Piece::spawn(generator.pop_next(), width);
        let next_kind = generator.pop_next();
        Self {
            board,
            falling_piece,
            next_kind,
            generator,
            spawn_count: 1,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    #[must_use]
    pub fn next_kind(&self) -> PieceKind {
        self.next_kind
    }

    /// Number of pieces spawned so far, including the falling one.
    ///
    /// Changes exactly when a new piece enters, so callers can tell spawns
    /// apart without comparing pieces.
    #[must_use]
    pub fn spawn_count(&self) -> usize {
        self.spawn_count
    }

    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.collides(piece.cells()) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.shifted(-1, 0))
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.shifted(1, 0))
    }

    pub fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.shifted(0, 1))
    }

    /// Rotates the falling piece clockwise, kicking it off walls if needed.
    pub fn try_rotate_right(&mut self) -> Result<(), PieceCollisionError> {
        let rotated = self.falling_piece.rotated_right();
        let piece = std::iter::once((0, 0))
            .chain(WALL_KICKS)
            .map(|(dx, dy)| rotated.shifted(dx, dy))
            .find(|piece| !self.board.collides(piece.cells()))
            .ok_or(PieceCollisionError)?;
        self.falling_piece = piece;
        Ok(())
    }

    /// Position the falling piece would lock at if hard-dropped.
    #[must_use]
    pub fn simulate_drop_position(&self) -> Piece {
        let mut piece = self.falling_piece;
        loop {
            let next = piece.shifted(0, 1);
            if self.board.collides(next.cells()) {
                return piece;
            }
            piece = next;
        }
    }

    /// Drops the falling piece to the bottom and locks it.
    pub fn hard_drop(&mut self) -> (usize, Result<(), LockPieceError>) {
        self.falling_piece = self.simulate_drop_position();
        self.complete_piece_drop()
    }

    /// Locks the falling piece where it is, clears lines and spawns the next piece.
    ///
    /// Returns the number of lines cleared. The error reports game over:
    /// either part of the locked piece is still above the board, or the new
    /// piece collides at its spawn position.
    pub fn complete_piece_drop(&mut self) -> (usize, Result<(), LockPieceError>) {
        let piece = self.falling_piece;
        let locked_out = piece.cells().any(|(_, y)| y < 0);
        self.board.fill_cells(piece.cells());
        let cleared_lines = self.board.clear_lines();
        if locked_out {
            return (cleared_lines, Err(LockPieceError::LockOut));
        }

        let kind = std::mem::replace(&mut self.next_kind, self.generator.pop_next());
        self.falling_piece = Piece::spawn(kind, self.board.width());
        self.spawn_count += 1;
        if self.board.collides(self.falling_piece.cells()) {
            return (cleared_lines, Err(LockPieceError::NewPieceCollision));
        }
        (cleared_lines, Ok(()))
    }
}

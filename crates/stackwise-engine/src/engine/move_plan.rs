use std::cmp::Ordering;

use serde::Serialize;

use crate::core::{drop::Placement, piece::Piece};

/// A primitive input applied to the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum MoveCommand {
    #[display("rotate-right")]
    RotateRight,
    #[display("left")]
    Left,
    #[display("right")]
    Right,
    #[display("hard-drop")]
    HardDrop,
}

/// Steers a falling piece to a target placement, one command per tick.
///
/// Commands are derived from the piece's current position each time, so wall
/// kicks that shift the piece during rotation are corrected by later shifts.
/// Rotation comes first, then horizontal movement, then a hard drop.
///
/// # Example
///
/// ```
/// use stackwise_engine::{MoveCommand, MovePlan, Piece, PieceKind, Placement, Rotation};
///
/// let piece = Piece::spawn(PieceKind::T, 10);
/// let mut plan = MovePlan::new(Placement::new(PieceKind::T, Rotation::SPAWN, 1));
/// assert_eq!(plan.next_command(&piece), MoveCommand::Left);
/// ```
#[derive(Debug, Clone)]
pub struct MovePlan {
    target: Placement,
    issued: usize,
}

/// Commands after which a plan gives up steering and drops the piece.
const MAX_STEERING_COMMANDS: usize = 64;

impl MovePlan {
    #[must_use]
    pub fn new(target: Placement) -> Self {
        Self { target, issued: 0 }
    }

    #[must_use]
    pub fn target(&self) -> Placement {
        self.target
    }

    /// Next command to bring `piece` to the target.
    ///
    /// # Panics
    ///
    /// Panics if `piece` is not of the target's kind.
    pub fn next_command(&mut self, piece: &Piece) -> MoveCommand {
        assert_eq!(piece.kind(), self.target.kind, "plan used for another piece");
        self.issued += 1;
        if self.issued > MAX_STEERING_COMMANDS {
            return MoveCommand::HardDrop;
        }
        if piece.rotation() != self.target.rotation {
            return MoveCommand::RotateRight;
        }
        let target = i64::try_from(self.target.column).unwrap_or(i64::MAX);
        match i64::from(piece.col()).cmp(&target) {
            Ordering::Greater => MoveCommand::Left,
            Ordering::Less => MoveCommand::Right,
            Ordering::Equal => MoveCommand::HardDrop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, PieceKind, Rotation};

    fn apply(piece: Piece, command: MoveCommand, board: &Board) -> Piece {
        let moved = match command {
            MoveCommand::RotateRight => piece.rotated_right(),
            MoveCommand::Left => piece.shifted(-1, 0),
            MoveCommand::Right => piece.shifted(1, 0),
            MoveCommand::HardDrop => return piece,
        };
        assert!(!board.collides(moved.cells()));
        moved
    }

    #[test]
    fn test_plan_reaches_every_placement() {
        let board = Board::new(10, 20);
        for kind in PieceKind::ALL {
            for target in Placement::enumerate(kind, board.width()) {
                let mut plan = MovePlan::new(target);
                let mut piece = Piece::spawn(kind, board.width());
                loop {
                    let command = plan.next_command(&piece);
                    if command == MoveCommand::HardDrop {
                        break;
                    }
                    piece = apply(piece, command, &board);
                }
                assert_eq!(piece.rotation(), target.rotation, "{target}");
                assert_eq!(i64::from(piece.col()), i64::try_from(target.column).unwrap());
            }
        }
    }

    #[test]
    fn test_plan_gives_up_eventually() {
        let piece = Piece::spawn(PieceKind::I, 10);
        let mut plan = MovePlan::new(Placement::new(PieceKind::I, Rotation::from_index(1), 9));
        let commands: Vec<_> = (0..=MAX_STEERING_COMMANDS)
            .map(|_| plan.next_command(&piece))
            .collect();
        assert_eq!(commands[0], MoveCommand::RotateRight);
        assert_eq!(commands.last(), Some(&MoveCommand::HardDrop));
    }
}

//! Live game state driven tick by tick.
//!
//! - [`GameField`] - locked stack, falling piece and next-piece preview
//! - [`GameSession`] - frame-based gravity, pause and game over on top of a field
//! - [`GameStats`] - score, level and line-clear histogram
//! - [`PieceGenerator`] - seeded piece sequence ([`PieceRule::Uniform`] or [`PieceRule::Bag7`])
//! - [`MovePlan`] - turns a target [`Placement`](crate::Placement) into primitive commands
//!
//! # Example
//!
//! ```
//! use stackwise_engine::{GameField, PieceGenerator, PieceRule};
//!
//! let mut field = GameField::new(10, 20, PieceGenerator::new(PieceRule::Bag7, 1));
//! field.try_move_left().ok();
//! field.try_rotate_right().ok();
//!
//! let (lines_cleared, result) = field.hard_drop();
//! assert_eq!(lines_cleared, 0);
//! assert!(result.is_ok());
//! ```

pub use self::{game_field::*, game_session::*, game_stats::*, move_plan::*, piece_generator::*};

mod game_field;
mod game_session;
mod game_stats;
mod move_plan;
mod piece_generator;

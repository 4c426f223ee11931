//! Placement decisions for a falling-block game.
//!
//! The crate scores boards with eleven weighted heuristics and searches two
//! pieces ahead to pick where the active piece should land.
//!
//! # Architecture
//!
//! ```text
//! Auto play (drives a GameSession, one decision per spawn)
//!     ↓ uses
//! Lookahead search (active × next placements, best combined score)
//!     ↓ uses
//! Mode controller (normal/panic weights from board fill)
//! Evaluator (weighted sum of metrics)
//!     ↓ uses
//! Board analysis (lazily computed metrics)
//! ```
//!
//! # Modules
//!
//! - [`board_analysis`] - cached structural metrics of one board
//! - [`placement_analysis`] - a simulated drop plus the analysis of its result
//! - [`metrics`] - the eleven metrics and their values
//! - [`weights`] - weight profiles, [`weights::select_mode`] and [`weights::weights_for`]
//! - [`evaluator`] - [`evaluator::evaluate`], the weighted score of a board
//! - [`lookahead`] - [`lookahead::choose_best_placement`] and the full [`lookahead::Decision`]
//! - [`auto_play`] - plays a session with the search
//!
//! # Example
//!
//! ```
//! use stackwise_engine::{Board, PieceKind};
//! use stackwise_evaluator::{lookahead::choose_best_placement, weights::{Mode, select_mode}};
//!
//! let board = Board::new(10, 20);
//! assert_eq!(select_mode(&board), Mode::Normal);
//!
//! let placement = choose_best_placement(&board, PieceKind::T, PieceKind::I).unwrap();
//! let outcome = placement.simulate(&board).unwrap();
//! assert_eq!(outcome.board.count_holes(), 0);
//! ```

pub mod auto_play;
pub mod board_analysis;
pub mod evaluator;
pub mod lookahead;
pub mod metrics;
pub mod placement_analysis;
pub mod weights;

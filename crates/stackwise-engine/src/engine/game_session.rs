use std::time::Duration;

use crate::{
    PieceCollisionError,
    core::{
        board::Board,
        piece::{Piece, PieceKind},
    },
};

use super::{GameStats, game_field::GameField, piece_generator::PieceGenerator};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// A game played frame by frame, with gravity and statistics.
///
/// Gravity pulls the falling piece down one row every fall interval; the
/// interval starts at 0.8 s and shrinks by 0.05 s per level down to 0.1 s.
#[derive(Debug, Clone)]
pub struct GameSession {
    field: GameField,
    stats: GameStats,
    session_state: SessionState,
    fps: u64,
    total_frames: u64,
    drop_frames: u64,
}

fn fall_interval_millis(level: usize) -> u64 {
    let level = u64::try_from(level).unwrap_or(u64::MAX);
    800_u64
        .saturating_sub(level.saturating_sub(1).saturating_mul(50))
        .max(100)
}

fn drop_frames(level: usize, fps: u64) -> u64 {
    (fall_interval_millis(level) * fps).div_ceil(1000).max(1)
}

impl GameSession {
    /// # Panics
    ///
    /// Panics if `fps` is zero or the board size is not supported.
    #[must_use]
    pub fn new(fps: u64, width: usize, height: usize, generator: PieceGenerator) -> Self {
        assert!(fps > 0, "fps must be positive");
        let stats = GameStats::new();
        Self {
            field: GameField::new(width, height, generator),
            drop_frames: drop_frames(stats.level(), fps),
            stats,
            session_state: SessionState::Playing,
            fps,
            total_frames: 0,
        }
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.field.board()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Game time elapsed, derived from frames played.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.total_frames.saturating_mul(1000) / self.fps)
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.field.falling_piece()
    }

    #[must_use]
    pub fn next_kind(&self) -> PieceKind {
        self.field.next_kind()
    }

    /// Advances one frame, applying gravity when the fall interval elapses.
    pub fn increment_frame(&mut self) {
        if !self.session_state.is_playing() {
            return;
        }
        self.total_frames += 1;
        self.drop_frames = self.drop_frames.saturating_sub(1);
        if self.drop_frames == 0 {
            self.drop_frames = drop_frames(self.stats.level(), self.fps);
            self.auto_drop_and_complete();
        }
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.field.try_move_left()
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.field.try_move_right()
    }

    pub fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        self.field.try_soft_drop()
    }

    pub fn try_rotate_right(&mut self) -> Result<(), PieceCollisionError> {
        self.field.try_rotate_right()
    }

    pub fn hard_drop_and_complete(&mut self) {
        while self.try_soft_drop().is_ok() {}
        self.complete_piece_drop();
    }

    pub fn auto_drop_and_complete(&mut self) {
        if self.try_soft_drop().is_ok() {
            return;
        }
        self.complete_piece_drop();
    }

    fn complete_piece_drop(&mut self) {
        let (cleared_lines, result) = self.field.complete_piece_drop();
        self.stats.complete_piece_drop(cleared_lines);
        if let Err(e) = result {
            tracing::info!(
                score = self.stats.score(),
                lines = self.stats.total_cleared_lines(),
                pieces = self.stats.completed_pieces(),
                "game over: {e}"
            );
            self.session_state = SessionState::GameOver;
        }
    }
}

//! Driving a [`GameSession`] with the lookahead search.
//!
//! The search runs once per spawned piece. The chosen placement becomes a
//! [`MovePlan`], executed one command per frame until the piece is dropped.

use stackwise_engine::{GameSession, GameStats, MoveCommand, MovePlan, PieceCollisionError};

use crate::{
    lookahead::{EngineError, LookaheadSearch},
    weights::Mode,
};

#[derive(Debug)]
pub struct AutoPlayer {
    session: GameSession,
    search: LookaheadSearch,
    plan: Option<MovePlan>,
    planned_spawn: usize,
    mode: Option<Mode>,
    mode_switches: usize,
}

impl AutoPlayer {
    #[must_use]
    pub fn new(session: GameSession, search: LookaheadSearch) -> Self {
        Self {
            session,
            search,
            plan: None,
            planned_spawn: 0,
            mode: None,
            mode_switches: 0,
        }
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Mode of the most recent decision.
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Number of times the mode changed between consecutive decisions.
    #[must_use]
    pub fn mode_switches(&self) -> usize {
        self.mode_switches
    }

    /// Plays frames until the game ends or `piece_limit` pieces are locked.
    pub fn play(&mut self, piece_limit: usize) -> &GameStats {
        while self.session.session_state().is_playing()
            && self.session.stats().completed_pieces() < piece_limit
        {
            self.increment_frame();
        }
        self.session.stats()
    }

    /// Issues at most one command to the falling piece, then advances a frame.
    pub fn increment_frame(&mut self) {
        if !self.session.session_state().is_playing() {
            return;
        }

        let spawn = self.session.field().spawn_count();
        if self.plan.is_none() || spawn != self.planned_spawn {
            self.plan = self.plan_current_piece().ok();
            self.planned_spawn = spawn;
        }

        let piece = self.session.falling_piece();
        let command = self
            .plan
            .as_mut()
            .map_or(MoveCommand::HardDrop, |plan| plan.next_command(&piece));
        if self.operate(command).is_err() {
            tracing::debug!(%command, "planned move blocked, dropping in place");
            self.session.hard_drop_and_complete();
        }

        self.session.increment_frame();
    }

    fn plan_current_piece(&mut self) -> Result<MovePlan, EngineError> {
        let field = self.session.field();
        let decision = self.search.decide(
            field.board(),
            field.falling_piece().kind(),
            field.next_kind(),
        )?;

        if let Some(previous) = self.mode.replace(decision.mode)
            && previous != decision.mode
        {
            self.mode_switches += 1;
            tracing::info!(from = %previous, to = %decision.mode, "mode switched");
        }
        if decision.losing {
            tracing::debug!(placement = %decision.placement, "only losing moves left");
        }
        Ok(MovePlan::new(decision.placement))
    }

    fn operate(&mut self, command: MoveCommand) -> Result<(), PieceCollisionError> {
        match command {
            MoveCommand::RotateRight => self.session.try_rotate_right(),
            MoveCommand::Left => self.session.try_move_left(),
            MoveCommand::Right => self.session.try_move_right(),
            MoveCommand::HardDrop => {
                self.session.hard_drop_and_complete();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use stackwise_engine::{PieceGenerator, PieceRule};

    use super::*;
    use crate::lookahead::SearchDepth;

    fn player(seed: u64, rule: PieceRule) -> AutoPlayer {
        let session = GameSession::new(60, 10, 20, PieceGenerator::new(rule, seed));
        AutoPlayer::new(session, LookaheadSearch::default())
    }

    #[test]
    fn test_survives_seeded_run() {
        for (seed, rule) in [(42, PieceRule::Uniform), (7, PieceRule::Bag7)] {
            let mut player = player(seed, rule);
            let stats = player.play(100).clone();
            assert!(
                player.session().session_state().is_playing(),
                "game over with seed {seed}"
            );
            assert_eq!(stats.completed_pieces(), 100);
            assert!(stats.total_cleared_lines() > 0);
            assert_eq!(player.mode(), Some(Mode::Normal));
        }
    }

    #[test]
    fn test_single_depth_player() {
        let session = GameSession::new(60, 10, 20, PieceGenerator::new(PieceRule::Bag7, 11));
        let search = LookaheadSearch::default().with_depth(SearchDepth::Single);
        let mut player = AutoPlayer::new(session, search);
        assert_eq!(player.play(30).completed_pieces(), 30);
        assert!(player.session().session_state().is_playing());
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = player(3, PieceRule::Uniform);
        let mut b = player(3, PieceRule::Uniform);
        a.play(30);
        b.play(30);
        assert_eq!(a.session().stats(), b.session().stats());
        assert_eq!(a.session().board(), b.session().board());
    }
}

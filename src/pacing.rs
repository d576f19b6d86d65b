//! Move pacing: the cosmetic thinking delay and cancellable pending moves.
//!
//! The selector decides synchronously. Whoever drives the game decides when
//! the decision is applied: it takes a [`PendingMove`] ticket from a
//! [`MoveScheduler`], waits out the delay, and commits. Cancelling or
//! resetting the scheduler invalidates every ticket issued before it, so a
//! late commit can never land on a board that has since been reset.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Error, Result,
    tictactoe::{GameOutcome, GameSession, Mark},
};

/// Thinking-delay schedule in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThinkingDelayConfig {
    pub base_ms: u64,
    /// Delay right after the human wins a game
    pub post_win_ms: u64,
    /// Amount the delay shrinks each new round until it is back at `base_ms`
    pub decay_ms: u64,
}

impl Default for ThinkingDelayConfig {
    fn default() -> Self {
        ThinkingDelayConfig {
            base_ms: 500,
            post_win_ms: 1500,
            decay_ms: 100,
        }
    }
}

impl ThinkingDelayConfig {
    /// No delay at all; for scripted play.
    pub fn instant() -> Self {
        ThinkingDelayConfig {
            base_ms: 0,
            post_win_ms: 0,
            decay_ms: 0,
        }
    }
}

/// Current thinking delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkingDelay {
    config: ThinkingDelayConfig,
    current_ms: u64,
}

impl Default for ThinkingDelay {
    fn default() -> Self {
        Self::new(ThinkingDelayConfig::default())
    }
}

impl ThinkingDelay {
    pub fn new(config: ThinkingDelayConfig) -> Self {
        ThinkingDelay {
            config,
            current_ms: config.base_ms,
        }
    }

    pub fn current(&self) -> Duration {
        Duration::from_millis(self.current_ms)
    }

    /// The human just won: slow down.
    pub fn on_human_win(&mut self) {
        self.current_ms = self.config.post_win_ms.max(self.config.base_ms);
        debug!(delay_ms = self.current_ms, "thinking delay raised");
    }

    /// A new round starts: step back toward the base delay.
    pub fn on_new_round(&mut self) {
        self.current_ms = self
            .current_ms
            .saturating_sub(self.config.decay_ms)
            .max(self.config.base_ms);
    }

    pub fn reset(&mut self) {
        self.current_ms = self.config.base_ms;
    }
}

/// A deferred move, valid only for the scheduler generation that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    generation: u64,
    game_id: String,
    index: usize,
    mark: Mark,
    delay: Duration,
}

impl PendingMove {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// How long the caller should wait before committing
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }
}

/// Issues and validates [`PendingMove`] tickets.
#[derive(Debug, Default)]
pub struct MoveScheduler {
    generation: u64,
}

impl MoveScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Issue a ticket to play `index` for `mark` in `session` after `delay`.
    pub fn schedule(&self, session: &GameSession, index: usize, mark: Mark, delay: Duration) -> PendingMove {
        PendingMove {
            generation: self.generation,
            game_id: session.game_id().to_string(),
            index,
            mark,
            delay,
        }
    }

    /// Invalidate all outstanding tickets.
    pub fn cancel(&mut self) {
        self.generation += 1;
        debug!(generation = self.generation, "pending moves cancelled");
    }

    /// Restart `session` and invalidate all outstanding tickets.
    pub fn reset(&mut self, session: &mut GameSession, first: Mark) {
        self.cancel();
        session.restart(first);
    }

    /// Apply a ticket to `session`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleMove`] if the ticket was cancelled, belongs to
    /// another game, the game is no longer active, or the cell has been
    /// taken. Otherwise any error from [`GameSession::play`].
    pub fn commit(&self, ticket: PendingMove, session: &mut GameSession) -> Result<Option<GameOutcome>> {
        let stale = |reason: &str| Error::StaleMove {
            reason: reason.to_string(),
        };

        if ticket.generation != self.generation {
            return Err(stale("cancelled before it was applied"));
        }
        if ticket.game_id != session.game_id() {
            return Err(stale("issued for a different game"));
        }
        if !session.is_active() {
            return Err(stale("game is no longer active"));
        }
        if !session.board().is_empty_at(ticket.index) {
            return Err(stale("target cell is no longer empty"));
        }

        session.play(ticket.index, ticket.mark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_rises_after_win_then_decays() {
        let mut delay = ThinkingDelay::default();
        assert_eq!(delay.current(), Duration::from_millis(500));

        delay.on_human_win();
        assert_eq!(delay.current(), Duration::from_millis(1500));

        for expected in [1400, 1300, 1200] {
            delay.on_new_round();
            assert_eq!(delay.current(), Duration::from_millis(expected));
        }
        for _ in 0..20 {
            delay.on_new_round();
        }
        assert_eq!(delay.current(), Duration::from_millis(500));
    }

    #[test]
    fn test_commit_applies_fresh_ticket() {
        let scheduler = MoveScheduler::new();
        let mut session = GameSession::with_id("g", Mark::O);
        let ticket = scheduler.schedule(&session, 4, Mark::O, Duration::ZERO);
        assert_eq!(scheduler.commit(ticket, &mut session).unwrap(), None);
        assert!(session.board().is_marked(4, Mark::O));
    }

    #[test]
    fn test_cancel_invalidates_ticket() {
        let mut scheduler = MoveScheduler::new();
        let mut session = GameSession::with_id("g", Mark::O);
        let ticket = scheduler.schedule(&session, 4, Mark::O, Duration::ZERO);
        scheduler.cancel();
        let err = scheduler.commit(ticket, &mut session).unwrap_err();
        assert!(matches!(err, Error::StaleMove { .. }));
        assert!(session.board().is_empty_at(4));
    }

    #[test]
    fn test_reset_invalidates_ticket() {
        let mut scheduler = MoveScheduler::new();
        let mut session = GameSession::with_id("g", Mark::O);
        let ticket = scheduler.schedule(&session, 0, Mark::O, Duration::ZERO);
        scheduler.reset(&mut session, Mark::O);
        assert!(scheduler.commit(ticket, &mut session).is_err());
        assert_eq!(session.board().occupied_count(), 0);
    }

    #[test]
    fn test_paused_game_rejects_ticket() {
        let scheduler = MoveScheduler::new();
        let mut session = GameSession::with_id("g", Mark::O);
        let ticket = scheduler.schedule(&session, 4, Mark::O, Duration::ZERO);
        session.pause();
        assert!(matches!(
            scheduler.commit(ticket, &mut session),
            Err(Error::StaleMove { .. })
        ));
    }

    #[test]
    fn test_taken_cell_rejects_ticket() {
        let scheduler = MoveScheduler::new();
        let mut session = GameSession::with_id("g", Mark::X);
        session.play(4, Mark::X).unwrap();
        let ticket = scheduler.schedule(&session, 4, Mark::O, Duration::ZERO);
        assert!(matches!(
            scheduler.commit(ticket, &mut session),
            Err(Error::StaleMove { .. })
        ));
    }
}

//! The adaptive opponent: move selection plus cross-game learning.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    builder::NemesisBuilder,
    report::StatsReport,
    selector::{Decision, MoveClass, MoveSelector, Turn, pick},
};
use crate::{
    Error, Result,
    learning::{LearningStore, PatternKey},
    tictactoe::{Board, GameResult, GameSession, Mark},
};

/// Number of moves kept in the move log by default
pub const MOVE_LOG_CAPACITY: usize = 1000;

/// Longest prefix learned as an early-game pattern
const EARLY_PATTERN_LEN: usize = 5;

/// Telemetry for one engine move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub index: usize,
    pub move_class: MoveClass,
    pub reasoning: String,
    #[serde(default)]
    pub pattern: Option<PatternKey>,
    /// Board before the move
    pub board: Board,
    pub game_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Adaptive tic-tac-toe opponent.
///
/// Owns the learning store for its lifetime; every learning update is
/// written through before the call returns.
pub struct Nemesis {
    pub(crate) store: LearningStore,
    pub(crate) selector: MoveSelector,
    pub(crate) rng: StdRng,
    pub(crate) ai: Mark,
    pub(crate) avoid_last_losing_move: bool,
    pub(crate) last_losing_move: Option<usize>,
    pub(crate) move_log: VecDeque<MoveRecord>,
    pub(crate) move_log_capacity: usize,
}

impl std::fmt::Debug for Nemesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nemesis")
            .field("ai", &self.ai)
            .field("store", &self.store)
            .field("policy", self.selector.policy())
            .field("moves_logged", &self.move_log.len())
            .finish()
    }
}

impl Nemesis {
    /// Start building an engine over `store`.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use nemesis::adapters::InMemoryRepository;
    /// use nemesis::engine::Nemesis;
    /// use nemesis::learning::LearningStore;
    ///
    /// let store = LearningStore::open(Arc::new(InMemoryRepository::new()), "ai");
    /// let engine = Nemesis::builder(store).seed(42).build()?;
    /// # Ok::<(), nemesis::Error>(())
    /// ```
    pub fn builder(store: LearningStore) -> NemesisBuilder {
        NemesisBuilder::new(store)
    }

    pub fn ai(&self) -> Mark {
        self.ai
    }

    pub fn human(&self) -> Mark {
        self.ai.opponent()
    }

    pub fn store(&self) -> &LearningStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LearningStore {
        &mut self.store
    }

    pub fn selector(&self) -> &MoveSelector {
        &self.selector
    }

    pub fn last_losing_move(&self) -> Option<usize> {
        self.last_losing_move
    }

    /// Logged moves, oldest first
    pub fn move_log(&self) -> impl Iterator<Item = &MoveRecord> {
        self.move_log.iter()
    }

    pub fn adaptation_level(&self) -> u8 {
        self.store.snapshot().adaptation_level()
    }

    /// Decide the engine's move for `session`.
    ///
    /// The session is not modified. A learned pattern the engine decides to
    /// block is added to the blocked set.
    ///
    /// # Errors
    ///
    /// - [`Error::GameOver`] if the session is not active
    /// - [`Error::NotYourTurn`] if it is the human's turn
    /// - [`Error::NoCandidateMove`] if the board is full
    pub fn choose_move(&mut self, session: &GameSession) -> Result<MoveRecord> {
        if !session.is_active() {
            return Err(Error::GameOver);
        }
        let to_move = session.to_move();
        if to_move != self.ai {
            return Err(Error::NotYourTurn {
                expected: to_move,
                got: self.ai,
            });
        }

        let board = *session.board();
        let human_sequence = session.sequence_of(self.human());
        let avoid = self.avoid_last_losing_move.then_some(self.last_losing_move).flatten();
        let turn = Turn {
            board: &board,
            ai: self.ai,
            human_sequence: &human_sequence,
            book: self.store.book(),
            win_rate: self.store.stats().win_rate(),
            avoid,
            adaptation_level: self.adaptation_level(),
        };

        let decision = match self.selector.select(&turn, &mut self.rng) {
            Ok(decision) if board.is_empty_at(decision.index) => decision,
            Ok(decision) => {
                warn!(
                    index = decision.index,
                    class = %decision.move_class,
                    "selector chose an occupied cell; playing a random legal move"
                );
                self.fallback(&board, avoid)?
            }
            Err(Error::NoCandidateMove) => return Err(Error::NoCandidateMove),
            Err(e) => {
                warn!(error = %e, "selector failed; playing a random legal move");
                self.fallback(&board, avoid)?
            }
        };

        if decision.move_class.is_pattern_block() {
            if let Some(key) = &decision.pattern {
                self.store.mark_blocked(key.clone());
            }
        }

        let record = MoveRecord {
            index: decision.index,
            move_class: decision.move_class,
            reasoning: decision.reasoning,
            pattern: decision.pattern,
            board,
            game_id: session.game_id().to_string(),
            timestamp: Utc::now(),
        };
        self.log_move(record.clone());
        Ok(record)
    }

    /// Choose a move and apply it to `session`.
    pub fn play_turn(&mut self, session: &mut GameSession) -> Result<MoveRecord> {
        let record = self.choose_move(session)?;
        session.play(record.index, self.ai)?;
        Ok(record)
    }

    /// Feed a finished game back into learning and the aggregate stats.
    ///
    /// With the human's sequence `s`:
    /// - a human win with `|s| >= 3` learns `s` in full
    /// - `|s| >= 2` learns the two-move opening
    /// - `|s| >= 3` learns the first `min(5, |s|)` moves
    ///
    /// # Errors
    ///
    /// Returns [`Error::GameInProgress`] if the session has no outcome yet.
    pub fn record_result(&mut self, session: &GameSession, source: &str) -> Result<GameResult> {
        let outcome = session.outcome().ok_or(Error::GameInProgress)?;
        let result = GameResult::from_outcome(outcome, self.ai);
        let sequence = session.sequence_of(self.human());
        let sample = *session.board();

        if result == GameResult::Loss && sequence.len() >= 3 {
            self.store.learn_sequence(source, &sequence, Some(&sample))?;
        }
        if sequence.len() >= 2 {
            self.store.learn_sequence(source, &sequence[..2], Some(&sample))?;
        }
        if sequence.len() >= 3 {
            let end = sequence.len().min(EARLY_PATTERN_LEN);
            self.store.learn_sequence(source, &sequence[..end], Some(&sample))?;
        }

        self.store.record_result(result);

        if result == GameResult::Loss {
            self.last_losing_move = session.last_move_of(self.ai);
            debug!(cell = ?self.last_losing_move, "remembering losing move");
        }

        let stats = self.store.stats();
        info!(
            game_id = session.game_id(),
            result = ?result,
            win_rate = stats.win_rate(),
            adaptation = self.adaptation_level(),
            "game recorded"
        );
        Ok(result)
    }

    /// Snapshot of stats, learned patterns and the ten latest moves
    pub fn stats_report(&self) -> StatsReport {
        StatsReport::new(self.store.snapshot())
            .with_recent_moves(self.move_log.iter().rev().take(10).rev().cloned().collect())
            .with_last_losing_move(self.last_losing_move)
    }

    fn fallback(&mut self, board: &Board, avoid: Option<usize>) -> Result<Decision> {
        let empty = board.empty_positions();
        let index = pick(&empty, avoid, &mut self.rng).ok_or(Error::NoCandidateMove)?;
        Ok(Decision {
            index,
            move_class: MoveClass::Fallback,
            reasoning: "random legal move".to_string(),
            pattern: None,
        })
    }

    fn log_move(&mut self, record: MoveRecord) {
        self.move_log.push_back(record);
        while self.move_log.len() > self.move_log_capacity {
            self.move_log.pop_front();
        }
    }
}

//! Game session: the board plus the per-game move history

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::board::{Board, Mark};

/// A move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub position: usize,
    pub mark: Mark,
}

/// Outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Mark),
    Draw,
}

/// A finished game seen from the engine's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    pub fn from_outcome(outcome: GameOutcome, engine: Mark) -> Self {
        match outcome {
            GameOutcome::Win(mark) if mark == engine => GameResult::Win,
            GameOutcome::Win(_) => GameResult::Loss,
            GameOutcome::Draw => GameResult::Draw,
        }
    }
}

/// One game in progress.
///
/// The UI or network layer owns the session and hands it to the engine by
/// reference; nothing in the core holds on to it between turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    game_id: String,
    board: Board,
    first: Mark,
    moves: Vec<Move>,
    outcome: Option<GameOutcome>,
    paused: bool,
}

impl GameSession {
    /// Start a game that `first` opens
    pub fn new(first: Mark) -> Self {
        let game_id = format!("game_{}", Utc::now().format("%Y%m%d%H%M%S%3f"));
        Self::with_id(game_id, first)
    }

    pub fn with_id(game_id: impl Into<String>, first: Mark) -> Self {
        GameSession {
            game_id: game_id.into(),
            board: Board::new(),
            first,
            moves: Vec::new(),
            outcome: None,
            paused: false,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn first(&self) -> Mark {
        self.first
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Whose turn it is
    pub fn to_move(&self) -> Mark {
        self.board.to_move(self.first)
    }

    /// True while moves may be applied: not finished and not paused
    pub fn is_active(&self) -> bool {
        self.outcome.is_none() && !self.paused
    }

    /// Administrative pause; moves are refused until [`GameSession::resume`].
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Cell indices chosen by `mark`, in chronological order
    pub fn sequence_of(&self, mark: Mark) -> Vec<usize> {
        self.moves
            .iter()
            .filter(|m| m.mark == mark)
            .map(|m| m.position)
            .collect()
    }

    /// The last cell `mark` played, if any
    pub fn last_move_of(&self, mark: Mark) -> Option<usize> {
        self.moves
            .iter()
            .rev()
            .find(|m| m.mark == mark)
            .map(|m| m.position)
    }

    /// Apply one move.
    ///
    /// Returns the outcome if this move ended the game.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::GameOver`] if the game is finished or paused
    /// - [`crate::Error::NotYourTurn`] if `mark` is not the side to move
    /// - [`crate::Error::InvalidMove`] / [`crate::Error::InvalidPosition`] from the board
    pub fn play(&mut self, position: usize, mark: Mark) -> Result<Option<GameOutcome>, crate::Error> {
        if !self.is_active() {
            return Err(crate::Error::GameOver);
        }
        let expected = self.to_move();
        if mark != expected {
            return Err(crate::Error::NotYourTurn {
                expected,
                got: mark,
            });
        }

        self.board.place(position, mark)?;
        self.moves.push(Move { position, mark });

        if let Some(winner) = self.board.winner() {
            self.outcome = Some(GameOutcome::Win(winner));
        } else if self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
        }

        Ok(self.outcome)
    }

    /// Clear the board for a new game opened by `first`
    pub fn restart(&mut self, first: Mark) {
        *self = Self::new(first);
    }
}

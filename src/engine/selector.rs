//! Per-turn move selection: a strict priority cascade over move classes.

use std::fmt;

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    adaptation::{DifficultyPolicy, Mode, roll},
    search,
};
use crate::{
    Error, Result,
    learning::{PatternBook, PatternKey},
    tictactoe::{Board, CENTER, CORNERS, EDGES, LineAnalyzer, Mark},
};

/// Opposite-corner pairs
const CORNER_PAIRS: [(usize, usize); 2] = [(0, 8), (2, 6)];

/// Which rule of the cascade produced a move, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveClass {
    /// Random move while the engine is comfortably ahead
    Chaos,
    PatternBlock,
    EarlyPatternBlock,
    Win,
    BlockWin,
    Fork,
    BlockFork,
    Center,
    OppositeCorner,
    Corner,
    Edge,
    Minimax,
    /// Random legal move after the cascade itself failed
    Fallback,
}

impl MoveClass {
    pub fn label(self) -> &'static str {
        match self {
            MoveClass::Chaos => "chaos",
            MoveClass::PatternBlock => "pattern_block",
            MoveClass::EarlyPatternBlock => "early_pattern_block",
            MoveClass::Win => "win",
            MoveClass::BlockWin => "block",
            MoveClass::Fork => "fork",
            MoveClass::BlockFork => "block_fork",
            MoveClass::Center => "center",
            MoveClass::OppositeCorner => "opposite_corner",
            MoveClass::Corner => "corner",
            MoveClass::Edge => "edge",
            MoveClass::Minimax => "minimax",
            MoveClass::Fallback => "fallback",
        }
    }

    /// True for the positional classes of the strategic step
    pub fn is_strategic(self) -> bool {
        matches!(
            self,
            MoveClass::Center | MoveClass::OppositeCorner | MoveClass::Corner | MoveClass::Edge
        )
    }

    pub fn is_pattern_block(self) -> bool {
        matches!(self, MoveClass::PatternBlock | MoveClass::EarlyPatternBlock)
    }
}

impl fmt::Display for MoveClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The selector's answer for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub index: usize,
    pub move_class: MoveClass,
    pub reasoning: String,
    /// Learned pattern behind a pattern block
    pub pattern: Option<PatternKey>,
}

impl Decision {
    fn new(index: usize, move_class: MoveClass, reasoning: impl Into<String>) -> Self {
        Decision {
            index,
            move_class,
            reasoning: reasoning.into(),
            pattern: None,
        }
    }
}

/// Everything the selector reads for one turn.
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    pub board: &'a Board,
    pub ai: Mark,
    /// The human's moves so far in this game, oldest first
    pub human_sequence: &'a [usize],
    pub book: &'a PatternBook,
    /// Engine win rate as a percentage
    pub win_rate: f64,
    /// Cell to steer away from when a class offers alternatives
    pub avoid: Option<usize>,
    pub adaptation_level: u8,
}

/// Stateless cascade over a [`DifficultyPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveSelector {
    policy: DifficultyPolicy,
}

impl MoveSelector {
    pub fn new(policy: DifficultyPolicy) -> Self {
        MoveSelector { policy }
    }

    pub fn policy(&self) -> &DifficultyPolicy {
        &self.policy
    }

    /// Pick exactly one move.
    ///
    /// Order: chaos (winning mode only), pattern block, early pattern block,
    /// immediate win, block win, fork, block fork, strategic position,
    /// minimax. Ties inside a class are broken uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCandidateMove`] if the board has no empty cell.
    pub fn select<R: Rng + ?Sized>(&self, turn: &Turn<'_>, rng: &mut R) -> Result<Decision> {
        let empty = turn.board.empty_positions();
        if empty.is_empty() {
            return Err(Error::NoCandidateMove);
        }

        let mode = self.policy.mode(turn.win_rate);
        let human = turn.ai.opponent();

        if roll(rng, self.policy.chaos_chance(mode)) {
            if let Some(index) = pick(&empty, turn.avoid, rng) {
                return Ok(Decision::new(index, MoveClass::Chaos, "unpredictable move while ahead"));
            }
        }

        let decision = self
            .pattern_block(turn, mode, rng)
            .or_else(|| self.early_pattern_block(turn, mode, rng))
            .or_else(|| {
                let wins = LineAnalyzer::winning_cells(turn.board.cells(), turn.ai);
                pick(&wins, turn.avoid, rng)
                    .map(|i| Decision::new(i, MoveClass::Win, "immediate winning move"))
            })
            .or_else(|| {
                let blocks = LineAnalyzer::winning_cells(turn.board.cells(), human);
                pick(&blocks, turn.avoid, rng)
                    .map(|i| Decision::new(i, MoveClass::BlockWin, "blocking opponent win"))
            })
            .or_else(|| {
                let forks = fork_cells(turn.board, turn.ai);
                pick(&forks, turn.avoid, rng)
                    .map(|i| Decision::new(i, MoveClass::Fork, "creating fork (multiple threats)"))
            })
            .or_else(|| {
                let forks = fork_cells(turn.board, human);
                pick(&forks, turn.avoid, rng)
                    .map(|i| Decision::new(i, MoveClass::BlockFork, "blocking opponent fork"))
            })
            .or_else(|| strategic(turn.board, human, turn.avoid, rng))
            .or_else(|| Self::minimax(turn.board, turn.ai));

        let decision = decision.ok_or(Error::NoCandidateMove)?;
        debug!(
            index = decision.index,
            class = %decision.move_class,
            mode = ?mode,
            "move selected"
        );
        Ok(decision)
    }

    /// Exact-search move, deterministic.
    pub fn minimax(board: &Board, ai: Mark) -> Option<Decision> {
        search::best_move(board, ai)
            .map(|i| Decision::new(i, MoveClass::Minimax, "minimax best move"))
    }

    fn pattern_block<R: Rng + ?Sized>(&self, turn: &Turn<'_>, mode: Mode, rng: &mut R) -> Option<Decision> {
        if turn.human_sequence.is_empty() {
            return None;
        }

        let advice = turn
            .book
            .should_block(turn.board, turn.human_sequence, turn.ai.opponent());
        let next = advice.next_expected_index()?;

        if !roll(rng, self.policy.pattern_block_chance(mode)) {
            debug!(next, "pattern block gate failed");
            return None;
        }

        let pattern = advice.pattern().cloned();
        let reasoning = match &pattern {
            Some(key) => format!(
                "blocking learned win pattern {key} (confidence {}, adaptation {}%)",
                advice.confidence(),
                turn.adaptation_level
            ),
            None => "blocking learned win pattern".to_string(),
        };
        Some(Decision {
            index: next,
            move_class: MoveClass::PatternBlock,
            reasoning,
            pattern,
        })
    }

    fn early_pattern_block<R: Rng + ?Sized>(
        &self,
        turn: &Turn<'_>,
        mode: Mode,
        rng: &mut R,
    ) -> Option<Decision> {
        let candidates =
            turn.book
                .early_block_candidates(turn.board, turn.human_sequence, turn.ai.opponent());
        if candidates.is_empty() {
            return None;
        }

        if !roll(rng, self.policy.early_block_chance(mode)) {
            debug!(candidates = candidates.len(), "early block gate failed");
            return None;
        }

        let (key, next) = candidates.choose(rng)?.clone();
        Some(Decision {
            index: next,
            move_class: MoveClass::EarlyPatternBlock,
            reasoning: format!("preventing known pattern early: {key}"),
            pattern: Some(key),
        })
    }
}

/// Empty cells where `mark` would hold two or more open threats
pub fn fork_cells(board: &Board, mark: Mark) -> Vec<usize> {
    let mut scratch = *board;
    (0..9)
        .filter(|&i| {
            scratch
                .probe(i, mark, |b| b.count_immediate_threats(mark) >= 2)
                .unwrap_or(false)
        })
        .collect()
}

/// Corner opposite one the human holds, if that corner is empty
pub fn opposite_corner(board: &Board, human: Mark) -> Option<usize> {
    CORNER_PAIRS.iter().find_map(|&(a, b)| {
        if board.is_marked(a, human) && board.is_empty_at(b) {
            Some(b)
        } else if board.is_marked(b, human) && board.is_empty_at(a) {
            Some(a)
        } else {
            None
        }
    })
}

fn strategic<R: Rng + ?Sized>(
    board: &Board,
    human: Mark,
    avoid: Option<usize>,
    rng: &mut R,
) -> Option<Decision> {
    if board.is_empty_at(CENTER) {
        return Some(Decision::new(CENTER, MoveClass::Center, "taking center"));
    }
    if let Some(corner) = opposite_corner(board, human) {
        return Some(Decision::new(corner, MoveClass::OppositeCorner, "opposite corner"));
    }

    let corners: Vec<usize> = CORNERS.into_iter().filter(|&i| board.is_empty_at(i)).collect();
    if let Some(i) = pick(&corners, avoid, rng) {
        return Some(Decision::new(i, MoveClass::Corner, "empty corner"));
    }

    let edges: Vec<usize> = EDGES.into_iter().filter(|&i| board.is_empty_at(i)).collect();
    pick(&edges, avoid, rng).map(|i| Decision::new(i, MoveClass::Edge, "empty edge"))
}

/// Uniform choice, skipping `avoid` whenever another candidate exists
pub(crate) fn pick<R: Rng + ?Sized>(candidates: &[usize], avoid: Option<usize>, rng: &mut R) -> Option<usize> {
    match avoid {
        Some(cell) if candidates.len() > 1 && candidates.contains(&cell) => {
            let rest: Vec<usize> = candidates.iter().copied().filter(|&i| i != cell).collect();
            rest.choose(rng).copied()
        }
        _ => candidates.choose(rng).copied(),
    }
}

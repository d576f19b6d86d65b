//! Scripted challengers for sparring

use std::str::FromStr;

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    engine::search,
    ports::Challenger,
    tictactoe::{Board, Mark},
};

/// Built-in challenger kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengerKind {
    /// Uniformly random legal moves
    Random,
    /// Minimax best move
    Optimal,
    /// Replays a fixed opening, then takes wins and blocks
    Habit,
}

impl FromStr for ChallengerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(ChallengerKind::Random),
            "optimal" | "minimax" => Ok(ChallengerKind::Optimal),
            "habit" | "habitual" => Ok(ChallengerKind::Habit),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown challenger '{other}' (expected random, optimal or habit)"),
            }),
        }
    }
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(value) => StdRng::seed_from_u64(value),
        None => StdRng::seed_from_u64(rand::random::<u64>()),
    }
}

fn random_cell(board: &Board, rng: &mut StdRng) -> Result<usize> {
    board
        .empty_positions()
        .choose(rng)
        .copied()
        .ok_or(Error::NoCandidateMove)
}

/// Random challenger - uniformly random legal moves
pub struct RandomChallenger {
    name: String,
    rng: StdRng,
}

impl RandomChallenger {
    pub fn new(name: impl Into<String>, seed: Option<u64>) -> Self {
        Self {
            name: name.into(),
            rng: seeded(seed),
        }
    }
}

impl Challenger for RandomChallenger {
    fn select_move(&mut self, board: &Board, _mark: Mark) -> Result<usize> {
        random_cell(board, &mut self.rng)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Optimal challenger - always plays the minimax best move
pub struct OptimalChallenger {
    name: String,
}

impl OptimalChallenger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Challenger for OptimalChallenger {
    fn select_move(&mut self, board: &Board, mark: Mark) -> Result<usize> {
        search::best_move(board, mark).ok_or(Error::NoCandidateMove)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A player with a favourite opening.
///
/// Plays the next cell of `opening` whenever it is still free, except that
/// an immediate win or a forced block comes first. Off-script it plays
/// randomly. This is the kind of habit the pattern book is built to catch.
pub struct HabitChallenger {
    name: String,
    opening: Vec<usize>,
    played: usize,
    rng: StdRng,
}

/// The diagonal opening most people default to
pub const DEFAULT_HABIT: [usize; 3] = [0, 4, 8];

impl HabitChallenger {
    pub fn new(name: impl Into<String>, opening: Vec<usize>, seed: Option<u64>) -> Self {
        Self {
            name: name.into(),
            opening,
            played: 0,
            rng: seeded(seed),
        }
    }

    pub fn opening(&self) -> &[usize] {
        &self.opening
    }
}

impl Challenger for HabitChallenger {
    fn select_move(&mut self, board: &Board, mark: Mark) -> Result<usize> {
        let mut scratch = *board;
        let wins = (0..9).find(|&i| scratch.probe(i, mark, |b| b.check_win(mark)).unwrap_or(false));
        let blocks = (0..9).find(|&i| {
            scratch
                .probe(i, mark.opponent(), |b| b.check_win(mark.opponent()))
                .unwrap_or(false)
        });

        let scripted = self
            .opening
            .iter()
            .skip(self.played)
            .copied()
            .find(|&i| board.is_empty_at(i));

        let choice = match (wins, blocks, scripted) {
            (Some(win), _, _) => win,
            (None, Some(block), _) => block,
            (None, None, Some(next)) => next,
            (None, None, None) => random_cell(board, &mut self.rng)?,
        };

        if scripted == Some(choice) {
            self.played += 1;
        }
        Ok(choice)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.played = 0;
    }
}

/// Build a boxed challenger of `kind`
pub fn challenger(kind: ChallengerKind, seed: Option<u64>) -> Box<dyn Challenger> {
    match kind {
        ChallengerKind::Random => Box::new(RandomChallenger::new("random", seed)),
        ChallengerKind::Optimal => Box::new(OptimalChallenger::new("optimal")),
        ChallengerKind::Habit => {
            Box::new(HabitChallenger::new("habit", DEFAULT_HABIT.to_vec(), seed))
        }
    }
}

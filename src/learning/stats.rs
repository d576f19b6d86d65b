//! Aggregate win/loss/draw counters from the engine's perspective

use serde::{Deserialize, Serialize};

use crate::tictactoe::GameResult;

/// Raw result counters.
///
/// Only [`AggregateStats::record`] increments them; [`AggregateStats::merge`]
/// takes the maximum of each counter, so merging never double-counts and
/// never decreases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub total_games: u64,
}

impl AggregateStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished game
    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Loss => self.losses += 1,
            GameResult::Draw => self.draws += 1,
        }
        self.total_games += 1;
    }

    /// Games played, never less than the sum of the counters
    pub fn total(&self) -> u64 {
        self.total_games.max(self.wins + self.losses + self.draws)
    }

    /// Win rate as a percentage in `0.0..=100.0`; zero before any game
    pub fn win_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.wins as f64 / total as f64) * 100.0
        }
    }

    /// Below 50% wins the engine plays in losing mode
    pub fn is_losing(&self, threshold: f64) -> bool {
        self.win_rate() < threshold
    }

    /// Per-counter max merge
    pub fn merge(&mut self, other: &AggregateStats) {
        self.wins = self.wins.max(other.wins);
        self.losses = self.losses.max(other.losses);
        self.draws = self.draws.max(other.draws);
        self.total_games = self
            .total_games
            .max(other.total_games)
            .max(self.wins + self.losses + self.draws);
    }
}

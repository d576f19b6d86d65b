//! Observers for sparring sessions

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    engine::{MoveClass, MoveRecord},
    ports::GameObserver,
    tictactoe::{GameResult, Mark},
};

/// Progress bar observer - Shows sparring progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn tally(&self) -> String {
        format!("{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl GameObserver for ProgressObserver {
    fn on_session_start(&mut self, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, result: GameResult) -> Result<()> {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::Loss => self.losses += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(game_num as u64 + 1);
            pb.set_message(self.tally());
        }
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.tally());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks results and how often each move class fires
#[derive(Debug, Default)]
pub struct MetricsObserver {
    wins: usize,
    draws: usize,
    losses: usize,
    engine_first: usize,
    move_counts: Vec<usize>,
    current_moves: usize,
    pattern_blocks: usize,
    minimax_moves: usize,
    chaos_moves: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_games(&self) -> usize {
        self.wins + self.draws + self.losses
    }

    /// Engine win rate as a percentage in `0.0..=100.0`
    pub fn win_rate(&self) -> f64 {
        percentage(self.wins, self.total_games())
    }

    /// Engine loss rate as a percentage
    pub fn loss_rate(&self) -> f64 {
        percentage(self.losses, self.total_games())
    }

    /// Get average game length in plies
    pub fn avg_game_length(&self) -> f64 {
        if self.move_counts.is_empty() {
            0.0
        } else {
            self.move_counts.iter().sum::<usize>() as f64 / self.move_counts.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_games: self.total_games(),
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            engine_first: self.engine_first,
            win_rate: self.win_rate(),
            loss_rate: self.loss_rate(),
            avg_game_length: self.avg_game_length(),
            pattern_blocks: self.pattern_blocks,
            minimax_moves: self.minimax_moves,
            chaos_moves: self.chaos_moves,
        }
    }
}

fn percentage(n: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        n as f64 / total as f64 * 100.0
    }
}

/// Summary of sparring metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    /// Games the engine opened
    pub engine_first: usize,
    /// Percentage, like every win rate in the crate
    pub win_rate: f64,
    pub loss_rate: f64,
    pub avg_game_length: f64,
    pub pattern_blocks: usize,
    pub minimax_moves: usize,
    pub chaos_moves: usize,
}

impl GameObserver for MetricsObserver {
    fn on_game_start(&mut self, _game_num: usize, _first: Mark) -> Result<()> {
        self.current_moves = 0;
        Ok(())
    }

    fn on_engine_move(&mut self, _game_num: usize, record: &MoveRecord) -> Result<()> {
        if self.current_moves == 0 {
            self.engine_first += 1;
        }
        self.current_moves += 1;
        match record.move_class {
            MoveClass::PatternBlock | MoveClass::EarlyPatternBlock => self.pattern_blocks += 1,
            MoveClass::Minimax => self.minimax_moves += 1,
            MoveClass::Chaos => self.chaos_moves += 1,
            _ => {}
        }
        Ok(())
    }

    fn on_challenger_move(&mut self, _game_num: usize, _position: usize) -> Result<()> {
        self.current_moves += 1;
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, result: GameResult) -> Result<()> {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::Loss => self.losses += 1,
        }
        self.move_counts.push(self.current_moves);
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        let summary = self.summary();
        info!(
            games = summary.total_games,
            engine_first = summary.engine_first,
            win_rate = summary.win_rate,
            avg_game_length = summary.avg_game_length,
            pattern_blocks = summary.pattern_blocks,
            minimax_moves = summary.minimax_moves,
            chaos_moves = summary.chaos_moves,
            "sparring metrics"
        );
        Ok(())
    }
}

//! Sparring pipeline: the engine against a scripted challenger, with every
//! result fed back into learning.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    engine::Nemesis,
    ports::{Challenger, GameObserver},
    tictactoe::{GameResult, GameSession, Mark},
};

/// Sparring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SparringConfig {
    /// Number of games to play
    pub games: usize,

    /// Which side opens the first game
    pub first: Mark,

    /// Swap the opening side after every game
    pub alternate_first: bool,
}

impl Default for SparringConfig {
    fn default() -> Self {
        Self {
            games: 100,
            first: Mark::X,
            alternate_first: true,
        }
    }
}

/// Result of a sparring run, from the engine's perspective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparringResult {
    pub total_games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    /// Win rate over this run as a percentage
    pub win_rate: f64,
    /// Adaptation level after the run
    pub adaptation_level: u8,
    pub learned_patterns: usize,
    pub blocked_patterns: usize,
}

impl SparringResult {
    fn new(wins: usize, draws: usize, losses: usize, engine: &Nemesis) -> Self {
        let total_games = wins + draws + losses;
        let win_rate = if total_games > 0 {
            wins as f64 / total_games as f64 * 100.0
        } else {
            0.0
        };
        let book = engine.store().book();
        Self {
            total_games,
            wins,
            draws,
            losses,
            win_rate,
            adaptation_level: engine.adaptation_level(),
            learned_patterns: book.len(),
            blocked_patterns: book.blocked().len(),
        }
    }
}

/// Plays a series of games between the engine and one challenger
pub struct SparringPipeline {
    config: SparringConfig,
    observers: Vec<Box<dyn GameObserver>>,
}

impl SparringPipeline {
    pub fn new(config: SparringConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn GameObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &SparringConfig {
        &self.config
    }

    /// Play all configured games.
    pub fn run(&mut self, engine: &mut Nemesis, challenger: &mut dyn Challenger) -> Result<SparringResult> {
        for observer in &mut self.observers {
            observer.on_session_start(self.config.games)?;
        }

        let (mut wins, mut draws, mut losses) = (0, 0, 0);
        let mut first = self.config.first;

        for game_num in 0..self.config.games {
            match self.play_game(game_num, engine, challenger, first)? {
                GameResult::Win => wins += 1,
                GameResult::Draw => draws += 1,
                GameResult::Loss => losses += 1,
            }
            if self.config.alternate_first {
                first = first.opponent();
            }
        }

        for observer in &mut self.observers {
            observer.on_session_end()?;
        }

        let result = SparringResult::new(wins, draws, losses, engine);
        info!(
            challenger = challenger.name(),
            games = result.total_games,
            wins,
            draws,
            losses,
            adaptation = result.adaptation_level,
            "sparring finished"
        );
        Ok(result)
    }

    /// Play one game and record its result.
    pub fn play_game(
        &mut self,
        game_num: usize,
        engine: &mut Nemesis,
        challenger: &mut dyn Challenger,
        first: Mark,
    ) -> Result<GameResult> {
        challenger.reset();
        for observer in &mut self.observers {
            observer.on_game_start(game_num, first)?;
        }

        let mut session = GameSession::with_id(format!("spar_{game_num}"), first);
        let human = engine.human();

        while session.is_active() {
            if session.to_move() == engine.ai() {
                let record = engine.play_turn(&mut session)?;
                for observer in &mut self.observers {
                    observer.on_engine_move(game_num, &record)?;
                }
            } else {
                let position = challenger.select_move(session.board(), human)?;
                session.play(position, human)?;
                for observer in &mut self.observers {
                    observer.on_challenger_move(game_num, position)?;
                }
            }
        }

        let result = engine.record_result(&session, challenger.name())?;
        for observer in &mut self.observers {
            observer.on_game_end(game_num, result)?;
        }
        Ok(result)
    }
}

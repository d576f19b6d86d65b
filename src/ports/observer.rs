//! Observer port - hooks for watching a sparring session
//!
//! Observers collect progress and metrics without coupling the game loop to
//! any output format.

use crate::{Result, engine::MoveRecord, tictactoe::{GameResult, Mark}};

/// Observer of engine games.
///
/// # Event Sequence
///
/// 1. `on_session_start(total_games)` - once
/// 2. For each game:
///    - `on_game_start(game_num, first)`
///    - `on_engine_move(...)` / `on_challenger_move(...)` - per move
///    - `on_game_end(game_num, result)`
/// 3. `on_session_end()` - once
///
/// Every method defaults to doing nothing.
///
/// # Examples
///
/// ```no_run
/// use nemesis::{ports::GameObserver, tictactoe::GameResult};
///
/// struct LossCounter {
///     losses: usize,
/// }
///
/// impl GameObserver for LossCounter {
///     fn on_game_end(&mut self, _game_num: usize, result: GameResult) -> nemesis::Result<()> {
///         if result == GameResult::Loss {
///             self.losses += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait GameObserver: Send {
    fn on_session_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    fn on_game_start(&mut self, _game_num: usize, _first: Mark) -> Result<()> {
        Ok(())
    }

    /// Called after the engine's move is applied.
    fn on_engine_move(&mut self, _game_num: usize, _record: &MoveRecord) -> Result<()> {
        Ok(())
    }

    /// Called after the challenger's move is applied.
    fn on_challenger_move(&mut self, _game_num: usize, _position: usize) -> Result<()> {
        Ok(())
    }

    /// Called once the result has been fed back into learning.
    ///
    /// `result` is from the engine's perspective.
    fn on_game_end(&mut self, _game_num: usize, _result: GameResult) -> Result<()> {
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        Ok(())
    }
}

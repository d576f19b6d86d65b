//! Challenger port: the human side of a game, as seen by simulated play.
//!
//! The sparring pipeline drives the engine against challengers. A challenger
//! may be a scripted bot, a replayed recording or a terminal prompt.

use crate::{
    Result,
    tictactoe::{Board, Mark},
};

/// A player facing the engine.
///
/// # Examples
///
/// ```no_run
/// use nemesis::{ports::Challenger, tictactoe::{Board, Mark}};
///
/// struct FirstFree;
///
/// impl Challenger for FirstFree {
///     fn select_move(&mut self, board: &Board, _mark: Mark) -> nemesis::Result<usize> {
///         board
///             .empty_positions()
///             .first()
///             .copied()
///             .ok_or(nemesis::Error::NoCandidateMove)
///     }
///
///     fn name(&self) -> &str {
///         "first-free"
///     }
/// }
/// ```
pub trait Challenger: Send {
    /// Pick a cell (0-8) to play with `mark` on `board`.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid move is available.
    fn select_move(&mut self, board: &Board, mark: Mark) -> Result<usize>;

    /// Challenger name, used in logs and as the learning source id.
    fn name(&self) -> &str;

    /// Called before each game. Default: nothing.
    fn reset(&mut self) {}
}

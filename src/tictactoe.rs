//! Tic-Tac-Toe board model and game sessions

pub mod board;
pub mod game;
pub mod lines;

pub use board::{Board, CENTER, CORNERS, Cell, EDGES, Mark, SEARCH_ORDER};
pub use game::{GameOutcome, GameResult, GameSession, Move};
pub use lines::{LineAnalyzer, WINNING_LINES};

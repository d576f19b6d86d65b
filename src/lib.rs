//! Nemesis: an adaptive tic-tac-toe opponent
//!
//! This crate provides:
//! - Tic-Tac-Toe board model and game sessions
//! - Exact minimax search with centre/corner/edge ordering
//! - A priority-cascade move selector with win-rate driven difficulty
//! - Cross-session learning of the human's move sequences, with prefix
//!   matching to intercept a habit before it completes
//! - Durable, mergeable learning snapshots (JSON or MessagePack)
//! - Cancellable thinking-delay pacing and a sparring pipeline

pub mod adapters;
pub mod app;
pub mod cli;
pub mod engine;
pub mod error;
pub mod learning;
pub mod pacing;
pub mod pipeline;
pub mod ports;
pub mod tictactoe;

pub use engine::{Decision, MoveClass, MoveRecord, Nemesis, NemesisBuilder, StatsReport};
pub use error::{Error, Result};
pub use learning::{BlockAdvice, LearningSnapshot, LearningStore, PatternBook, PatternKey};
pub use tictactoe::{Board, GameResult, GameSession, Mark};

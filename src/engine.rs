//! Adaptive opponent engine.
//!
//! - [`search`]: exact minimax with centre/corner/edge move ordering
//! - [`selector`]: the per-turn priority cascade
//! - [`adaptation`]: losing/winning mode, gate probabilities, adaptation level
//! - [`agent`]: the [`Nemesis`] opponent tying these to the learning store

pub mod adaptation;
pub mod agent;
pub mod builder;
pub mod report;
pub mod search;
pub mod selector;

pub use adaptation::{DifficultyPolicy, Mode, adaptation_level};
pub use agent::{MOVE_LOG_CAPACITY, MoveRecord, Nemesis};
pub use builder::NemesisBuilder;
pub use report::{PatternReport, StatsReport};
pub use search::{best_move, minimax, scored_moves};
pub use selector::{Decision, MoveClass, MoveSelector, Turn, fork_cells, opposite_corner};

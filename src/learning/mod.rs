//! Cross-session pattern learning.
//!
//! The engine remembers the cell sequences a human played (full winning
//! lines, two-move openings and early-game prefixes) and checks each new
//! game against them to predict and pre-empt the next cell.

pub mod book;
pub mod pattern;
pub mod snapshot;
pub mod stats;
pub mod store;

pub use book::{BlockAdvice, PatternBook};
pub use pattern::{LearnedPatternEntry, MAX_BOARD_SAMPLES, PatternKey};
pub use snapshot::{LearningSnapshot, SNAPSHOT_VERSION};
pub use stats::AggregateStats;
pub use store::{LearningStore, SharedRepository};

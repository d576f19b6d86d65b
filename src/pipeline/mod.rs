//! Sparring pipeline
//!
//! Plays the engine against scripted challengers so it can learn habits
//! offline, with composable observers for progress and metrics.

pub mod challengers;
pub mod observers;
pub mod sparring;

pub use challengers::{
    ChallengerKind, DEFAULT_HABIT, HabitChallenger, OptimalChallenger, RandomChallenger,
    challenger,
};
pub use observers::{MetricsObserver, MetricsSummary, ProgressObserver};
pub use sparring::{SparringConfig, SparringPipeline, SparringResult};

pub use crate::ports::{Challenger, GameObserver};

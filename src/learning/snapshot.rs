//! The persisted unit: pattern book plus aggregate stats

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{book::PatternBook, stats::AggregateStats};
use crate::engine::adaptation::adaptation_level;

/// Current version of the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Everything the engine has learned, as written to and read from a repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub book: PatternBook,
    #[serde(default)]
    pub stats: AggregateStats,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl LearningSnapshot {
    pub fn new() -> Self {
        LearningSnapshot {
            version: SNAPSHOT_VERSION,
            ..Self::default()
        }
    }

    /// Derived 0-100 adaptation score for this snapshot
    pub fn adaptation_level(&self) -> u8 {
        adaptation_level(
            self.book.len(),
            self.book.blocked().len(),
            self.stats.win_rate(),
        )
    }

    /// Merge a snapshot from another source.
    ///
    /// Per field: pattern counts max, contributors union, first/last seen
    /// min/max, blocked set union, stats counters max. The result does not
    /// depend on merge order and repeating a merge changes nothing.
    pub fn merge_from(&mut self, remote: &LearningSnapshot) {
        self.book.merge_from(&remote.book);
        self.stats.merge(&remote.stats);
    }
}

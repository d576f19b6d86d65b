//! Write-through handle over a learning repository

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{book::PatternBook, pattern::PatternKey, snapshot::LearningSnapshot, stats::AggregateStats};
use crate::{
    Error, Result,
    ports::LearningRepository,
    tictactoe::{Board, GameResult},
};

/// Shared repository handle
pub type SharedRepository = Arc<dyn LearningRepository + Send + Sync>;

/// Scoped acquisition of the learning store.
///
/// Opening loads the snapshot (falling back to an empty one when the store is
/// missing or unreadable). Every mutating call writes the snapshot back before
/// returning. A failed write is logged and the store stays dirty, so the next
/// mutation retries it; dropping a dirty store makes one last attempt.
pub struct LearningStore {
    repository: SharedRepository,
    location: PathBuf,
    snapshot: LearningSnapshot,
    dirty: bool,
}

impl std::fmt::Debug for LearningStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearningStore")
            .field("location", &self.location)
            .field("patterns", &self.snapshot.book.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl LearningStore {
    /// Open the store at `location`, degrading to an empty snapshot on failure.
    pub fn open(repository: SharedRepository, location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        let snapshot = if repository.exists(&location) {
            match repository.load(&location) {
                Ok(snapshot) => {
                    info!(
                        location = %location.display(),
                        patterns = snapshot.book.len(),
                        blocked = snapshot.book.blocked().len(),
                        "loaded learning data"
                    );
                    snapshot
                }
                Err(e) => {
                    let err = Error::StoreUnavailable {
                        operation: format!("load {}", location.display()),
                        message: e.to_string(),
                    };
                    warn!(error = %err, "continuing with empty learning data");
                    if e.is_corrupt_data() {
                        match repository.quarantine(&location) {
                            Ok(Some(moved)) => {
                                warn!(moved_to = %moved.display(), "unreadable learning data moved aside")
                            }
                            Ok(None) => {}
                            Err(qe) => warn!(error = %qe, "could not move unreadable learning data aside"),
                        }
                    }
                    LearningSnapshot::new()
                }
            }
        } else {
            debug!(location = %location.display(), "no stored learning data found");
            LearningSnapshot::new()
        };

        LearningStore {
            repository,
            location,
            snapshot,
            dirty: false,
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn snapshot(&self) -> &LearningSnapshot {
        &self.snapshot
    }

    pub fn book(&self) -> &PatternBook {
        &self.snapshot.book
    }

    pub fn stats(&self) -> &AggregateStats {
        &self.snapshot.stats
    }

    /// True when the last write did not reach the repository
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Learn one sequence observation and write through.
    ///
    /// # Errors
    ///
    /// Only for an invalid sequence; persistence failures are logged, not returned.
    pub fn learn_sequence(&mut self, source: &str, sequence: &[usize], sample: Option<&Board>) -> Result<()> {
        self.snapshot.book.learn_sequence(source, sequence, sample)?;
        self.write_through();
        Ok(())
    }

    /// Add a pattern to the blocked set and write through.
    pub fn mark_blocked(&mut self, key: PatternKey) {
        if self.snapshot.book.mark_blocked(key.clone()) {
            info!(pattern = %key, "pattern marked blocked");
        }
        self.write_through();
    }

    /// Count a finished game and write through.
    pub fn record_result(&mut self, result: GameResult) {
        self.snapshot.stats.record(result);
        self.write_through();
    }

    /// Merge a remote snapshot and write through.
    pub fn merge_from(&mut self, remote: &LearningSnapshot) {
        self.snapshot.merge_from(remote);
        info!(
            patterns = self.snapshot.book.len(),
            "merged remote learning data"
        );
        self.write_through();
    }

    /// Administrative: forget all patterns and blocked entries. Stats are kept.
    pub fn clear_all(&mut self) {
        self.snapshot.book.clear_all();
        info!("all learned patterns cleared");
        self.write_through();
    }

    /// Write the snapshot now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the repository rejects the write;
    /// the store stays dirty.
    pub fn flush(&mut self) -> Result<()> {
        self.snapshot.saved_at = Some(Utc::now());
        match self.repository.save(&self.snapshot, &self.location) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                Err(Error::StoreUnavailable {
                    operation: format!("save {}", self.location.display()),
                    message: e.to_string(),
                })
            }
        }
    }

    fn write_through(&mut self) {
        self.dirty = true;
        if let Err(e) = self.flush() {
            warn!(error = %e, "learning data not persisted; will retry on next change");
        }
    }
}

impl Drop for LearningStore {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.flush() {
                warn!(error = %e, "learning data lost on close");
            }
        }
    }
}

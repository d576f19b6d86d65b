//! Repository port for learning-data persistence.
//!
//! This module defines the trait boundary between the learning layer and the
//! durable medium behind it.

use std::path::{Path, PathBuf};

use crate::{Result, learning::LearningSnapshot};

/// Port for persisting and loading learning snapshots.
///
/// This trait abstracts the storage mechanism, allowing different implementations
/// (JSON file, MessagePack, in-memory) without coupling the engine to a format.
///
/// # Examples
///
/// ```no_run
/// use nemesis::ports::LearningRepository;
/// use nemesis::learning::LearningSnapshot;
/// use std::path::{Path, PathBuf};
///
/// fn save_snapshot<R: LearningRepository>(
///     repo: &R,
///     snapshot: &LearningSnapshot,
///     path: &Path,
/// ) -> nemesis::Result<()> {
///     repo.save(snapshot, path)
/// }
/// ```
pub trait LearningRepository {
    /// Save a snapshot to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The location cannot be created or written to
    /// - Serialization fails
    fn save(&self, snapshot: &LearningSnapshot, location: &Path) -> Result<()>;

    /// Load a snapshot from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Nothing is stored at the location or it cannot be read
    /// - The stored data is invalid or corrupted
    fn load(&self, location: &Path) -> Result<LearningSnapshot>;

    /// Whether anything is stored at the location.
    fn exists(&self, location: &Path) -> bool;

    /// Move unreadable data at the location out of the way so the next save
    /// does not destroy it.
    ///
    /// Returns where the data went, or `None` when the medium keeps nothing
    /// worth preserving. The default does nothing.
    fn quarantine(&self, _location: &Path) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

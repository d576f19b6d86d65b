//! In-memory learning repository for testing.
//!
//! This adapter provides a pure in-memory implementation of LearningRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{Result, error::Error, learning::LearningSnapshot, ports::LearningRepository};

/// In-memory repository for testing.
///
/// Stores snapshots as MessagePack bytes in a shared HashMap, so a loaded
/// snapshot goes through the same serialization as one read from disk.
///
/// # Examples
///
/// ```
/// use nemesis::adapters::InMemoryRepository;
/// use nemesis::learning::LearningSnapshot;
/// use nemesis::ports::LearningRepository;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let snapshot = LearningSnapshot::new();
///
/// repo.save(&snapshot, Path::new("learning"))?;
/// let loaded = repo.load(Path::new("learning"))?;
/// assert_eq!(loaded, snapshot);
/// # Ok::<(), nemesis::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.storage.lock().map_err(|_| Error::StoreUnavailable {
            operation: "lock in-memory storage".to_string(),
            message: "storage mutex poisoned".to_string(),
        })
    }

    /// Get the number of snapshots currently stored.
    pub fn count(&self) -> usize {
        self.storage().map(|s| s.len()).unwrap_or(0)
    }

    /// Clear all stored snapshots.
    pub fn clear(&self) {
        if let Ok(mut storage) = self.storage() {
            storage.clear();
        }
    }
}

impl LearningRepository for InMemoryRepository {
    fn save(&self, snapshot: &LearningSnapshot, location: &Path) -> Result<()> {
        let key = location.to_string_lossy().to_string();

        let bytes = rmp_serde::to_vec_named(snapshot).map_err(|e| Error::SerializationContext {
            operation: "serialize snapshot for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage()?.insert(key, bytes);
        Ok(())
    }

    fn load(&self, location: &Path) -> Result<LearningSnapshot> {
        let key = location.to_string_lossy().to_string();
        let storage = self.storage()?;

        let bytes = storage.get(&key).ok_or_else(|| Error::Io {
            operation: format!("load snapshot from in-memory storage at {location:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize snapshot from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }

    fn exists(&self, location: &Path) -> bool {
        let key = location.to_string_lossy().to_string();
        self.storage().map(|s| s.contains_key(&key)).unwrap_or(false)
    }
}

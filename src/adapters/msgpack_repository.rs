//! MessagePack implementation of the learning repository.
//!
//! This adapter implements the LearningRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use super::file_io;
use crate::{Result, error::Error, learning::LearningSnapshot, ports::LearningRepository};

/// MessagePack-based learning repository.
///
/// Fields are written by name so snapshots written by older builds still load
/// when new fields with defaults are added.
///
/// # Examples
///
/// ```no_run
/// use nemesis::adapters::MsgPackRepository;
/// use nemesis::learning::LearningSnapshot;
/// use nemesis::ports::LearningRepository;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// repo.save(&LearningSnapshot::new(), Path::new("learning.msgpack"))?;
/// let loaded = repo.load(Path::new("learning.msgpack"))?;
/// # Ok::<(), nemesis::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl LearningRepository for MsgPackRepository {
    fn save(&self, snapshot: &LearningSnapshot, location: &Path) -> Result<()> {
        file_io::replace_file(location, |writer| {
            rmp_serde::encode::write_named(writer, snapshot).map_err(|e| {
                Error::SerializationContext {
                    operation: "serialize snapshot to MessagePack".to_string(),
                    message: e.to_string(),
                }
            })
        })
    }

    fn load(&self, location: &Path) -> Result<LearningSnapshot> {
        let file = File::open(location).map_err(|source| Error::Io {
            operation: format!("open file {location:?}"),
            source,
        })?;

        rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize snapshot from MessagePack".to_string(),
                message: e.to_string(),
            }
        })
    }

    fn exists(&self, location: &Path) -> bool {
        location.is_file()
    }

    fn quarantine(&self, location: &Path) -> Result<Option<PathBuf>> {
        file_io::quarantine_file(location)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::tictactoe::GameResult;

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("learning.msgpack");

        let mut snapshot = LearningSnapshot::new();
        snapshot.book.learn_sequence("alice", &[2, 4, 6], None).unwrap();
        snapshot.stats.record(GameResult::Loss);

        let repo = MsgPackRepository::new();
        repo.save(&snapshot, &file_path).expect("Failed to save");
        assert!(repo.exists(&file_path));
        let loaded = repo.load(&file_path).expect("Failed to load");

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = MsgPackRepository::new();
        let result = repo.load(Path::new("/tmp/nonexistent_nemesis_12345.msgpack"));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_under_a_regular_file_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();

        let repo = MsgPackRepository::new();
        let result = repo.save(&LearningSnapshot::new(), &blocker.join("file.msgpack"));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("learning.msgpack");

        let repo = MsgPackRepository::new();
        repo.save(&LearningSnapshot::new(), &path).unwrap();
        assert_eq!(repo.load(&path).unwrap(), LearningSnapshot::new());
    }

    #[test]
    fn test_failed_save_is_reported_and_leaves_no_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("learning.msgpack");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupant"), "x").unwrap();

        let result = MsgPackRepository.save(&LearningSnapshot::new(), &path);
        assert!(matches!(result, Err(Error::Io { .. })));

        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("learning.msgpack")]);
    }

    #[test]
    fn test_resave_keeps_a_readable_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("learning.msgpack");
        let repo = MsgPackRepository::new();

        let mut snapshot = LearningSnapshot::new();
        repo.save(&snapshot, &path).unwrap();
        snapshot.stats.record(GameResult::Win);
        repo.save(&snapshot, &path).unwrap();

        assert_eq!(repo.load(&path).unwrap().stats.wins, 1);
    }
}

//! JSON file implementation of the learning repository.
//!
//! The default on-disk format: human-readable, so an operator can inspect or
//! hand-edit what the engine has learned.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use super::file_io;
use crate::{Result, error::Error, learning::LearningSnapshot, ports::LearningRepository};

/// Pretty-printed JSON repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileRepository;

impl JsonFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl LearningRepository for JsonFileRepository {
    fn save(&self, snapshot: &LearningSnapshot, location: &Path) -> Result<()> {
        file_io::replace_file(location, |writer| {
            serde_json::to_writer_pretty(&mut *writer, snapshot)?;
            Ok(())
        })
    }

    fn load(&self, location: &Path) -> Result<LearningSnapshot> {
        let file = File::open(location).map_err(|source| Error::Io {
            operation: format!("open file {location:?}"),
            source,
        })?;

        Ok(serde_json::from_reader(BufReader::new(file))?)
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

    #[test]
    fn test_json_roundtrip_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("learning.json");

        let mut snapshot = LearningSnapshot::new();
        snapshot.book.learn_sequence("alice", &[0, 4, 8], None).unwrap();

        let repo = JsonFileRepository::new();
        repo.save(&snapshot, &path).unwrap();
        assert_eq!(repo.load(&path).unwrap(), snapshot);
    }

    #[test]
    fn test_pattern_keys_are_readable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("learning.json");

        let mut snapshot = LearningSnapshot::new();
        snapshot.book.learn_sequence("alice", &[2, 4, 6], None).unwrap();
        JsonFileRepository.save(&snapshot, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"2-4-6\""));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("learning.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileRepository.load(&path).is_err());
    }

    #[test]
    fn test_quarantine_moves_corrupt_file_aside() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("learning.json");
        std::fs::write(&path, "{ not json").unwrap();

        let moved = JsonFileRepository.quarantine(&path).unwrap().unwrap();
        assert!(!JsonFileRepository.exists(&path));
        assert_eq!(std::fs::read_to_string(moved).unwrap(), "{ not json");
    }
}

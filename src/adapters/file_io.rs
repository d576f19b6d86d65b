//! Shared file handling for the on-disk repositories.
//!
//! A save never truncates the existing store: the snapshot is written to a
//! sibling temporary file, synced, and renamed over the target. A crash
//! mid-write leaves the previous snapshot in place.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::Utc;
use tempfile::NamedTempFile;

use crate::{Error, Result};

fn parent_dir(location: &Path) -> &Path {
    location
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Atomically replace `location` with whatever `write` produces.
pub(crate) fn replace_file<F>(location: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = parent_dir(location);
    std::fs::create_dir_all(dir).map_err(|source| Error::Io {
        operation: format!("create directory {dir:?}"),
        source,
    })?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|source| Error::Io {
        operation: format!("create temporary file in {dir:?}"),
        source,
    })?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {location:?}"),
            source,
        })?;
    }

    temp.as_file().sync_all().map_err(|source| Error::Io {
        operation: format!("sync file {location:?}"),
        source,
    })?;

    temp.persist(location).map_err(|e| Error::Io {
        operation: format!("replace file {location:?}"),
        source: e.error,
    })?;
    Ok(())
}

/// Rename an unreadable store to `<name>.corrupt-<timestamp>` beside it.
pub(crate) fn quarantine_file(location: &Path) -> Result<Option<PathBuf>> {
    if !location.is_file() {
        return Ok(None);
    }
    let name = location
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    let target = location.with_file_name(format!(
        "{name}.corrupt-{}",
        Utc::now().format("%Y%m%d%H%M%S%3f")
    ));
    std::fs::rename(location, &target).map_err(|source| Error::Io {
        operation: format!("move {location:?} aside"),
        source,
    })?;
    Ok(Some(target))
}

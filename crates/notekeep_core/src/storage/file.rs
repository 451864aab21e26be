//! Directory-backed slot storage.
//!
//! # Invariants
//! - Slot `name` maps to `<dir>/<name>.json`.
//! - Writes go to a sibling temp file and are renamed into place, so a
//!   reader never observes a half-written slot.

use super::{slot_text, validate_slot_name, SlotStorage, StorageResult};
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SLOT_FILE_EXTENSION: &str = "json";

/// Stores each slot as one JSON file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Uses `dir` as the slot directory, creating it when missing.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path backing one slot.
    pub fn slot_path(&self, name: &str) -> StorageResult<PathBuf> {
        validate_slot_name(name)?;
        Ok(self.dir.join(format!("{name}.{SLOT_FILE_EXTENSION}")))
    }
}

impl SlotStorage for FileStorage {
    fn read_slot(&self, name: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(name)?;
        match std::fs::read(&path) {
            Ok(bytes) => slot_text(name, bytes).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_slot(&mut self, name: &str, value: &str) -> StorageResult<()> {
        let path = self.slot_path(name)?;
        let staging = path.with_extension(format!("{SLOT_FILE_EXTENSION}.tmp"));
        std::fs::write(&staging, value)?;
        if let Err(err) = std::fs::rename(&staging, &path) {
            let _ = std::fs::remove_file(&staging);
            return Err(err.into());
        }
        debug!(
            "event=slot_write module=storage backend=file status=ok bytes={}",
            value.len()
        );
        Ok(())
    }

    fn remove_slot(&mut self, name: &str) -> StorageResult<()> {
        let path = self.slot_path(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FileStorage;
    use crate::storage::{SlotStorage, StorageError};

    #[test]
    fn absent_slot_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.read_slot("notes").unwrap(), None);
    }

    #[test]
    fn write_then_read_returns_value_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.write_slot("notes", "[]").unwrap();

        assert_eq!(storage.read_slot("notes").unwrap().as_deref(), Some("[]"));
        let names = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["notes.json".to_string()]);
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.write_slot("notes", "[]").unwrap();
        storage.remove_slot("notes").unwrap();
        storage.remove_slot("notes").unwrap();
        assert_eq!(storage.read_slot("notes").unwrap(), None);
    }

    #[test]
    fn non_utf8_file_reads_as_invalid_encoding() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.json"), [0xff, 0xfe, b'[', b']']).unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(matches!(
            storage.read_slot("notes"),
            Err(StorageError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::open(&nested).unwrap();
        assert!(storage.dir().is_dir());
    }
}

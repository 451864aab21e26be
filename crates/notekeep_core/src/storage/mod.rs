//! Durable slot storage backends.
//!
//! # Responsibility
//! - Define the named-slot contract the note store mirrors into.
//! - Provide memory, file and SQLite implementations of that contract.
//!
//! # Invariants
//! - A slot holds one UTF-8 string value, or is absent. Stored bytes that
//!   are not UTF-8 are reported as `InvalidEncoding`, never as I/O failure.
//! - `remove_slot` on an absent slot succeeds.
//! - Slot names match `[A-Za-z0-9_.-]{1,64}`; invalid names are rejected
//!   before touching the backend.

use crate::db::DbError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteSlotStorage;

static SLOT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{1,64}$").expect("valid slot name regex"));

pub type StorageResult<T> = Result<T, StorageError>;

/// Backend failure while reading or writing a slot.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Db(DbError),
    InvalidSlotName(String),
    /// Connection was not bootstrapped through `db::open_db*`.
    MissingRequiredTable(&'static str),
    /// Slot exists but its bytes are not valid UTF-8.
    InvalidEncoding(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "slot file i/o failed: {err}"),
            Self::Db(err) => write!(f, "slot database failed: {err}"),
            Self::InvalidSlotName(name) => write!(
                f,
                "invalid slot name `{name}`; expected 1-64 chars of [A-Za-z0-9_.-]"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
            Self::InvalidEncoding(details) => write!(f, "slot is not valid UTF-8: {details}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidSlotName(_) | Self::MissingRequiredTable(_) | Self::InvalidEncoding(_) => {
                None
            }
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named-slot key/value contract, the durable side of the note store.
pub trait SlotStorage {
    /// Returns the slot value, or `None` when the slot is absent.
    fn read_slot(&self, name: &str) -> StorageResult<Option<String>>;
    /// Replaces the slot value.
    fn write_slot(&mut self, name: &str, value: &str) -> StorageResult<()>;
    /// Deletes the slot if present.
    fn remove_slot(&mut self, name: &str) -> StorageResult<()>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for Box<S> {
    fn read_slot(&self, name: &str) -> StorageResult<Option<String>> {
        (**self).read_slot(name)
    }

    fn write_slot(&mut self, name: &str, value: &str) -> StorageResult<()> {
        (**self).write_slot(name, value)
    }

    fn remove_slot(&mut self, name: &str) -> StorageResult<()> {
        (**self).remove_slot(name)
    }
}

/// Validates a slot name against the shared naming contract.
pub fn validate_slot_name(name: &str) -> StorageResult<()> {
    if SLOT_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(StorageError::InvalidSlotName(name.to_string()))
    }
}

/// Converts raw slot bytes read by a backend into the slot string.
pub(crate) fn slot_text(name: &str, bytes: Vec<u8>) -> StorageResult<String> {
    String::from_utf8(bytes)
        .map_err(|err| StorageError::InvalidEncoding(format!("slot `{name}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::{slot_text, validate_slot_name, StorageError};

    #[test]
    fn slot_names_accept_simple_identifiers() {
        for name in ["notes", "notes.v1", "my_notes-2"] {
            validate_slot_name(name).expect("name should be valid");
        }
    }

    #[test]
    fn slot_names_reject_paths_and_blanks() {
        let too_long = "x".repeat(65);
        for name in ["", "../notes", "a/b", "with space", too_long.as_str()] {
            let err = validate_slot_name(name).expect_err("name should be rejected");
            assert!(matches!(err, StorageError::InvalidSlotName(_)));
        }
    }

    #[test]
    fn slot_text_flags_non_utf8_bytes() {
        assert_eq!(slot_text("notes", b"[]".to_vec()).unwrap(), "[]");
        let err = slot_text("notes", vec![0xff, 0xfe, b'[', b']']).unwrap_err();
        assert!(matches!(err, StorageError::InvalidEncoding(details) if details.contains("notes")));
    }
}

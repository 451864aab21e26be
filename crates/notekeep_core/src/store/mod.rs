//! Note store: the authoritative note sequence and its durable mirror.
//!
//! # Responsibility
//! - Own the in-memory, insertion-ordered note sequence.
//! - Mirror the full sequence into one storage slot after every mutation.
//! - Notify subscribers after successful mutations.
//!
//! # Invariants
//! - Note ids are unique within the sequence.
//! - After any operation returns, memory and the durable slot agree.
//! - Domain failures (`DuplicateId`, `NotFound`) never change state.

use crate::model::note::NoteId;
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod events;
pub mod note_store;
pub mod notice;

pub use events::{StoreEvent, SubscriptionId};
pub use note_store::{NoteStore, DEFAULT_SLOT_NAME};
pub use notice::{Notice, NoticeLevel, StoreOperation};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation error.
#[derive(Debug)]
pub enum StoreError {
    /// `add` with an id already present.
    DuplicateId(NoteId),
    /// `update`/`remove` with an unknown id.
    NotFound(NoteId),
    /// Durable slot content could not be parsed at startup.
    MalformedStorage(String),
    /// Note sequence could not be encoded as JSON.
    Encode(serde_json::Error),
    /// Storage backend failure; in-memory state was left unchanged.
    Storage(StorageError),
}

impl StoreError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "duplicate_id",
            Self::NotFound(_) => "not_found",
            Self::MalformedStorage(_) => "malformed_storage",
            Self::Encode(_) => "encode_failed",
            Self::Storage(_) => "storage_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "note already exists: {id}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::MalformedStorage(details) => write!(f, "malformed note storage: {details}"),
            Self::Encode(err) => write!(f, "failed to encode notes: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::DuplicateId(_) | Self::NotFound(_) | Self::MalformedStorage(_) => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

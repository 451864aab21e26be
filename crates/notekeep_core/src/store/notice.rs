//! Transient user-facing notices derived from store outcomes.

use super::{StoreError, StoreResult};
use std::fmt::{Display, Formatter};

/// Mutating store operation a notice reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Add,
    Update,
    Remove,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// One toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// Notice for the outcome of `operation`.
    pub fn for_outcome<T>(operation: StoreOperation, outcome: &StoreResult<T>) -> Self {
        match outcome {
            Ok(_) => Self::success(match operation {
                StoreOperation::Add => "Note added successfully!",
                StoreOperation::Update => "Note updated successfully!",
                StoreOperation::Remove => "Note deleted successfully!",
                StoreOperation::Reset => "All notes cleared!",
            }),
            Err(err) => Self::for_error(err),
        }
    }

    /// Copy request for a note whose content is empty.
    pub fn nothing_to_copy() -> Self {
        Self::error("No content to copy")
    }

    /// Notice for a store error, independent of the operation.
    pub fn for_error(err: &StoreError) -> Self {
        match err {
            StoreError::DuplicateId(_) => Self::error("Note already exists!"),
            StoreError::NotFound(_) => Self::error("Note not found!"),
            StoreError::MalformedStorage(_) => {
                Self::error("Saved notes could not be read; starting with an empty list.")
            }
            StoreError::Encode(_) | StoreError::Storage(_) => {
                Self::error(format!("Could not save notes: {err}"))
            }
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

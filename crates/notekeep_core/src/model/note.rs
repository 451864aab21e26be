//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its durable JSON shape.
//! - Define the editor-side draft used before id/timestamp assignment.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `created_at` is set at creation and is not touched by edits.
//! - Serialized field names are `title`, `content`, `_id`, `createdAt`.

use serde::{Deserialize, Serialize};

/// Opaque unique note identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = String;

/// Canonical note record held by the store and mirrored to durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Free-text title, may be empty.
    #[serde(default)]
    pub title: String,
    /// Free-text body, may be empty.
    #[serde(default)]
    pub content: String,
    /// Serialized as `_id` to match the durable slot schema.
    #[serde(rename = "_id")]
    pub id: NoteId,
    /// ISO-8601 creation timestamp.
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

impl Note {
    /// Creates a note from fully-specified parts.
    pub fn new(
        id: impl Into<NoteId>,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            id: id.into(),
            created_at: created_at.into(),
        }
    }

    /// Builds a note from an editor draft plus assigned identity.
    pub fn from_draft(draft: NoteDraft, id: impl Into<NoteId>, created_at: impl Into<String>) -> Self {
        Self::new(id, draft.title, draft.content, created_at)
    }

    /// Returns the editable part of this note as a draft.
    pub fn to_draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// Editor input before the note service assigns `id` and `created_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

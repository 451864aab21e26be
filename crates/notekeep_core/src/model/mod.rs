//! Domain model for notes and the capabilities that stamp them.
//!
//! # Responsibility
//! - Define the canonical note record shared by store, service and CLI.
//! - Provide injectable id and clock capabilities for note creation.
//!
//! # Invariants
//! - Every note is identified by an opaque, unique `NoteId`.
//! - Deletion is a hard removal from the sequence; there are no tombstones.

pub mod clock;
pub mod id;
pub mod note;

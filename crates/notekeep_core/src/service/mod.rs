//! Core use-case services.
//!
//! # Responsibility
//! - Turn editor input into store operations.
//! - Keep CLI/UI layers decoupled from id generation and timestamps.

pub mod note_service;

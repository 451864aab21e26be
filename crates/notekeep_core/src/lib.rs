//! Core domain logic for notekeep.
//! This crate is the single source of truth for note store invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod storage;
pub mod store;

pub use config::{ConfigError, NotekeepConfig, StorageBackend};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::clock::{Clock, FixedClock, SystemClock};
pub use model::id::{IdGenerator, SequentialIdGenerator, TimestampIdGenerator};
pub use model::note::{Note, NoteDraft, NoteId};
pub use search::title::{display_content, display_title, preview_text, search_by_title, TitleSearch};
pub use service::note_service::NoteService;
pub use storage::{
    FileStorage, MemoryStorage, SlotStorage, SqliteSlotStorage, StorageError, StorageResult,
};
pub use store::note_store::{decode_notes, encode_notes};
pub use store::{
    NoteStore, Notice, NoticeLevel, StoreError, StoreEvent, StoreOperation, StoreResult,
    SubscriptionId, DEFAULT_SLOT_NAME,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

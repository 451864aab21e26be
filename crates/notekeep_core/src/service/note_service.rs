//! Note editor use-case service.
//!
//! # Responsibility
//! - Stamp editor drafts with id and creation time, then add them.
//! - Route the editor's single submit action to add or update.
//! - Expose list/view/search/delete/reset for consumers.
//!
//! # Invariants
//! - Ids and timestamps come only from the injected capabilities.
//! - Every mutation goes through `NoteStore`, so persistence and
//!   notifications follow the store contract.

use crate::model::clock::{Clock, SystemClock};
use crate::model::id::{IdGenerator, TimestampIdGenerator};
use crate::model::note::{Note, NoteDraft};
use crate::search::title::{search_by_title, TitleSearch};
use crate::storage::SlotStorage;
use crate::store::{NoteStore, StoreError, StoreResult};

/// Editor-facing facade over a `NoteStore`.
pub struct NoteService<S: SlotStorage> {
    store: NoteStore<S>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl<S: SlotStorage> NoteService<S> {
    /// Uses timestamp ids and the system clock.
    pub fn new(store: NoteStore<S>) -> Self {
        Self::with_capabilities(store, TimestampIdGenerator, SystemClock)
    }

    /// Uses caller-provided id and clock capabilities.
    pub fn with_capabilities(
        store: NoteStore<S>,
        ids: impl IdGenerator + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            store,
            ids: Box::new(ids),
            clock: Box::new(clock),
        }
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    /// Mutable store access, e.g. to subscribe listeners.
    pub fn store_mut(&mut self) -> &mut NoteStore<S> {
        &mut self.store
    }

    pub fn into_store(self) -> NoteStore<S> {
        self.store
    }

    /// Creates a note from a draft and appends it.
    ///
    /// # Errors
    /// - `DuplicateId` when the id generator repeats an existing id.
    /// - `Encode`/`Storage` when persisting fails.
    pub fn create(&mut self, draft: NoteDraft) -> StoreResult<Note> {
        let note = Note::from_draft(draft, self.ids.next_id(), self.clock.now_iso8601());
        self.store.add(note.clone())?;
        Ok(note)
    }

    /// Editor submit: updates `editing` when set, creates otherwise.
    ///
    /// Returns the note as stored after the operation.
    pub fn save(&mut self, draft: NoteDraft, editing: Option<&str>) -> StoreResult<Note> {
        let Some(id) = editing else {
            return self.create(draft);
        };

        let note = Note::from_draft(draft, id, self.clock.now_iso8601());
        self.store.update(note)?;
        self.view(id).cloned()
    }

    /// Prefills an editor draft from a stored note.
    pub fn edit_draft(&self, id: &str) -> StoreResult<NoteDraft> {
        self.view(id).map(Note::to_draft)
    }

    /// Single-note lookup.
    pub fn view(&self, id: &str) -> StoreResult<&Note> {
        self.store
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<Note> {
        self.store.remove(id)
    }

    pub fn reset_all(&mut self) -> StoreResult<()> {
        self.store.reset_all()
    }

    pub fn list(&self) -> &[Note] {
        self.store.list()
    }

    /// Case-insensitive title search over the current sequence.
    pub fn search(&self, term: &str) -> TitleSearch<'_> {
        search_by_title(self.store.list(), term)
    }
}

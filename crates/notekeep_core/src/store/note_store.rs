//! Note store implementation over a `SlotStorage` backend.
//!
//! # Invariants
//! - Every successful `add`/`update`/`remove` rewrites the whole sequence to
//!   the slot before returning; `reset_all` deletes the slot instead.
//! - A failed durable write rolls the in-memory change back.
//! - `update` keeps the stored position and `created_at`.
//! - Log events carry counts and error codes only, never note text.

use super::events::{Listeners, StoreEvent, SubscriptionId};
use super::{StoreError, StoreResult};
use crate::model::note::Note;
use crate::storage::{validate_slot_name, SlotStorage, StorageError};
use log::{error, info, warn};
use std::collections::HashSet;

/// Slot used when the caller does not choose one.
pub const DEFAULT_SLOT_NAME: &str = "notes";

/// Authoritative in-memory note sequence with a durable slot mirror.
pub struct NoteStore<S: SlotStorage> {
    storage: S,
    slot: String,
    notes: Vec<Note>,
    listeners: Listeners,
    startup_issue: Option<StoreError>,
}

impl<S: SlotStorage> NoteStore<S> {
    /// Loads the initial sequence from `slot`.
    ///
    /// An absent or blank slot starts empty. Unparseable or non-UTF-8 content
    /// also starts empty and is kept as `startup_issue()`; it is not returned
    /// as an error.
    ///
    /// # Errors
    /// - `Storage` when the slot name is invalid or the backend read fails.
    pub fn initialize(storage: S, slot: impl Into<String>) -> StoreResult<Self> {
        let slot = slot.into();
        validate_slot_name(&slot)?;

        let read = storage.read_slot(&slot);
        let slot_present = !matches!(read, Ok(None));
        let (notes, startup_issue) = match read {
            Ok(Some(raw)) if !raw.trim().is_empty() => match decode_notes(&raw) {
                Ok(notes) => (notes, None),
                Err(err) => recover_from(err),
            },
            Ok(_) => (Vec::new(), None),
            Err(StorageError::InvalidEncoding(details)) => {
                recover_from(StoreError::MalformedStorage(details))
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            "event=store_init module=store status=ok slot={} slot_present={} count={}",
            slot,
            slot_present,
            notes.len()
        );

        Ok(Self {
            storage,
            slot,
            notes,
            listeners: Listeners::default(),
            startup_issue,
        })
    }

    /// Current sequence in insertion order.
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Looks up one note by id.
    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Slot name this store mirrors into.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// `MalformedStorage` recorded during `initialize`, if any.
    pub fn startup_issue(&self) -> Option<&StoreError> {
        self.startup_issue.as_ref()
    }

    /// Appends a note unless its id is already present.
    ///
    /// # Errors
    /// - `DuplicateId` when a note with the same id exists; nothing changes.
    /// - `Encode`/`Storage` when persisting fails; the append is undone.
    pub fn add(&mut self, note: Note) -> StoreResult<()> {
        if self.contains(&note.id) {
            return Err(self.reject("note_add", StoreError::DuplicateId(note.id)));
        }

        self.notes.push(note);
        if let Err(err) = self.persist() {
            self.notes.pop();
            return Err(self.reject("note_add", err));
        }

        info!(
            "event=note_add module=store status=ok count={}",
            self.notes.len()
        );
        if let Some(added) = self.notes.last().cloned() {
            self.emit(StoreEvent::Added(added));
        }
        Ok(())
    }

    /// Replaces title/content of the note with the same id, in place.
    ///
    /// The stored `created_at` wins over the one carried by `note`.
    ///
    /// # Errors
    /// - `NotFound` when no note has this id; nothing changes.
    /// - `Encode`/`Storage` when persisting fails; the old note is restored.
    pub fn update(&mut self, note: Note) -> StoreResult<()> {
        let Some(index) = self.position(&note.id) else {
            return Err(self.reject("note_update", StoreError::NotFound(note.id)));
        };

        let mut replacement = note;
        replacement.created_at = self.notes[index].created_at.clone();
        let previous = std::mem::replace(&mut self.notes[index], replacement);
        if let Err(err) = self.persist() {
            self.notes[index] = previous;
            return Err(self.reject("note_update", err));
        }

        info!(
            "event=note_update module=store status=ok position={} count={}",
            index,
            self.notes.len()
        );
        let updated = self.notes[index].clone();
        self.emit(StoreEvent::Updated(updated));
        Ok(())
    }

    /// Deletes the note with `id` and returns it.
    ///
    /// # Errors
    /// - `NotFound` when no note has this id; nothing changes.
    /// - `Encode`/`Storage` when persisting fails; the note is reinserted.
    pub fn remove(&mut self, id: &str) -> StoreResult<Note> {
        let Some(index) = self.position(id) else {
            return Err(self.reject("note_remove", StoreError::NotFound(id.to_string())));
        };

        let removed = self.notes.remove(index);
        if let Err(err) = self.persist() {
            self.notes.insert(index, removed);
            return Err(self.reject("note_remove", err));
        }

        info!(
            "event=note_remove module=store status=ok count={}",
            self.notes.len()
        );
        self.emit(StoreEvent::Removed(removed.clone()));
        Ok(removed)
    }

    /// Clears every note and deletes the durable slot.
    ///
    /// # Errors
    /// - `Storage` only when the backend cannot delete the slot; the
    ///   in-memory sequence is then left as it was.
    pub fn reset_all(&mut self) -> StoreResult<()> {
        if let Err(err) = self.storage.remove_slot(&self.slot) {
            return Err(self.reject("note_reset", err.into()));
        }

        let cleared = self.notes.len();
        self.notes.clear();
        info!("event=note_reset module=store status=ok cleared={cleared}");
        self.emit(StoreEvent::Reset);
        Ok(())
    }

    /// Registers a listener called after every successful mutation with the
    /// event and the resulting sequence.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StoreEvent, &[Note]) + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(Box::new(listener))
    }

    /// Detaches a listener. Returns `false` when the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    fn persist(&mut self) -> StoreResult<()> {
        let encoded = encode_notes(&self.notes)?;
        self.storage.write_slot(&self.slot, &encoded)?;
        Ok(())
    }

    fn emit(&mut self, event: StoreEvent) {
        self.listeners.notify(&event, &self.notes);
    }

    fn reject(&self, event: &'static str, err: StoreError) -> StoreError {
        match err {
            StoreError::Encode(_) | StoreError::Storage(_) => error!(
                "event={event} module=store status=error error_code={} error={}",
                err.code(),
                err
            ),
            _ => warn!(
                "event={event} module=store status=rejected error_code={}",
                err.code()
            ),
        }
        err
    }
}

/// Fail-open start: empty sequence, issue kept for the host to report.
fn recover_from(err: StoreError) -> (Vec<Note>, Option<StoreError>) {
    warn!(
        "event=store_init module=store status=recovered error_code={} error={}",
        err.code(),
        err
    );
    (Vec::new(), Some(err))
}

/// Encodes a sequence into the durable slot format.
pub fn encode_notes(notes: &[Note]) -> StoreResult<String> {
    serde_json::to_string(notes).map_err(StoreError::Encode)
}

/// Decodes the durable slot format.
///
/// Later duplicates of an id are dropped so the uniqueness invariant holds
/// even for hand-edited payloads.
///
/// # Errors
/// - `MalformedStorage` when `raw` is not a JSON array of notes.
pub fn decode_notes(raw: &str) -> StoreResult<Vec<Note>> {
    let parsed: Vec<Note> =
        serde_json::from_str(raw).map_err(|err| StoreError::MalformedStorage(err.to_string()))?;

    let mut seen = HashSet::with_capacity(parsed.len());
    let total = parsed.len();
    let notes = parsed
        .into_iter()
        .filter(|note| seen.insert(note.id.clone()))
        .collect::<Vec<_>>();
    if notes.len() != total {
        warn!(
            "event=store_decode module=store status=deduplicated dropped={}",
            total - notes.len()
        );
    }
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::{decode_notes, encode_notes, NoteStore, DEFAULT_SLOT_NAME};
    use crate::model::note::Note;
    use crate::storage::{MemoryStorage, SlotStorage, StorageError, StorageResult};
    use crate::store::StoreError;

    /// Storage whose writes can be switched off to exercise rollback.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_writes: bool,
    }

    impl SlotStorage for FlakyStorage {
        fn read_slot(&self, name: &str) -> StorageResult<Option<String>> {
            self.inner.read_slot(name)
        }

        fn write_slot(&mut self, name: &str, value: &str) -> StorageResult<()> {
            if self.fail_writes {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            self.inner.write_slot(name, value)
        }

        fn remove_slot(&mut self, name: &str) -> StorageResult<()> {
            if self.fail_writes {
                return Err(StorageError::Io(std::io::Error::other("read-only")));
            }
            self.inner.remove_slot(name)
        }
    }

    fn note(id: &str) -> Note {
        Note::new(id, "T", "C", "2024-01-01T00:00:00Z")
    }

    #[test]
    fn decode_keeps_first_of_duplicate_ids() {
        let raw = r#"[{"title":"a","content":"","_id":"x","createdAt":""},
                      {"title":"b","content":"","_id":"x","createdAt":""}]"#;
        let notes = decode_notes(raw).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "a");
    }

    #[test]
    fn decode_rejects_non_array_payload() {
        let err = decode_notes(r#"{"notes":[]}"#).unwrap_err();
        assert!(matches!(err, StoreError::MalformedStorage(_)));
    }

    #[test]
    fn encode_of_empty_sequence_is_empty_array() {
        assert_eq!(encode_notes(&[]).unwrap(), "[]");
    }

    #[test]
    fn blank_slot_is_treated_as_absent() {
        let storage = MemoryStorage::new().with_slot(DEFAULT_SLOT_NAME, "   ");
        let store = NoteStore::initialize(storage, DEFAULT_SLOT_NAME).unwrap();
        assert!(store.is_empty());
        assert!(store.startup_issue().is_none());
    }

    #[test]
    fn invalid_slot_name_fails_initialize() {
        let err = NoteStore::initialize(MemoryStorage::new(), "../escape").err();
        assert!(matches!(
            err,
            Some(StoreError::Storage(StorageError::InvalidSlotName(_)))
        ));
    }

    #[test]
    fn failed_write_rolls_back_add_update_and_remove() {
        let mut store = NoteStore::initialize(FlakyStorage::default(), "notes").unwrap();
        store.add(note("a")).unwrap();
        let durable_before = store.storage().inner.get("notes").map(str::to_string);

        store.storage.fail_writes = true;

        let err = store.add(note("b")).unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(store.len(), 1);

        let mut edited = note("a");
        edited.content = "changed".to_string();
        assert!(store.update(edited).is_err());
        assert_eq!(store.get("a").unwrap().content, "C");

        assert!(store.remove("a").is_err());
        assert!(store.contains("a"));

        assert!(store.reset_all().is_err());
        assert_eq!(store.len(), 1);

        assert_eq!(
            store.storage().inner.get("notes").map(str::to_string),
            durable_before
        );
    }
}

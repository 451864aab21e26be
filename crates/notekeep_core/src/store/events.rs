//! Change notifications for store subscribers.

use crate::model::note::{Note, NoteId};

/// Successful mutation, delivered after the durable write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added(Note),
    /// Carries the note as stored after the update.
    Updated(Note),
    Removed(Note),
    Reset,
}

impl StoreEvent {
    /// Id of the affected note; `None` for `Reset`.
    pub fn note_id(&self) -> Option<&NoteId> {
        match self {
            Self::Added(note) | Self::Updated(note) | Self::Removed(note) => Some(&note.id),
            Self::Reset => None,
        }
    }
}

/// Handle returned by `NoteStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent, &[Note])>;

/// Ordered listener registry. Listeners run in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify(&mut self, event: &StoreEvent, notes: &[Note]) {
        for (_, listener) in &mut self.entries {
            listener(event, notes);
        }
    }
}

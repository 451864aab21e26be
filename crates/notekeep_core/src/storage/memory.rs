//! In-process slot storage.

use super::{validate_slot_name, SlotStorage, StorageResult};
use std::collections::BTreeMap;

/// Map-backed storage; contents live as long as the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    slots: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one slot, bypassing name validation. Used to stage fixtures.
    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(name.into(), value.into());
        self
    }

    /// Raw slot value, for inspection.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }
}

impl SlotStorage for MemoryStorage {
    fn read_slot(&self, name: &str) -> StorageResult<Option<String>> {
        validate_slot_name(name)?;
        Ok(self.slots.get(name).cloned())
    }

    fn write_slot(&mut self, name: &str, value: &str) -> StorageResult<()> {
        validate_slot_name(name)?;
        self.slots.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_slot(&mut self, name: &str) -> StorageResult<()> {
        validate_slot_name(name)?;
        self.slots.remove(name);
        Ok(())
    }
}

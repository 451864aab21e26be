//! Injectable note id generation.
//!
//! # Responsibility
//! - Produce opaque unique ids for newly created notes.
//! - Let tests swap in deterministic ids.
//!
//! # Invariants
//! - `TimestampIdGenerator` ids are a base-36 millisecond timestamp followed
//!   by a fixed-width base-36 random suffix.
//! - `SequentialIdGenerator` never repeats an id for the same instance.

use super::note::NoteId;
use chrono::Utc;
use uuid::Uuid;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_SUFFIX_LEN: usize = 11;

/// Capability producing unique note ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> NoteId;
}

impl<F> IdGenerator for F
where
    F: FnMut() -> NoteId,
{
    fn next_id(&mut self) -> NoteId {
        self()
    }
}

/// Default generator: current time in base 36 plus a random suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampIdGenerator;

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&mut self) -> NoteId {
        let millis = u128::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        format!("{}{}", to_base36(millis), random_suffix())
    }
}

/// Deterministic generator yielding `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> NoteId {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

fn to_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

fn random_suffix() -> String {
    // Low digits only: the uuid v4 version/variant bits sit above them.
    let mut value = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(RANDOM_SUFFIX_LEN);
    for _ in 0..RANDOM_SUFFIX_LEN {
        suffix.push(char::from(BASE36_DIGITS[(value % 36) as usize]));
        value /= 36;
    }
    suffix
}

#[cfg(test)]
mod tests {
    use super::{to_base36, IdGenerator, SequentialIdGenerator, TimestampIdGenerator};
    use std::collections::HashSet;

    #[test]
    fn base36_matches_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn timestamp_ids_are_base36_and_unique() {
        let mut generator = TimestampIdGenerator;
        let ids = (0..200).map(|_| generator.next_id()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 200);
        for id in &ids {
            assert!(id.len() > 11);
            assert!(id.chars().all(|ch| ch.is_ascii_digit() || ch.is_ascii_lowercase()));
        }
    }

    #[test]
    fn sequential_ids_count_up_from_one() {
        let mut generator = SequentialIdGenerator::new("note");
        assert_eq!(generator.next_id(), "note-1");
        assert_eq!(generator.next_id(), "note-2");
    }

    #[test]
    fn closures_act_as_generators() {
        let mut counter = 0;
        let mut generator = move || {
            counter += 10;
            format!("n{counter}")
        };
        assert_eq!(IdGenerator::next_id(&mut generator), "n10");
        assert_eq!(IdGenerator::next_id(&mut generator), "n20");
    }
}

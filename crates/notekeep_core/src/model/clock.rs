//! Injectable creation-time source.

use chrono::{SecondsFormat, Utc};

/// Capability producing ISO-8601 UTC timestamps for `created_at`.
pub trait Clock {
    fn now_iso8601(&self) -> String;
}

/// Wall clock; millisecond precision with a `Z` suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_iso8601(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Clock that always returns the same timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock {
    timestamp: String,
}

impl FixedClock {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
        }
    }
}

impl Clock for FixedClock {
    fn now_iso8601(&self) -> String {
        self.timestamp.clone()
    }
}

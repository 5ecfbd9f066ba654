//! Bookmark tracking
//!
//! Filters records against the bookmark floor and keeps the high-water mark
//! of the replication key. The mark never decreases, whatever order the API
//! returns records in, and is handed back for persistence when the stream
//! completes.

mod timestamp;

pub use timestamp::{format_timestamp, parse_timestamp};

use crate::types::{JsonValue, Record};
use chrono::{DateTime, Utc};

/// Outcome of offering one record to the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// At or past the floor; forward downstream
    Accept,
    /// Older than the floor; already synced
    BelowFloor,
    /// Replication key absent or null
    MissingField,
    /// Replication key present but not a timestamp
    InvalidValue(String),
}

impl Decision {
    /// Whether the record should be emitted
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// Counters for one tracked stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookmarkStats {
    /// Records forwarded
    pub accepted: usize,
    /// Records older than the floor
    pub below_floor: usize,
    /// Records without a usable replication value
    pub skipped: usize,
}

/// High-water mark over one replication key
#[derive(Debug, Clone)]
pub struct BookmarkTracker {
    field: String,
    floor: DateTime<Utc>,
    max: DateTime<Utc>,
    stats: BookmarkStats,
}

impl BookmarkTracker {
    /// Start tracking `field` (already snake_case) from `floor`
    pub fn new(field: impl Into<String>, floor: DateTime<Utc>) -> Self {
        Self {
            field: field.into(),
            floor,
            max: floor,
            stats: BookmarkStats::default(),
        }
    }

    /// The replication key being tracked
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Records strictly older than this are dropped
    pub fn floor(&self) -> DateTime<Utc> {
        self.floor
    }

    /// Current high-water mark
    pub fn max_bookmark(&self) -> DateTime<Utc> {
        self.max
    }

    /// Counters so far
    pub fn stats(&self) -> BookmarkStats {
        self.stats
    }

    /// Offer a record and advance the mark if it is accepted.
    pub fn observe(&mut self, record: &Record) -> Decision {
        let raw = match record.get(&self.field) {
            None | Some(JsonValue::Null) => {
                self.stats.skipped += 1;
                return Decision::MissingField;
            }
            Some(JsonValue::String(s)) => s.as_str(),
            Some(other) => {
                self.stats.skipped += 1;
                return Decision::InvalidValue(other.to_string());
            }
        };

        let Ok(value) = parse_timestamp(raw) else {
            self.stats.skipped += 1;
            return Decision::InvalidValue(raw.to_string());
        };

        if value < self.floor {
            self.stats.below_floor += 1;
            return Decision::BelowFloor;
        }

        if value > self.max {
            self.max = value;
        }
        self.stats.accepted += 1;
        Decision::Accept
    }

    /// Finish the stream and return the mark to persist.
    pub fn finalize(self) -> DateTime<Utc> {
        self.max
    }
}

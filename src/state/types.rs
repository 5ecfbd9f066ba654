//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs:
//!
//! ```json
//! {"bookmarks": {"orders": "2024-01-01T00:00:00.000000Z", "currently_sync_stream": "orders"}}
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete state for the tap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: Bookmarks,
}

/// Bookmarks keyed by stream, plus the stream in flight
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmarks {
    /// Stream that was syncing when the state was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currently_sync_stream: Option<String>,

    /// ISO-8601 bookmark per stream
    #[serde(flatten)]
    pub streams: BTreeMap<String, String>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Bookmark for a stream
    pub fn get_bookmark(&self, stream: &str) -> Option<&str> {
        self.bookmarks.streams.get(stream).map(String::as_str)
    }

    /// Set the bookmark for a stream
    pub fn set_bookmark(&mut self, stream: &str, bookmark: String) {
        self.bookmarks.streams.insert(stream.to_string(), bookmark);
    }

    /// Stream that was in flight, if any
    pub fn currently_syncing(&self) -> Option<&str> {
        self.bookmarks.currently_sync_stream.as_deref()
    }

    /// Record (or clear) the stream in flight
    pub fn set_currently_syncing(&mut self, stream: Option<&str>) {
        self.bookmarks.currently_sync_stream = stream.map(ToString::to_string);
    }
}

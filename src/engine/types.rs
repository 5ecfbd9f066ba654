//! Engine types
//!
//! The per-run context handed to every component and the statistics a run
//! reports.

use crate::catalog::Catalog;
use crate::config::TapConfig;
use crate::state::StateManager;

/// Everything one sync run works against.
///
/// Built once per run; the only state shared across streams is the
/// ordered list of per-stream record counts.
#[derive(Debug)]
pub struct SyncContext {
    /// Tap configuration
    pub config: TapConfig,
    /// Catalog with the resolved schema of every stream
    pub catalog: Catalog,
    /// Bookmark state
    pub state: StateManager,
    counts: Vec<(String, u64)>,
}

impl SyncContext {
    /// Create a context for one run
    pub fn new(config: TapConfig, catalog: Catalog, state: StateManager) -> Self {
        Self {
            config,
            catalog,
            state,
            counts: Vec::new(),
        }
    }

    /// Start counting a stream (no-op if already counted)
    pub fn init_count(&mut self, stream: &str) {
        if !self.counts.iter().any(|(name, _)| name == stream) {
            self.counts.push((stream.to_string(), 0));
        }
    }

    /// Count one emitted record
    pub fn increment(&mut self, stream: &str) {
        match self.counts.iter_mut().find(|(name, _)| name == stream) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((stream.to_string(), 1)),
        }
    }

    /// Records emitted for a stream
    pub fn count(&self, stream: &str) -> u64 {
        self.counts
            .iter()
            .find(|(name, _)| name == stream)
            .map_or(0, |(_, count)| *count)
    }

    /// Per-stream counts in the order streams were first counted
    pub fn counts(&self) -> &[(String, u64)] {
        &self.counts
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Records written
    pub records_emitted: u64,
    /// Records dropped by the bookmark filter or for a bad replication value
    pub records_skipped: u64,
    /// Pages fetched across all streams
    pub pages_fetched: u64,
    /// Streams that ran to completion
    pub streams_synced: usize,
    /// Streams aborted by a stream-level error
    pub streams_failed: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }
}

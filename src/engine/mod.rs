//! Execution engine module
//!
//! Orchestrates a sync run: shop bootstrap, schema declarations, then each
//! selected stream in turn through the pagination driver and the bookmark
//! tracker, checkpointing state after every stream.
//!
//! # Error containment
//!
//! - a record without a usable replication value is skipped
//! - a malformed page ends its stream early; the bookmark still advances
//!   over what was emitted
//! - any other stream-level error aborts that stream only
//! - transport, configuration and state errors abort the run

mod types;

pub use types::{SyncContext, SyncStats};

use crate::bookmark::{format_timestamp, parse_timestamp, BookmarkTracker, Decision};
use crate::catalog::CatalogEntry;
use crate::error::{Error, Result};
use crate::http::RemoteCall;
use crate::output::{Message, MessageWriter};
use crate::pagination::PaginationDriver;
use crate::query::{synthesize_for_stream, QueryVariables};
use crate::shop::fetch_shop;
use crate::streams;
use crate::types::{JsonObject, ReplicationMethod};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Sync engine writing messages to `W`
pub struct SyncEngine<W: Write> {
    /// Remote GraphQL endpoint
    remote: Arc<dyn RemoteCall>,
    /// Message sink
    writer: MessageWriter<W>,
    /// Statistics
    stats: SyncStats,
}

impl<W: Write> SyncEngine<W> {
    /// Create a new sync engine
    pub fn new(remote: Arc<dyn RemoteCall>, writer: MessageWriter<W>) -> Self {
        Self {
            remote,
            writer,
            stats: SyncStats::default(),
        }
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Get the message writer
    pub fn writer(&self) -> &MessageWriter<W> {
        &self.writer
    }

    /// Consume the engine and return the message writer
    pub fn into_writer(self) -> MessageWriter<W> {
        self.writer
    }

    /// Run a full sync over the selected streams of `ctx.catalog`
    pub async fn run(&mut self, ctx: &mut SyncContext) -> Result<SyncStats> {
        let start = Instant::now();

        let shop = fetch_shop(self.remote.as_ref()).await?;
        let sdc_fields = shop.sdc_fields();

        // Declare every selected stream before any record
        for entry in ctx.catalog.streams.iter().filter(|e| e.is_selected()) {
            self.writer.write(&Message::schema(
                entry.tap_stream_id.as_str(),
                entry.schema.clone(),
                entry.key_properties.clone(),
                entry.replication_key.iter().cloned().collect(),
            ))?;
        }
        let selected: Vec<String> = ctx
            .catalog
            .selected_streams()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        for stream in &selected {
            ctx.init_count(stream);
        }

        if let Some(current) = ctx.state.currently_syncing().await {
            info!("Resuming with stream: {current}");
            ctx.catalog.rotate_to(&current);
        }

        let entries: Vec<CatalogEntry> = ctx.catalog.streams.clone();
        for entry in &entries {
            let stream_id = entry.tap_stream_id.as_str();
            if !entry.is_selected() {
                info!("Skipping stream: {stream_id}");
                continue;
            }

            info!("Syncing stream: {stream_id}");
            ctx.state.set_currently_syncing(Some(stream_id)).await;

            match self.sync_stream(ctx, entry, &sdc_fields).await {
                Ok(()) => self.stats.streams_synced += 1,
                Err(e) if e.is_run_fatal() => {
                    error!("Sync aborted during stream {stream_id}: {e}");
                    return Err(e);
                }
                Err(e) => {
                    error!("Stream {stream_id} failed: {e}");
                    self.stats.streams_failed += 1;
                }
            }

            ctx.state.set_currently_syncing(None).await;
            self.checkpoint(ctx).await?;
        }

        self.stats.duration_ms = start.elapsed().as_millis() as u64;
        log_summary(ctx);
        Ok(self.stats.clone())
    }

    /// Sync one stream, emitting its records and updating its bookmark
    async fn sync_stream(
        &mut self,
        ctx: &mut SyncContext,
        entry: &CatalogEntry,
        sdc_fields: &JsonObject,
    ) -> Result<()> {
        let stream_id = entry.tap_stream_id.as_str();
        let definition = streams::lookup(stream_id).ok_or_else(|| Error::UnknownStream {
            stream: stream_id.to_string(),
        })?;
        let query = synthesize_for_stream(&ctx.catalog, stream_id)?;
        debug!(stream = stream_id, query = %query, "Synthesized query");

        let mut variables = QueryVariables::default();
        let mut tracker = None;
        if definition.replication_method == ReplicationMethod::Incremental {
            if let Some(field) = definition.replication_field() {
                let floor = bookmark_floor(ctx, stream_id).await?;
                variables = variables.with_lower_bound(&field, &format_timestamp(floor));
                tracker = Some(BookmarkTracker::new(field, floor));
            }
        }

        let mut driver = PaginationDriver::new(self.remote.as_ref(), &query, variables);
        let mut cut_short = false;
        loop {
            let page = match driver.next_page().await {
                Ok(Some(page)) => page,
                Ok(None) => break,
                Err(e @ Error::MalformedResponse { .. }) => {
                    warn!("Ending stream {stream_id} early: {e}");
                    cut_short = true;
                    break;
                }
                Err(e) => return Err(e),
            };
            self.stats.pages_fetched += 1;

            for mut record in page {
                if let Some(tracker) = tracker.as_mut() {
                    match tracker.observe(&record) {
                        Decision::Accept => {}
                        Decision::BelowFloor => {
                            self.stats.records_skipped += 1;
                            continue;
                        }
                        Decision::MissingField => {
                            let skipped = Error::MissingReplicationField {
                                field: tracker.field().to_string(),
                            };
                            warn!(stream = stream_id, "{skipped}. Skipping record.");
                            self.stats.records_skipped += 1;
                            continue;
                        }
                        Decision::InvalidValue(value) => {
                            warn!(
                                "Unparseable {} value '{value}' in {stream_id} record. Skipping record.",
                                tracker.field()
                            );
                            self.stats.records_skipped += 1;
                            continue;
                        }
                    }
                }

                record.extend(sdc_fields.clone());
                let extracted = format_timestamp(Utc::now());
                self.writer
                    .write(&Message::record(stream_id, record, Some(extracted)))?;
                ctx.increment(stream_id);
                self.stats.records_emitted += 1;
            }
        }

        // Unfetched pages may hold records older than the max seen so far
        if cut_short {
            if let Some(tracker) = tracker {
                let stats = tracker.stats();
                warn!(
                    stream = stream_id,
                    accepted = stats.accepted,
                    "Stream ended before its last page, bookmark left unchanged"
                );
            }
        } else if let Some(tracker) = tracker {
            let stats = tracker.stats();
            let bookmark = format_timestamp(tracker.finalize());
            info!(
                stream = stream_id,
                accepted = stats.accepted,
                below_floor = stats.below_floor,
                skipped = stats.skipped,
                %bookmark,
                "Stream finished"
            );
            ctx.state.set_bookmark(stream_id, bookmark).await;
        } else {
            info!(stream = stream_id, "Stream finished");
        }

        Ok(())
    }

    /// Emit a STATE message and persist the state
    async fn checkpoint(&mut self, ctx: &SyncContext) -> Result<()> {
        self.writer.write(&Message::state(ctx.state.snapshot().await))?;
        ctx.state.save().await
    }
}

/// Lower bound for a stream: its bookmark, else the configured start date
async fn bookmark_floor(ctx: &SyncContext, stream: &str) -> Result<DateTime<Utc>> {
    if let Some(bookmark) = ctx.state.get_bookmark(stream).await {
        return parse_timestamp(&bookmark);
    }
    ctx.config
        .start_date()?
        .ok_or_else(|| Error::missing_field("start_date"))
}

fn log_summary(ctx: &SyncContext) {
    info!("----------------------");
    for (stream, count) in ctx.counts() {
        info!("{stream}: {count}");
    }
    info!("----------------------");
}

impl<W: Write> std::fmt::Debug for SyncEngine<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("stats", &self.stats)
            .field("written", &self.writer.written())
            .finish_non_exhaustive()
    }
}

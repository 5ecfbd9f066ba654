// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # shop-tap
//!
//! Incremental extraction from a shop platform's paginated GraphQL admin
//! API. Stream schemas drive everything: the query for a stream is
//! synthesized from its schema, responses are flattened back into
//! snake_case records, and a per-stream bookmark over the replication key
//! makes each run pick up where the last one stopped.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_tap::{
//!     discover, GraphqlClient, MessageWriter, SchemaSet, StateManager, SyncContext,
//!     SyncEngine, TapConfig,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> shop_tap::Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let schemas = SchemaSet::builtin()?;
//!     let mut catalog = discover(&schemas.schemas, &schemas.refs)?;
//!     catalog.select_all();
//!
//!     let client = GraphqlClient::from_config(&config)?;
//!     let mut ctx = SyncContext::new(config, catalog, StateManager::in_memory());
//!     let mut engine = SyncEngine::new(Arc::new(client), MessageWriter::stdout());
//!     engine.run(&mut ctx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  schema ──► walker ──► synthesizer ──► Query (once per stream)
//!                                          │
//!  RemoteCall ◄──── pagination driver ◄────┘
//!      │                  │
//!      └─► response ──► normalizer ──► bookmark tracker ──► RECORD
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Schema tree, reference resolution and synthetic fields
pub mod schema;

/// Query synthesis from schemas
pub mod query;

/// Response normalization
pub mod normalize;

/// Bookmark tracking over replication keys
pub mod bookmark;

/// HTTP client with retry and rate limiting, and the GraphQL remote call
pub mod http;

/// Cursor pagination over GraphQL connections
pub mod pagination;

/// Bookmark state and persistence
pub mod state;

/// SCHEMA / RECORD / STATE messages
pub mod output;

/// Tap configuration
pub mod config;

/// Stream registry
pub mod streams;

/// Catalog and discovery
pub mod catalog;

/// Schema loading
pub mod loader;

/// Shop bootstrap
pub mod shop;

/// Sync orchestration
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use catalog::{discover, Catalog, CatalogEntry};
pub use config::TapConfig;
pub use engine::{SyncContext, SyncEngine, SyncStats};
pub use http::{GraphqlClient, RemoteCall};
pub use loader::SchemaSet;
pub use output::{Message, MessageWriter};
pub use state::StateManager;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Stream registry
//!
//! Static mapping from stream name to how the stream is keyed and
//! replicated. Every stream here is extracted through the same GraphQL
//! connection machinery; they differ only in these attributes.

use crate::normalize::camel_to_snake;
use crate::types::ReplicationMethod;

/// Static description of one extractable stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDefinition {
    /// Stream name, also the top-level GraphQL connection
    pub name: &'static str,
    /// Primary key fields
    pub key_properties: &'static [&'static str],
    /// Replication key as the API spells it
    pub replication_key: Option<&'static str>,
    /// Replication method
    pub replication_method: ReplicationMethod,
}

impl StreamDefinition {
    /// Replication key as it appears in normalized records
    pub fn replication_field(&self) -> Option<String> {
        self.replication_key.map(camel_to_snake)
    }
}

/// Every registered stream, in sync order
pub const STREAMS: &[StreamDefinition] = &[StreamDefinition {
    name: "orders",
    key_properties: &["id"],
    replication_key: Some("updatedAt"),
    replication_method: ReplicationMethod::Incremental,
}];

/// Find a registered stream by name
pub fn lookup(name: &str) -> Option<&'static StreamDefinition> {
    STREAMS.iter().find(|s| s.name == name)
}

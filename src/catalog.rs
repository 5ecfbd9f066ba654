//! Catalog and discovery
//!
//! The catalog is the resolved description of every stream the tap can
//! extract: schema (references inlined, synthetic fields declared), keys,
//! replication settings and selection metadata. Discovery builds it from
//! the registry and the schema documents; sync consumes it, so the schema
//! travels as an explicit input rather than being re-read from disk.

use crate::error::{Error, Result};
use crate::schema::{add_synthetic_keys, resolve_refs, SchemaRefs};
use crate::streams::{StreamDefinition, STREAMS};
use crate::types::{Inclusion, JsonObject, JsonValue, ReplicationMethod};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

// ============================================================================
// Metadata
// ============================================================================

/// One metadata entry, addressed by breadcrumb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Empty for the stream itself, `["properties", <field>]` for a field
    #[serde(default)]
    pub breadcrumb: Vec<String>,
    /// Metadata values
    #[serde(default)]
    pub metadata: JsonObject,
}

impl MetadataEntry {
    /// Whether this entry describes the stream rather than a field
    pub fn is_root(&self) -> bool {
        self.breadcrumb.is_empty()
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Discovered (or operator-edited) catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Available streams
    pub streams: Vec<CatalogEntry>,
}

/// Stream in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stream name
    pub stream: String,

    /// Stream identifier
    pub tap_stream_id: String,

    /// Resolved JSON schema
    #[serde(default)]
    pub schema: JsonValue,

    /// Selection and inclusion metadata
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,

    /// Primary key fields
    #[serde(default)]
    pub key_properties: Vec<String>,

    /// Replication key, as the API spells it
    #[serde(default)]
    pub replication_key: Option<String>,

    /// Replication method
    #[serde(default)]
    pub replication_method: Option<ReplicationMethod>,
}

impl CatalogEntry {
    /// Bare entry for a stream and schema
    pub fn new(stream: impl Into<String>, schema: JsonValue) -> Self {
        let stream = stream.into();
        Self {
            tap_stream_id: stream.clone(),
            stream,
            schema,
            metadata: Vec::new(),
            key_properties: Vec::new(),
            replication_key: None,
            replication_method: None,
        }
    }

    /// Root metadata entry, if any
    pub fn root_metadata(&self) -> Option<&MetadataEntry> {
        self.metadata.iter().find(|m| m.is_root())
    }

    /// Whether the stream is selected for sync
    pub fn is_selected(&self) -> bool {
        self.root_metadata()
            .and_then(|m| m.metadata.get("selected"))
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }

    /// Mark the stream selected or not
    pub fn set_selected(&mut self, selected: bool) {
        if let Some(root) = self.metadata.iter_mut().find(|m| m.is_root()) {
            root.metadata.insert("selected".to_string(), json!(selected));
        } else {
            let mut metadata = JsonObject::new();
            metadata.insert("selected".to_string(), json!(selected));
            self.metadata.push(MetadataEntry {
                breadcrumb: Vec::new(),
                metadata,
            });
        }
    }
}

impl Catalog {
    /// Find a stream by its identifier
    pub fn get(&self, tap_stream_id: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|s| s.tap_stream_id == tap_stream_id)
    }

    /// Schema for a stream, or `SchemaNotFound`
    pub fn schema_for(&self, tap_stream_id: &str) -> Result<&JsonValue> {
        self.get(tap_stream_id)
            .map(|entry| &entry.schema)
            .filter(|schema| schema.is_object())
            .ok_or_else(|| Error::schema_not_found(tap_stream_id))
    }

    /// Identifiers of the selected streams, in catalog order
    pub fn selected_streams(&self) -> Vec<&str> {
        self.streams
            .iter()
            .filter(|s| s.is_selected())
            .map(|s| s.tap_stream_id.as_str())
            .collect()
    }

    /// Select every stream
    pub fn select_all(&mut self) {
        for entry in &mut self.streams {
            entry.set_selected(true);
        }
    }

    /// Rotate the stream list so `tap_stream_id` comes first.
    ///
    /// Used to resume an interrupted sync with the stream it was working
    /// on; relative order of the others is kept.
    pub fn rotate_to(&mut self, tap_stream_id: &str) {
        if let Some(index) = self
            .streams
            .iter()
            .position(|s| s.tap_stream_id == tap_stream_id)
        {
            self.streams.rotate_left(index);
        }
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Build the catalog for every registered stream that has a schema.
///
/// Each schema gets its references resolved against a fresh view of `refs`
/// and the synthetic shop fields declared. Metadata is computed from the
/// schema as written, before synthetic fields are added.
pub fn discover(schemas: &HashMap<String, JsonValue>, refs: &SchemaRefs) -> Result<Catalog> {
    let mut streams = Vec::new();

    for definition in STREAMS {
        let Some(raw) = schemas.get(definition.name) else {
            continue;
        };

        let mut schema = resolve_refs(raw, refs)?;
        let metadata = discovery_metadata(definition, &schema);
        add_synthetic_keys(&mut schema);

        streams.push(CatalogEntry {
            stream: definition.name.to_string(),
            tap_stream_id: definition.name.to_string(),
            schema,
            metadata,
            key_properties: definition
                .key_properties
                .iter()
                .map(ToString::to_string)
                .collect(),
            replication_key: definition.replication_key.map(ToString::to_string),
            replication_method: Some(definition.replication_method),
        });
    }

    Ok(Catalog { streams })
}

/// Stream and field metadata for discovery
pub fn discovery_metadata(definition: &StreamDefinition, schema: &JsonValue) -> Vec<MetadataEntry> {
    let mut root = JsonObject::new();
    root.insert(
        "table-key-properties".to_string(),
        json!(definition.key_properties),
    );
    root.insert(
        "forced-replication-method".to_string(),
        json!(definition.replication_method),
    );
    if let Some(key) = definition.replication_key {
        root.insert("valid-replication-keys".to_string(), json!([key]));
    }

    let mut entries = vec![MetadataEntry {
        breadcrumb: Vec::new(),
        metadata: root,
    }];

    if let Some(properties) = schema.get("properties").and_then(JsonValue::as_object) {
        for field in properties.keys() {
            let automatic = definition.key_properties.contains(&field.as_str())
                || definition.replication_key == Some(field.as_str());
            let inclusion = if automatic {
                Inclusion::Automatic
            } else {
                Inclusion::Available
            };

            let mut metadata = JsonObject::new();
            metadata.insert("inclusion".to_string(), json!(inclusion));
            entries.push(MetadataEntry {
                breadcrumb: vec!["properties".to_string(), field.clone()],
                metadata,
            });
        }
    }

    entries
}

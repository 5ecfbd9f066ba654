//! Schema loader module
//!
//! Loads stream schemas from a directory of JSON documents. Every
//! `<stream>.json` is a stream schema; `definitions.json` holds shared
//! definitions referenced from them. The schemas shipped with the tap are
//! embedded in the binary and used when no directory is given.

use crate::error::{Error, Result, ResultExt};
use crate::schema::SchemaRefs;
use crate::types::JsonValue;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// File holding shared definitions
pub const DEFINITIONS_FILE: &str = "definitions.json";

const BUILTIN_SCHEMAS: [(&str, &str); 2] = [
    ("orders.json", include_str!("../../schemas/orders.json")),
    (DEFINITIONS_FILE, include_str!("../../schemas/definitions.json")),
];

/// Stream schemas plus the shared documents they reference
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    /// Raw stream schemas keyed by stream name
    pub schemas: HashMap<String, JsonValue>,
    /// Shared documents keyed by file name
    pub refs: SchemaRefs,
}

impl SchemaSet {
    /// Schemas embedded in the binary
    pub fn builtin() -> Result<Self> {
        let mut set = Self::default();
        for (file_name, contents) in BUILTIN_SCHEMAS {
            set.insert_document(file_name, contents)?;
        }
        Ok(set)
    }

    /// Load from `dir`, or the built-in schemas when `dir` is `None`
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => load_schemas(dir),
            None => Self::builtin(),
        }
    }

    /// Stream names with a schema, sorted
    pub fn stream_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn insert_document(&mut self, file_name: &str, contents: &str) -> Result<()> {
        let document: JsonValue = serde_json::from_str(contents).map_err(|e| {
            Error::invalid_schema(format!("failed to parse '{file_name}': {e}"))
        })?;

        if file_name == DEFINITIONS_FILE {
            self.refs.insert(file_name.to_string(), document);
        } else if let Some(stream) = file_name.strip_suffix(".json") {
            self.schemas.insert(stream.to_string(), document);
        }
        Ok(())
    }
}

/// Load every `*.json` document in `dir`
pub fn load_schemas(dir: impl AsRef<Path>) -> Result<SchemaSet> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::config(format!(
            "Failed to read schema directory '{}': {e}",
            dir.display()
        ))
    })?;

    let mut set = SchemaSet::default();
    for entry in entries {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.ends_with(".json") {
            continue;
        }

        debug!("Loading schema {}", path.display());
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read schema '{}'", path.display()))?;
        set.insert_document(file_name, &contents)?;
    }

    Ok(set)
}

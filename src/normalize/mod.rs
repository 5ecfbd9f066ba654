//! Response normalization
//!
//! Turns raw GraphQL nodes into pipeline records:
//! - connections (`{"edges": [{"node": ..}], "pageInfo": ..}`) become plain
//!   ordered lists of their nodes, page info dropped
//! - every mapping key is renamed from camelCase to snake_case
//! - scalars pass through unchanged
//!
//! Normalization is total over JSON input and has no side effects.

use crate::types::{JsonValue, Record};
use serde_json::Value;

/// Key that marks a pagination envelope
pub const EDGES_KEY: &str = "edges";

/// Key of the item inside an edge
pub const NODE_KEY: &str = "node";

/// Rename a camelCase key to snake_case.
///
/// An underscore goes before every uppercase ASCII letter that does not
/// start the name, then the whole name is lowercased. Digits stay attached
/// to what precedes them (`lineItems2` -> `line_items2`).
pub fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Normalize an arbitrary response value.
pub fn normalize(value: &JsonValue) -> JsonValue {
    match value {
        Value::Object(map) => {
            if let Some(edges) = map.get(EDGES_KEY) {
                return Value::Array(unwrap_edges(edges));
            }
            Value::Object(
                map.iter()
                    .map(|(k, v)| (camel_to_snake(k), normalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        other => other.clone(),
    }
}

/// Normalize one top-level node into a record.
///
/// Nodes that are not mappings (which a well-formed connection never
/// yields) are wrapped under a `value` key.
pub fn normalize_record(node: &JsonValue) -> Record {
    match normalize(node) {
        Value::Object(record) => record,
        other => {
            let mut record = Record::new();
            record.insert("value".to_string(), other);
            record
        }
    }
}

fn unwrap_edges(edges: &JsonValue) -> Vec<JsonValue> {
    edges
        .as_array()
        .map(|edges| {
            edges
                .iter()
                .map(|edge| normalize(edge.get(NODE_KEY).unwrap_or(&Value::Null)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests;

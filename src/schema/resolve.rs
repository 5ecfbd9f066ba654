//! `$ref` resolution against shared schema documents
//!
//! Stream schemas point at shared definitions with references such as
//! `definitions.json#/definitions/customer` or, for local definitions,
//! `#/definitions/money`. Resolution inlines the referenced document in
//! place and recurses into it.

use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Shared documents keyed by file name (e.g. `definitions.json`)
pub type SchemaRefs = HashMap<String, Value>;

/// Resolve every `$ref` in `schema`, returning a new document.
///
/// The input and `refs` are left untouched, so one set of references can be
/// shared by every stream without cross-contamination.
pub fn resolve_refs(schema: &Value, refs: &SchemaRefs) -> Result<Value> {
    let mut visiting = Vec::new();
    resolve_node(schema, schema, refs, &mut visiting)
}

fn resolve_node(
    node: &Value,
    root: &Value,
    refs: &SchemaRefs,
    visiting: &mut Vec<String>,
) -> Result<Value> {
    match node {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                if visiting.iter().any(|r| r == reference) {
                    return Err(Error::invalid_schema(format!(
                        "circular reference '{reference}'"
                    )));
                }
                let (target, target_root) = lookup(reference, root, refs)?;
                visiting.push(reference.to_string());
                let resolved = resolve_node(target, target_root, refs, visiting);
                visiting.pop();
                return resolved;
            }

            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key.clone(), resolve_node(value, root, refs, visiting)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| resolve_node(item, root, refs, visiting))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

/// Find the document a reference points at, along with the root that its
/// own local references resolve against.
fn lookup<'a>(
    reference: &str,
    root: &'a Value,
    refs: &'a SchemaRefs,
) -> Result<(&'a Value, &'a Value)> {
    let (file, pointer) = reference.split_once('#').unwrap_or((reference, ""));

    let document = if file.is_empty() {
        root
    } else {
        refs.get(file).ok_or_else(|| {
            Error::invalid_schema(format!("unknown schema document '{file}' in '{reference}'"))
        })?
    };

    let target = if pointer.is_empty() {
        document
    } else {
        document.pointer(pointer).ok_or_else(|| {
            Error::invalid_schema(format!("unresolvable reference '{reference}'"))
        })?
    };

    Ok((target, document))
}

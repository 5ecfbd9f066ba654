//! Synthetic shop fields
//!
//! Every emitted record carries the shop it came from. The fields are
//! declared in the catalog schema but never requested from the API.

use super::types::SYNTHETIC_PREFIX;
use crate::types::{JsonObject, JsonValue};
use serde_json::json;

/// Shop attributes copied into every record, with their JSON types
pub const SHOP_KEYS: [(&str, &str); 3] = [
    ("id", "integer"),
    ("name", "string"),
    ("myshopify_domain", "string"),
];

/// Full name of the synthetic field for a shop attribute
pub fn synthetic_field_name(attribute: &str) -> String {
    format!("{SYNTHETIC_PREFIX}shop_{attribute}")
}

/// Declare the synthetic shop fields on a stream schema.
pub fn add_synthetic_keys(schema: &mut JsonValue) {
    let Some(root) = schema.as_object_mut() else {
        return;
    };
    let properties = root
        .entry("properties")
        .or_insert_with(|| JsonValue::Object(JsonObject::new()));

    if let Some(properties) = properties.as_object_mut() {
        for (attribute, json_type) in SHOP_KEYS {
            properties.insert(
                synthetic_field_name(attribute),
                json!({ "type": ["null", json_type] }),
            );
        }
    }
}

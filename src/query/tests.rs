//! Tests for query synthesis

use super::*;
use crate::catalog::{Catalog, CatalogEntry};
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;

fn orders_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "id": {"type": "string"},
            "updatedAt": {"type": ["null", "string"], "format": "date-time"},
            "_sdc_shop_id": {"type": ["null", "integer"]},
            "lineItems": {
                "type": ["null", "array"],
                "items": {"type": "object", "properties": {"sku": {"type": "string"}}}
            }
        }
    })
}

#[test]
fn test_synthesize_full_document() {
    let query = synthesize(&orders_schema(), "orders");

    let expected = "query($first: Int!, $after: String, $query: String) {\n  \
        orders(first: $first, after: $after, query: $query) {\n    \
        edges {\n      node {\n        \
        id updatedAt lineItems(first: $first, after: $after) { edges { node { sku } } pageInfo { hasNextPage endCursor } }\n      \
        }\n    }\n    pageInfo {\n      hasNextPage\n      endCursor\n    }\n  }\n}\n";

    assert_eq!(query.text(), expected);
    assert_eq!(query.entity(), "orders");
}

#[test]
fn test_synthesize_excludes_synthetic_fields() {
    let query = synthesize(&orders_schema(), "orders");
    assert!(!query.text().contains("_sdc_"));
}

#[test]
fn test_synthesize_never_selects_object_bare() {
    let schema = json!({
        "properties": {
            "shop": {"type": "object", "properties": {"_sdc_x": {"type": "string"}}},
            "id": {"type": "string"}
        }
    });

    let query = synthesize(&schema, "orders");
    assert!(query.text().contains("node {\n        id\n"));
    assert!(!query.text().contains("shop"));
}

#[test]
fn test_synthesize_nested_object() {
    let schema = json!({
        "properties": {
            "customer": {
                "type": "object",
                "properties": {
                    "email": {"type": "string"},
                    "defaultAddress": {
                        "type": ["null", "object"],
                        "properties": {"city": {"type": "string"}}
                    }
                }
            }
        }
    });

    let query = synthesize(&schema, "orders");
    assert!(query
        .text()
        .contains("customer { email defaultAddress { city } }"));
}

#[test]
fn test_synthesize_is_deterministic() {
    let a = synthesize(&orders_schema(), "orders");
    let b = synthesize(&orders_schema(), "orders");
    assert_eq!(a, b);
}

#[test]
fn test_render_selections_empty() {
    assert_eq!(render_selections(&[]), "");
}

#[test]
fn test_synthesize_for_stream_found() {
    let catalog = Catalog {
        streams: vec![CatalogEntry::new("orders", orders_schema())],
    };
    let query = synthesize_for_stream(&catalog, "orders").unwrap();
    assert!(query.text().contains("orders(first: $first"));
}

#[test]
fn test_synthesize_for_stream_missing_schema() {
    let catalog = Catalog::default();
    let err = synthesize_for_stream(&catalog, "orders").unwrap_err();
    assert!(matches!(err, Error::SchemaNotFound { ref stream } if stream == "orders"));
}

// ============================================================================
// Variables
// ============================================================================

#[test]
fn test_query_variables_serialization() {
    let vars = QueryVariables::default().with_lower_bound("updated_at", "2024-01-01T00:00:00Z");
    assert_eq!(
        serde_json::to_value(&vars).unwrap(),
        json!({
            "first": 100,
            "after": null,
            "query": "updated_at:>=2024-01-01T00:00:00Z"
        })
    );
}

#[test]
fn test_query_variables_advance() {
    let mut vars = QueryVariables::new(10);
    vars.advance(Some("cursor-1".to_string()));
    assert_eq!(vars.after.as_deref(), Some("cursor-1"));
    assert_eq!(vars.first, 10);
    assert!(vars.query.is_none());
}

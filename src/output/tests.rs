//! Tests for output module

use super::*;
use crate::state::State;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn lines(writer: MessageWriter<Vec<u8>>) -> Vec<Value> {
    let bytes = writer.into_inner();
    String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// ============================================================================
// Message Shape Tests
// ============================================================================

#[test]
fn test_schema_message_shape() {
    let message = Message::schema(
        "orders",
        json!({"type": "object"}),
        vec!["id".to_string()],
        vec!["updated_at".to_string()],
    );

    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        json!({
            "type": "SCHEMA",
            "stream": "orders",
            "schema": {"type": "object"},
            "key_properties": ["id"],
            "bookmark_properties": ["updated_at"]
        })
    );
}

#[test]
fn test_schema_message_without_bookmark_properties() {
    let message = Message::schema("orders", json!({}), vec![], vec![]);
    let value = serde_json::to_value(&message).unwrap();
    assert!(value.get("bookmark_properties").is_none());
    assert_eq!(value["key_properties"], json!([]));
}

#[test]
fn test_record_message_shape() {
    let record = json!({"id": "1", "total_price": "9.99"})
        .as_object()
        .cloned()
        .unwrap();
    let message = Message::record(
        "orders",
        record,
        Some("2024-01-01T00:00:00.000000Z".to_string()),
    );

    assert_eq!(message.stream(), Some("orders"));
    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        json!({
            "type": "RECORD",
            "stream": "orders",
            "record": {"id": "1", "total_price": "9.99"},
            "time_extracted": "2024-01-01T00:00:00.000000Z"
        })
    );
}

#[test]
fn test_state_message_shape() {
    let mut state = State::new();
    state.set_bookmark("orders", "2024-01-05T00:00:00.000000Z".to_string());
    let message = Message::state(state);

    assert!(message.stream().is_none());
    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        json!({
            "type": "STATE",
            "value": {"bookmarks": {"orders": "2024-01-05T00:00:00.000000Z"}}
        })
    );
}

#[test]
fn test_message_parse() {
    let message: Message = serde_json::from_value(json!({
        "type": "RECORD",
        "stream": "orders",
        "record": {"id": "1"}
    }))
    .unwrap();

    match message {
        Message::Record {
            stream,
            time_extracted,
            ..
        } => {
            assert_eq!(stream, "orders");
            assert!(time_extracted.is_none());
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

// ============================================================================
// Writer Tests
// ============================================================================

#[test]
fn test_writer_one_line_per_message() {
    let mut writer = MessageWriter::new(Vec::new());
    writer
        .write(&Message::schema("orders", json!({}), vec!["id".into()], vec![]))
        .unwrap();
    writer
        .write(&Message::record("orders", serde_json::Map::new(), None))
        .unwrap();
    writer.write(&Message::state(State::new())).unwrap();

    assert_eq!(writer.written(), 3);
    let output = lines(writer);
    let types: Vec<&str> = output.iter().map(|m| m["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["SCHEMA", "RECORD", "STATE"]);
}

#[test]
fn test_writer_preserves_record_key_order() {
    let mut writer = MessageWriter::new(Vec::new());
    let record = json!({"zeta": 1, "alpha": 2}).as_object().cloned().unwrap();
    writer
        .write(&Message::record("orders", record, None))
        .unwrap();

    let text = String::from_utf8(writer.into_inner()).unwrap();
    assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
    assert!(text.ends_with('\n'));
}

//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use crate::http::RemoteCall;
use crate::query::{synthesize, QueryVariables};
use async_trait::async_trait;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays canned responses and records the variables of every call
struct ScriptedRemote {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<Value>>,
}

impl ScriptedRemote {
    fn new(responses: Vec<Result<Value>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteCall for ScriptedRemote {
    async fn execute(&self, _query: &str, variables: &Value) -> Result<Value> {
        self.calls.lock().unwrap().push(variables.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Other("no scripted response left".into())))
    }
}

fn page(ids: &[&str], next: Option<&str>) -> Value {
    let edges: Vec<Value> = ids
        .iter()
        .map(|id| json!({"node": {"id": id, "updatedAt": "2024-01-01T00:00:00Z"}}))
        .collect();
    json!({
        "data": {
            "orders": {
                "edges": edges,
                "pageInfo": {"hasNextPage": next.is_some(), "endCursor": next}
            }
        }
    })
}

fn orders_query() -> crate::query::Query {
    synthesize(
        &json!({"properties": {"id": {"type": "string"}, "updatedAt": {"type": "string"}}}),
        "orders",
    )
}

// ============================================================================
// PageInfo Tests
// ============================================================================

#[test]
fn test_page_info_parse() {
    let info: PageInfo =
        serde_json::from_value(json!({"hasNextPage": true, "endCursor": "abc"})).unwrap();
    assert_eq!(info.next_cursor(), Some("abc"));

    let info: PageInfo = serde_json::from_value(json!({})).unwrap();
    assert!(!info.has_next_page);
    assert!(info.next_cursor().is_none());
}

#[test]
fn test_page_info_last_page_has_no_next_cursor() {
    let info = PageInfo {
        has_next_page: false,
        end_cursor: Some("abc".into()),
    };
    assert!(info.next_cursor().is_none());
}

#[test]
fn test_page_state_terminal() {
    assert!(!PageState::Init.is_terminal());
    assert!(!PageState::HasMore.is_terminal());
    assert!(PageState::Done.is_terminal());
    assert!(PageState::Error.is_terminal());
}

// ============================================================================
// parse_page Tests
// ============================================================================

#[test]
fn test_parse_page_normalizes_nodes() {
    let response = json!({
        "data": {"orders": {
            "edges": [{"node": {"id": "1", "totalPriceSet": {"shopMoney": {"amount": "1.00"}}}}],
            "pageInfo": {"hasNextPage": false, "endCursor": "c1"}
        }}
    });

    let (records, info) = parse_page("orders", &response).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        Value::Object(records[0].clone()),
        json!({"id": "1", "total_price_set": {"shop_money": {"amount": "1.00"}}})
    );
    assert!(!info.has_next_page);
}

#[test]
fn test_parse_page_missing_data_is_malformed() {
    let response = json!({"errors": [{"message": "Throttled"}]});
    let err = parse_page("orders", &response).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { ref stream, .. } if stream == "orders"));
}

#[test]
fn test_parse_page_null_data_is_malformed() {
    let err = parse_page("orders", &json!({"data": null})).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[test]
fn test_parse_page_missing_connection_is_malformed() {
    let err = parse_page("orders", &json!({"data": {"customers": {}}})).unwrap_err();
    assert!(err.to_string().contains("'orders'"));
}

#[test]
fn test_parse_page_skips_null_nodes() {
    let response = json!({
        "data": {"orders": {"edges": [{"node": null}, {"node": {"id": "2"}}]}}
    });
    let (records, info) = parse_page("orders", &response).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(info, PageInfo::default());
}

// ============================================================================
// Driver Tests
// ============================================================================

#[tokio::test]
async fn test_driver_exhausts_three_pages() {
    let remote = ScriptedRemote::new(vec![
        Ok(page(&["1", "2"], Some("c1"))),
        Ok(page(&["3"], Some("c2"))),
        Ok(page(&["4"], None)),
    ]);
    let query = orders_query();
    let variables = QueryVariables::default().with_filter("updated_at:>=2024-01-01");
    let mut driver = PaginationDriver::new(&remote, &query, variables);
    assert_eq!(driver.state(), PageState::Init);

    let mut ids = Vec::new();
    while let Some(records) = driver.next_page().await.unwrap() {
        ids.extend(records.iter().map(|r| r["id"].as_str().unwrap().to_string()));
    }

    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert_eq!(driver.state(), PageState::Done);
    assert_eq!(driver.pages_fetched(), 3);
    assert_eq!(driver.records_fetched(), 4);

    let calls = remote.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0]["after"], Value::Null);
    assert_eq!(calls[1]["after"], "c1");
    assert_eq!(calls[2]["after"], "c2");
    for call in &calls {
        assert_eq!(call["first"], 100);
        assert_eq!(call["query"], "updated_at:>=2024-01-01");
    }

    // Exhausted drivers do not call again
    assert!(driver.next_page().await.unwrap().is_none());
    assert_eq!(remote.calls().len(), 3);
}

#[tokio::test]
async fn test_driver_stream() {
    let remote = ScriptedRemote::new(vec![
        Ok(page(&["1"], Some("c1"))),
        Ok(page(&["2"], None)),
    ]);
    let query = orders_query();
    let driver = PaginationDriver::new(&remote, &query, QueryVariables::default());

    let pages: Vec<_> = driver.into_stream().try_collect().await.unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(remote.calls().len(), 2);
}

#[tokio::test]
async fn test_driver_stops_on_malformed_response() {
    let remote = ScriptedRemote::new(vec![
        Ok(page(&["1"], Some("c1"))),
        Ok(json!({"errors": [{"message": "Internal error"}]})),
        Ok(page(&["never"], None)),
    ]);
    let query = orders_query();
    let mut driver = PaginationDriver::new(&remote, &query, QueryVariables::default());

    assert_eq!(driver.next_page().await.unwrap().unwrap().len(), 1);
    assert_eq!(driver.state(), PageState::HasMore);

    let err = driver.next_page().await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
    assert_eq!(driver.state(), PageState::Error);

    assert!(driver.next_page().await.unwrap().is_none());
    assert_eq!(remote.calls().len(), 2);
}

#[tokio::test]
async fn test_driver_propagates_transport_error() {
    let remote = ScriptedRemote::new(vec![Err(Error::Unauthorized {
        message: "401".into(),
    })]);
    let query = orders_query();
    let mut driver = PaginationDriver::new(&remote, &query, QueryVariables::default());

    let err = driver.next_page().await.unwrap_err();
    assert!(err.is_run_fatal());
}

#[tokio::test]
async fn test_driver_stops_when_cursor_missing() {
    let remote = ScriptedRemote::new(vec![Ok(json!({
        "data": {"orders": {
            "edges": [{"node": {"id": "1"}}],
            "pageInfo": {"hasNextPage": true, "endCursor": null}
        }}
    }))]);
    let query = orders_query();
    let mut driver = PaginationDriver::new(&remote, &query, QueryVariables::default());

    assert!(driver.next_page().await.unwrap().is_some());
    assert_eq!(driver.state(), PageState::Done);
}

#[test]
fn test_driver_debug() {
    let remote = ScriptedRemote::new(vec![]);
    let query = orders_query();
    let driver = PaginationDriver::new(&remote, &query, QueryVariables::default());
    assert!(format!("{driver:?}").contains("orders"));
}

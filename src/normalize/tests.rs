//! Tests for response normalization

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

#[test_case("id", "id" ; "already snake")]
#[test_case("totalPriceSet", "total_price_set" ; "camel case")]
#[test_case("lineItems2", "line_items2" ; "trailing digit")]
#[test_case("abc123Def", "abc123_def" ; "digit run before capital")]
#[test_case("ID", "i_d" ; "every capital after the first")]
#[test_case("Name", "name" ; "leading capital")]
#[test_case("", "" ; "empty")]
#[test_case("already_snake_case", "already_snake_case" ; "underscores kept")]
fn test_camel_to_snake(input: &str, expected: &str) {
    assert_eq!(camel_to_snake(input), expected);
}

#[test]
fn test_camel_to_snake_is_pure() {
    let once = camel_to_snake("currentTotalDiscountsSet");
    assert_eq!(once, camel_to_snake("currentTotalDiscountsSet"));
    assert_eq!(once, "current_total_discounts_set");
}

#[test]
fn test_envelope_stripping() {
    let raw = json!({
        "edges": [{"node": {"id": 1}}, {"node": {"id": 2}}],
        "pageInfo": {"hasNextPage": true, "endCursor": "abc"}
    });

    assert_eq!(normalize(&raw), json!([{"id": 1}, {"id": 2}]));
}

#[test]
fn test_nested_envelopes_and_renaming() {
    let raw = json!({
        "id": "gid://shopify/Order/1",
        "updatedAt": "2024-01-01T00:00:00Z",
        "totalPriceSet": {"shopMoney": {"amount": "10.00", "currencyCode": "USD"}},
        "lineItems": {
            "edges": [
                {"node": {"sku": "A-1", "discountAllocations": {"edges": []}}},
                {"node": {"sku": "B-2", "discountAllocations": {"edges": [
                    {"node": {"allocatedAmount": "1.00"}}
                ]}}}
            ],
            "pageInfo": {"hasNextPage": false, "endCursor": null}
        },
        "tags": ["vip", "wholesale"]
    });

    let expected = json!({
        "id": "gid://shopify/Order/1",
        "updated_at": "2024-01-01T00:00:00Z",
        "total_price_set": {"shop_money": {"amount": "10.00", "currency_code": "USD"}},
        "line_items": [
            {"sku": "A-1", "discount_allocations": []},
            {"sku": "B-2", "discount_allocations": [{"allocated_amount": "1.00"}]}
        ],
        "tags": ["vip", "wholesale"]
    });

    assert_eq!(normalize(&raw), expected);
}

#[test]
fn test_normalize_is_idempotent_on_same_input() {
    let raw = json!({"lineItems": {"edges": [{"node": {"unitPrice": 3}}]}});
    assert_eq!(normalize(&raw), normalize(&raw));
}

#[test]
fn test_scalars_unchanged() {
    assert_eq!(normalize(&json!(42)), json!(42));
    assert_eq!(normalize(&json!("camelCase")), json!("camelCase"));
    assert_eq!(normalize(&json!(null)), json!(null));
    assert_eq!(normalize(&json!([1, "a", true])), json!([1, "a", true]));
}

#[test]
fn test_malformed_edges_are_tolerated() {
    assert_eq!(normalize(&json!({"edges": null})), json!([]));
    assert_eq!(normalize(&json!({"edges": [{"cursor": "x"}]})), json!([null]));
}

#[test]
fn test_normalize_record_wraps_non_objects() {
    let record = normalize_record(&json!({"createdAt": "x"}));
    assert_eq!(record.get("created_at"), Some(&json!("x")));

    let record = normalize_record(&json!(7));
    assert_eq!(record.get("value"), Some(&json!(7)));
}

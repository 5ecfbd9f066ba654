//! Shop bootstrap
//!
//! Before syncing, the tap asks the API who the shop is. The answer feeds
//! the synthetic `_sdc_shop_*` fields merged into every record.

use crate::error::{Error, Result};
use crate::http::RemoteCall;
use crate::normalize::normalize_record;
use crate::schema::{synthetic_field_name, SHOP_KEYS};
use crate::types::{JsonObject, JsonValue};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::LazyLock;
use tracing::info;

/// Query for the shop's identity
pub const SHOP_QUERY: &str = "query { shop { id name myshopifyDomain } }";

static SHOP_GID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^gid://shopify/Shop/(\d+)$").expect("valid shop id pattern"));

/// Identity of the shop being synced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopInfo {
    /// Numeric shop id
    pub id: Option<i64>,
    /// Display name
    pub name: Option<String>,
    /// Canonical `<shop>.myshopify.com` domain
    pub myshopify_domain: Option<String>,
}

impl ShopInfo {
    /// Extract the shop from a response to [`SHOP_QUERY`]
    pub fn from_response(response: &JsonValue) -> Result<Self> {
        let shop = response
            .get("data")
            .and_then(|data| data.get("shop"))
            .filter(|shop| shop.is_object())
            .ok_or_else(|| Error::malformed("shop", "response has no shop"))?;

        let record = normalize_record(shop);
        let text = |key: &str| record.get(key).and_then(JsonValue::as_str).map(String::from);

        Ok(Self {
            id: record
                .get("id")
                .and_then(JsonValue::as_str)
                .and_then(parse_shop_gid),
            name: text("name"),
            myshopify_domain: text("myshopify_domain"),
        })
    }

    /// The `_sdc_shop_*` values to merge into records
    pub fn sdc_fields(&self) -> JsonObject {
        SHOP_KEYS
            .iter()
            .map(|(attribute, _)| {
                let value = match *attribute {
                    "id" => json!(self.id),
                    "name" => json!(self.name),
                    "myshopify_domain" => json!(self.myshopify_domain),
                    _ => JsonValue::Null,
                };
                (synthetic_field_name(attribute), value)
            })
            .collect()
    }
}

/// Numeric id from a `gid://shopify/Shop/<n>` global id
pub fn parse_shop_gid(gid: &str) -> Option<i64> {
    SHOP_GID
        .captures(gid)
        .and_then(|caps| caps.get(1))
        .and_then(|id| id.as_str().parse().ok())
}

/// Query the API for the shop's identity
pub async fn fetch_shop(remote: &dyn RemoteCall) -> Result<ShopInfo> {
    let response = remote.execute(SHOP_QUERY, &json!({})).await?;
    let shop = ShopInfo::from_response(&response)?;
    info!(
        shop_id = ?shop.id,
        shop_name = ?shop.name,
        "Connected to shop"
    );
    Ok(shop)
}

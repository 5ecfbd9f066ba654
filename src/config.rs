//! Tap configuration
//!
//! The JSON configuration file handed to the tap at startup, plus the
//! derived values (shop name, endpoint, start date) the rest of the crate
//! reads from it.

use crate::bookmark::parse_timestamp;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Suffix stripped from configured shop names
const SHOP_DOMAIN_SUFFIX: &str = ".myshopify.com";

fn default_graphql_api_version() -> String {
    "2024-07".to_string()
}

/// Complete tap configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Shop name or domain (`acme` or `acme.myshopify.com`)
    pub shop: String,

    /// Admin API access token
    #[serde(default)]
    pub access_token: Option<String>,

    /// Legacy name for the access token
    #[serde(default)]
    pub api_key: Option<String>,

    /// Replication start for streams without a bookmark (ISO-8601)
    #[serde(default)]
    pub start_date: Option<String>,

    /// GraphQL API version
    #[serde(default = "default_graphql_api_version")]
    pub graphql_api_version: String,

    /// Shop identifier used in the endpoint host, if it differs from `shop`
    #[serde(default)]
    pub shop_id: Option<String>,

    /// Override for `https://<shop>.myshopify.com`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Client-side request pace (0 disables the limiter)
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

impl TapConfig {
    /// Minimal configuration for a shop and token
    pub fn new(shop: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop: shop.into(),
            access_token: Some(access_token.into()),
            api_key: None,
            start_date: None,
            graphql_api_version: default_graphql_api_version(),
            shop_id: None,
            base_url: None,
            requests_per_second: None,
        }
    }

    /// Set the start date
    #[must_use]
    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    /// Set the base URL override
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request pace
    #[must_use]
    pub fn with_requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|_| Error::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate inline JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields and value formats
    pub fn validate(&self) -> Result<()> {
        if self.shop.trim().is_empty() {
            return Err(Error::missing_field("shop"));
        }
        self.access_token()?;
        if let Some(start) = &self.start_date {
            parse_timestamp(start).map_err(|e| Error::InvalidConfigValue {
                field: "start_date".to_string(),
                message: e.to_string(),
            })?;
        }
        if let Some(base) = &self.base_url {
            Url::parse(base).map_err(|e| Error::InvalidConfigValue {
                field: "base_url".to_string(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// The access token, preferring `access_token` over `api_key`
    pub fn access_token(&self) -> Result<&str> {
        non_blank(self.access_token.as_deref())
            .or_else(|| non_blank(self.api_key.as_deref()))
            .ok_or_else(|| Error::config("No 'access_token' or 'api_key' provided in the config"))
    }

    /// Shop name with any domain suffix removed
    pub fn shop_name(&self) -> &str {
        let shop = self.shop.trim();
        shop.strip_suffix(SHOP_DOMAIN_SUFFIX)
            .or_else(|| shop.split_once('.').map(|(name, _)| name))
            .unwrap_or(shop)
    }

    /// Parsed start date, if configured
    pub fn start_date(&self) -> Result<Option<DateTime<Utc>>> {
        self.start_date.as_deref().map(parse_timestamp).transpose()
    }

    /// GraphQL endpoint for this shop
    pub fn graphql_endpoint(&self) -> Result<Url> {
        let base = match &self.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => {
                let host = self.shop_id.as_deref().unwrap_or_else(|| self.shop_name());
                format!("https://{host}{SHOP_DOMAIN_SUFFIX}")
            }
        };
        let url = format!(
            "{base}/admin/api/{}/graphql.json",
            self.graphql_api_version
        );
        Ok(Url::parse(&url)?)
    }
}

fn non_blank(token: Option<&str>) -> Option<&str> {
    token.filter(|t| !t.trim().is_empty())
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("shop", &self.shop)
            .field("start_date", &self.start_date)
            .field("graphql_api_version", &self.graphql_api_version)
            .field("shop_id", &self.shop_id)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

//! GraphQL remote call
//!
//! The pagination driver only knows the [`RemoteCall`] seam: send a query
//! document with variables, get a JSON response back. [`GraphqlClient`] is
//! the production implementation on top of [`HttpClient`], translating
//! transport failures into the three kinds the run reacts to.

use super::client::{HttpClient, HttpClientConfig};
use super::rate_limit::RateLimiterConfig;
use crate::config::TapConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

/// Header carrying the shop access token
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Executes a query against the remote graph API
#[async_trait]
pub trait RemoteCall: Send + Sync {
    /// Send `query` with `variables` and return the raw JSON response.
    ///
    /// Failures are reported as `ShopNotFound`, `Unauthorized` or
    /// `Connection`.
    async fn execute(&self, query: &str, variables: &Value) -> Result<Value>;
}

/// GraphQL client for one shop's admin endpoint
#[derive(Debug)]
pub struct GraphqlClient {
    http: HttpClient,
    endpoint: Url,
}

impl GraphqlClient {
    /// Create a client posting to `endpoint`
    pub fn new(http: HttpClient, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// Build the client for a tap configuration
    pub fn from_config(config: &TapConfig) -> Result<Self> {
        let token = config.access_token()?;
        let mut builder = HttpClientConfig::builder()
            .header(ACCESS_TOKEN_HEADER, token)
            .header("Accept", "application/json");

        builder = match config.requests_per_second {
            Some(0) => builder.no_rate_limit(),
            Some(rps) => builder.rate_limit(RateLimiterConfig::new(rps, rps)),
            None => builder,
        };

        let http = HttpClient::with_config(builder.build())?;
        Ok(Self::new(http, config.graphql_endpoint()?))
    }

    /// Endpoint every query is posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteCall for GraphqlClient {
    async fn execute(&self, query: &str, variables: &Value) -> Result<Value> {
        debug!(endpoint = %self.endpoint, %variables, "Executing GraphQL query");
        let body = json!({ "query": query, "variables": variables });
        self.http
            .post_json(self.endpoint.as_str(), &body)
            .await
            .map_err(classify_transport_error)
    }
}

/// Map transport-level failures onto the kinds the run distinguishes
pub fn classify_transport_error(error: Error) -> Error {
    match error {
        Error::HttpStatus { status: 404, body } => Error::ShopNotFound { message: body },
        Error::HttpStatus {
            status: 401 | 403,
            body,
        } => Error::Unauthorized { message: body },
        Error::HttpStatus { status, body } => Error::Connection {
            message: errors_message(&body).unwrap_or_else(|| format!("HTTP {status}: {body}")),
        },
        Error::Http(e) => Error::Connection {
            message: e.to_string(),
        },
        e @ (Error::Timeout { .. }
        | Error::RateLimited { .. }
        | Error::MaxRetriesExceeded { .. }
        | Error::JsonParse(_)) => Error::Connection {
            message: e.to_string(),
        },
        other => other,
    }
}

/// Pull the `errors` member out of an error body, if it is JSON
fn errors_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    match parsed.get("errors")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

//! HTTP client module
//!
//! Provides the remote-call collaborator for the extraction engine.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **GraphQL**: Query execution with transport error classification

mod client;
mod graphql;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use graphql::{classify_transport_error, GraphqlClient, RemoteCall, ACCESS_TOKEN_HEADER};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

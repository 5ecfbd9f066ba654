//! Query types
//!
//! The synthesized query text and the variables sent alongside it.

use serde::{Deserialize, Serialize};

/// Variable carrying the page size
pub const PAGE_SIZE_VAR: &str = "first";

/// Variable carrying the pagination cursor
pub const CURSOR_VAR: &str = "after";

/// Variable carrying the search filter
pub const FILTER_VAR: &str = "query";

/// Records requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// A synthesized paginated query for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    entity: String,
    text: String,
}

impl Query {
    pub(crate) fn new(entity: impl Into<String>, text: String) -> Self {
        Self {
            entity: entity.into(),
            text,
        }
    }

    /// Top-level connection the query selects
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// The query document
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Variables for one page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryVariables {
    /// Page size
    pub first: u32,
    /// Cursor to resume after (null on the first page)
    pub after: Option<String>,
    /// Search filter expression
    pub query: Option<String>,
}

impl QueryVariables {
    /// Variables for the first page
    pub fn new(first: u32) -> Self {
        Self {
            first,
            after: None,
            query: None,
        }
    }

    /// Set the search filter
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.query = Some(filter.into());
        self
    }

    /// Filter on a lower bound for `field` (e.g. `updated_at:>=2024-01-01`)
    #[must_use]
    pub fn with_lower_bound(self, field: &str, bound: &str) -> Self {
        self.with_filter(format!("{field}:>={bound}"))
    }

    /// Advance to the page after `cursor`
    pub fn advance(&mut self, cursor: Option<String>) {
        self.after = cursor;
    }
}

impl Default for QueryVariables {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

//! Cursor pagination over a GraphQL connection

use super::types::{PageInfo, PageState, PAGE_INFO_KEY};
use crate::error::{Error, Result};
use crate::http::RemoteCall;
use crate::normalize::{normalize_record, EDGES_KEY, NODE_KEY};
use crate::query::{Query, QueryVariables};
use crate::types::{JsonValue, Record};
use futures::stream::{self, Stream};
use tracing::{debug, error, warn};

/// Drives a query through every page of its top-level connection.
///
/// Each call to [`next_page`](Self::next_page) performs exactly one remote
/// call and yields the normalized records of that page. Retries and rate
/// limiting belong to the [`RemoteCall`] implementation.
pub struct PaginationDriver<'a> {
    remote: &'a dyn RemoteCall,
    query: &'a Query,
    variables: QueryVariables,
    state: PageState,
    pages: u32,
    records: u64,
}

impl<'a> PaginationDriver<'a> {
    /// Create a driver starting from `variables`
    pub fn new(remote: &'a dyn RemoteCall, query: &'a Query, variables: QueryVariables) -> Self {
        Self {
            remote,
            query,
            variables,
            state: PageState::Init,
            pages: 0,
            records: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> PageState {
        self.state
    }

    /// Variables the next request will use
    pub fn variables(&self) -> &QueryVariables {
        &self.variables
    }

    /// Pages fetched so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages
    }

    /// Records yielded so far
    pub fn records_fetched(&self) -> u64 {
        self.records
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once the connection is exhausted. After an error
    /// the driver is terminal and keeps returning `Ok(None)`.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Record>>> {
        if self.state.is_terminal() {
            return Ok(None);
        }

        self.state = PageState::Fetching;
        match self.fetch().await {
            Ok((records, page_info)) => {
                self.pages += 1;
                self.records += records.len() as u64;
                self.state = match page_info.next_cursor() {
                    Some(cursor) => {
                        self.variables.advance(Some(cursor.to_string()));
                        PageState::HasMore
                    }
                    None => {
                        if page_info.has_next_page {
                            warn!(
                                entity = self.query.entity(),
                                "hasNextPage set without an endCursor; stopping"
                            );
                        }
                        PageState::Done
                    }
                };
                Ok(Some(records))
            }
            Err(e) => {
                self.state = PageState::Error;
                Err(e)
            }
        }
    }

    /// Turn the driver into a stream of pages
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<Record>>> + 'a {
        stream::try_unfold(self, |mut driver| async move {
            let page = driver.next_page().await?;
            Ok::<_, Error>(page.map(|page| (page, driver)))
        })
    }

    async fn fetch(&self) -> Result<(Vec<Record>, PageInfo)> {
        let variables = serde_json::to_value(&self.variables)?;
        let response = self.remote.execute(self.query.text(), &variables).await?;
        debug!(entity = self.query.entity(), %response, "Received page");
        parse_page(self.query.entity(), &response)
    }
}

impl std::fmt::Debug for PaginationDriver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationDriver")
            .field("entity", &self.query.entity())
            .field("variables", &self.variables)
            .field("state", &self.state)
            .field("pages", &self.pages)
            .finish_non_exhaustive()
    }
}

/// Split a response into normalized records and page info.
///
/// A response without `data` is malformed; its `errors` payload is logged.
pub fn parse_page(entity: &str, response: &JsonValue) -> Result<(Vec<Record>, PageInfo)> {
    let Some(data) = response.get("data").filter(|d| !d.is_null()) else {
        if let Some(errors) = response.get("errors") {
            error!(entity, %errors, "GraphQL request returned errors");
        }
        return Err(Error::malformed(entity, "response has no data"));
    };

    let connection = data
        .get(entity)
        .filter(|c| c.is_object())
        .ok_or_else(|| Error::malformed(entity, format!("response has no '{entity}' connection")))?;

    let edges = connection
        .get(EDGES_KEY)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| Error::malformed(entity, "connection has no edges"))?;

    let mut records = Vec::with_capacity(edges.len());
    for edge in edges {
        match edge.get(NODE_KEY) {
            Some(node) if !node.is_null() => records.push(normalize_record(node)),
            _ => warn!(entity, "Skipping edge without a node"),
        }
    }

    let page_info = match connection.get(PAGE_INFO_KEY) {
        Some(info) => serde_json::from_value(info.clone())
            .map_err(|e| Error::malformed(entity, format!("invalid pageInfo: {e}")))?,
        None => PageInfo::default(),
    };

    Ok((records, page_info))
}

//! Pagination types
//!
//! Wire shape of a connection's page info and the states a paging loop
//! moves through.

use serde::{Deserialize, Serialize};

/// Key of the page info block inside a connection
pub const PAGE_INFO_KEY: &str = "pageInfo";

/// Page info block returned alongside a connection's edges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page follows this one
    #[serde(default)]
    pub has_next_page: bool,
    /// Cursor of the last edge on this page
    #[serde(default)]
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Cursor for the next request, if there is a next page
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_next_page {
            self.end_cursor.as_deref()
        } else {
            None
        }
    }
}

/// Where a paging loop stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageState {
    /// Nothing requested yet
    #[default]
    Init,
    /// A request is in flight
    Fetching,
    /// The last page reported a successor
    HasMore,
    /// The connection is exhausted
    Done,
    /// A request or response failed; no further pages
    Error,
}

impl PageState {
    /// Whether no further page will be requested
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

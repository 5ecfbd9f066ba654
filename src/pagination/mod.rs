//! Pagination module
//!
//! Walks a GraphQL connection page by page with `first`/`after` cursor
//! variables until `pageInfo.hasNextPage` is false.
//!
//! Only the top-level connection is paged. Nested connections in the same
//! query share the `first`/`after` variables, so each one contributes just
//! its first page per parent node.

mod driver;
mod types;

pub use driver::{parse_page, PaginationDriver};
pub use types::{PageInfo, PageState, PAGE_INFO_KEY};

#[cfg(test)]
mod tests;

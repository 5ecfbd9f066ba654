//! Query synthesis module
//!
//! Builds the paginated GraphQL query for a stream from its schema, once
//! per sync, together with the fixed variable contract (`first`, `after`,
//! `query`).

mod synthesizer;
mod types;

pub use synthesizer::{render_selections, synthesize, synthesize_for_stream, synthesize_node};
pub use types::{
    Query, QueryVariables, CURSOR_VAR, DEFAULT_PAGE_SIZE, FILTER_VAR, PAGE_SIZE_VAR,
};

#[cfg(test)]
mod tests;

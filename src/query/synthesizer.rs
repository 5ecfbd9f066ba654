//! Query synthesis
//!
//! Renders walker selections as a GraphQL document. The top-level entity is
//! a connection paginated with `$first`/`$after` and filtered by `$query`.
//!
//! Nested connections reuse the same `$first`/`$after` variables, so only
//! the first page of a nested collection is fetched for each outer node.
//! Consumers see at most `first` nested items per record.

use super::types::{Query, CURSOR_VAR, FILTER_VAR, PAGE_SIZE_VAR};
use crate::catalog::Catalog;
use crate::error::Result;
use crate::schema::{walk, SchemaNode, Selection};
use serde_json::Value;

/// Synthesize the query for `entity` from its root schema document.
pub fn synthesize(schema: &Value, entity: &str) -> Query {
    synthesize_node(&SchemaNode::from_root(schema), entity)
}

/// Synthesize the query for `entity` from an already-typed schema.
pub fn synthesize_node(schema: &SchemaNode, entity: &str) -> Query {
    let fields = render_selections(&walk(schema));
    let text = format!(
        "query(${PAGE_SIZE_VAR}: Int!, ${CURSOR_VAR}: String, ${FILTER_VAR}: String) {{\n  \
         {entity}({PAGE_SIZE_VAR}: ${PAGE_SIZE_VAR}, {CURSOR_VAR}: ${CURSOR_VAR}, {FILTER_VAR}: ${FILTER_VAR}) {{\n    \
         edges {{\n      node {{\n        {fields}\n      }}\n    }}\n    \
         pageInfo {{\n      hasNextPage\n      endCursor\n    }}\n  }}\n}}\n"
    );
    Query::new(entity, text)
}

/// Synthesize the query for a catalog stream.
///
/// Fails with `SchemaNotFound` when the catalog has no entry for `entity`.
pub fn synthesize_for_stream(catalog: &Catalog, entity: &str) -> Result<Query> {
    let schema = catalog.schema_for(entity)?;
    Ok(synthesize(schema, entity))
}

/// Render a selection list as space-separated GraphQL fields
pub fn render_selections(selections: &[Selection]) -> String {
    selections
        .iter()
        .map(render_selection)
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_selection(selection: &Selection) -> String {
    match selection {
        Selection::Leaf(name) => name.clone(),
        Selection::Nested { name, children } => {
            format!("{name} {{ {} }}", render_selections(children))
        }
        Selection::Connection { name, children } => format!(
            "{name}({PAGE_SIZE_VAR}: ${PAGE_SIZE_VAR}, {CURSOR_VAR}: ${CURSOR_VAR}) {{ \
             edges {{ node {{ {} }} }} pageInfo {{ hasNextPage endCursor }} }}",
            render_selections(children)
        ),
    }
}

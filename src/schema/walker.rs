//! Schema walker
//!
//! Turns a [`SchemaNode`] tree into the list of selections the query
//! synthesizer renders, one level at a time. Synthetic fields are dropped
//! here so they never reach the remote API.

use super::types::{Field, SchemaNode};

/// What to select for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Plain field, selected by name
    Leaf(String),
    /// Nested object with its own selection set
    Nested {
        /// Field name
        name: String,
        /// Child selections
        children: Vec<Selection>,
    },
    /// Nested collection, selected through the edges/node envelope
    Connection {
        /// Field name
        name: String,
        /// Selections inside each node
        children: Vec<Selection>,
    },
}

impl Selection {
    /// Field name of this selection
    pub fn name(&self) -> &str {
        match self {
            Selection::Leaf(name)
            | Selection::Nested { name, .. }
            | Selection::Connection { name, .. } => name,
        }
    }
}

/// Walk a node and return the selections for its fields.
///
/// Objects yield one selection per non-synthetic field, arrays yield the
/// selections of their items, scalars yield nothing. A field whose declared
/// children are all synthetic has nothing to select and is omitted.
pub fn walk(node: &SchemaNode) -> Vec<Selection> {
    match node {
        SchemaNode::Scalar => Vec::new(),
        SchemaNode::Object(fields) => fields
            .iter()
            .filter(|f| !f.is_synthetic())
            .filter_map(select)
            .collect(),
        SchemaNode::Array(items) => walk(items),
    }
}

fn select(field: &Field) -> Option<Selection> {
    let name = field.name.clone();
    match &field.node {
        SchemaNode::Scalar => Some(Selection::Leaf(name)),
        SchemaNode::Object(_) => {
            let children = walk(&field.node);
            if !children.is_empty() {
                Some(Selection::Nested { name, children })
            } else if declares_fields(&field.node) {
                None
            } else {
                // No declared properties: an opaque JSON scalar
                Some(Selection::Leaf(name))
            }
        }
        SchemaNode::Array(items) => {
            let children = walk(items);
            if !children.is_empty() {
                Some(Selection::Connection { name, children })
            } else if declares_fields(items) {
                None
            } else {
                // Lists of scalars are plain list fields, not connections
                Some(Selection::Leaf(name))
            }
        }
    }
}

/// Whether the node, or the items it wraps, declares any properties
fn declares_fields(node: &SchemaNode) -> bool {
    match node {
        SchemaNode::Scalar => false,
        SchemaNode::Object(fields) => !fields.is_empty(),
        SchemaNode::Array(items) => declares_fields(items),
    }
}

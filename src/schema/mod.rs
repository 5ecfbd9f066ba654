//! Schema module
//!
//! Typed schema trees and the walk that decides what to request.
//!
//! # Features
//!
//! - **Classification**: scalar / object / array per property, tolerant of
//!   nullable and unknown types
//! - **Walking**: selections per nesting level, synthetic fields excluded
//! - **References**: `$ref` inlining against shared definition documents
//! - **Synthetic Keys**: shop fields declared on every stream schema

mod resolve;
mod synthetic;
mod types;
mod walker;

pub use resolve::{resolve_refs, SchemaRefs};
pub use synthetic::{add_synthetic_keys, synthetic_field_name, SHOP_KEYS};
pub use types::{Field, FieldKind, SchemaNode, SYNTHETIC_PREFIX};
pub use walker::{walk, Selection};

//! Schema types
//!
//! A typed view over the JSON-Schema documents the tap is configured with.
//! Classification is total: anything that is not clearly an object or an
//! array is a scalar.

use serde_json::Value;

/// Prefix reserved for fields injected by the tap itself
pub const SYNTHETIC_PREFIX: &str = "_sdc_";

/// Structural classification of a schema property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Leaf value, selected verbatim
    Scalar,
    /// Nested mapping with its own properties
    Object,
    /// Collection of items
    Array,
}

impl FieldKind {
    /// Classify a property definition by its `type` keyword.
    ///
    /// `type` may be a string or a list (`["null", "array"]`). Array wins
    /// over object; a missing or unrecognized type is a scalar.
    pub fn of(definition: &Value) -> Self {
        let has = |name: &str| match definition.get("type") {
            Some(Value::String(t)) => t == name,
            Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(name)),
            _ => false,
        };

        if has("array") {
            FieldKind::Array
        } else if has("object") {
            FieldKind::Object
        } else {
            FieldKind::Scalar
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Scalar => write!(f, "scalar"),
            FieldKind::Object => write!(f, "object"),
            FieldKind::Array => write!(f, "array"),
        }
    }
}

/// A named property inside an object node
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Property name as the API spells it
    pub name: String,
    /// The property's own schema
    pub node: SchemaNode,
}

impl Field {
    /// Whether this field is injected by the tap rather than fetched
    pub fn is_synthetic(&self) -> bool {
        self.name.starts_with(SYNTHETIC_PREFIX)
    }
}

/// Typed schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Leaf value
    Scalar,
    /// Mapping of named fields, in declaration order
    Object(Vec<Field>),
    /// Collection whose items share one schema
    Array(Box<SchemaNode>),
}

impl SchemaNode {
    /// Build the tree for a property definition.
    pub fn from_json(definition: &Value) -> Self {
        match FieldKind::of(definition) {
            FieldKind::Scalar => SchemaNode::Scalar,
            FieldKind::Object => SchemaNode::Object(fields_of(definition)),
            FieldKind::Array => {
                let items = definition
                    .get("items")
                    .map_or(SchemaNode::Scalar, SchemaNode::from_json);
                SchemaNode::Array(Box::new(items))
            }
        }
    }

    /// Build the tree for a stream's root schema.
    ///
    /// Root documents frequently omit `"type": "object"`, so the root is
    /// always read as an object over its `properties`.
    pub fn from_root(schema: &Value) -> Self {
        SchemaNode::Object(fields_of(schema))
    }

    /// Structural kind of this node
    pub fn kind(&self) -> FieldKind {
        match self {
            SchemaNode::Scalar => FieldKind::Scalar,
            SchemaNode::Object(_) => FieldKind::Object,
            SchemaNode::Array(_) => FieldKind::Array,
        }
    }

    /// Fields of an object node (empty for other kinds)
    pub fn fields(&self) -> &[Field] {
        match self {
            SchemaNode::Object(fields) => fields,
            _ => &[],
        }
    }

    /// Look up a direct child field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().iter().find(|f| f.name == name)
    }
}

fn fields_of(definition: &Value) -> Vec<Field> {
    definition
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, def)| Field {
                    name: name.clone(),
                    node: SchemaNode::from_json(def),
                })
                .collect()
        })
        .unwrap_or_default()
}

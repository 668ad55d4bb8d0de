//! Typed view of a resolved JSON Schema node
//!
//! The raw `serde_json::Value` is parsed once into this closed model so the
//! flattener only deals with a fixed set of facets: properties, items,
//! combinators, conditionals and leaf attributes. Shape errors surface here,
//! before any traversal happens.

use serde_json::{Map, Value};

use super::descriptor::FieldType;
use crate::error::{MappingError, MappingResult};

/// Combinator keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinatorKind {
    AllOf,
    AnyOf,
    OneOf,
}

impl CombinatorKind {
    const ALL: [CombinatorKind; 3] = [
        CombinatorKind::AllOf,
        CombinatorKind::AnyOf,
        CombinatorKind::OneOf,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            CombinatorKind::AllOf => "allOf",
            CombinatorKind::AnyOf => "anyOf",
            CombinatorKind::OneOf => "oneOf",
        }
    }
}

/// A combinator and its branches
#[derive(Debug, Clone)]
pub struct Combinator {
    pub kind: CombinatorKind,
    pub branches: Vec<SchemaNode>,
}

/// Leaf attributes of a node
#[derive(Debug, Clone, Default)]
pub struct LeafInfo {
    /// Whether the node declares a `type` keyword at all
    pub has_type: bool,
    /// Scalar type, if any
    pub field_type: Option<FieldType>,
    /// Whether `type` is (or includes) `array`
    pub is_array_typed: bool,
    pub format: Option<String>,
    pub enum_values: Option<Vec<Value>>,
}

/// A parsed schema node
#[derive(Debug, Clone, Default)]
pub struct SchemaNode {
    /// Object members, in schema order
    pub properties: Option<Vec<(String, SchemaNode)>>,
    /// Array element schemas; one entry for `items: {}`, several for tuples
    pub items: Option<Vec<SchemaNode>>,
    pub combinators: Vec<Combinator>,
    /// `if`/`then`/`else` sub-schemas that are present
    pub conditionals: Vec<SchemaNode>,
    pub leaf: LeafInfo,
}

impl SchemaNode {
    /// Parse a resolved schema
    pub fn parse(value: &Value, max_depth: usize) -> MappingResult<Self> {
        Self::parse_at(value, "", 0, max_depth)
    }

    fn parse_at(value: &Value, path: &str, depth: usize, max_depth: usize) -> MappingResult<Self> {
        if depth > max_depth {
            return Err(MappingError::MaxDepthExceeded {
                path: path.to_string(),
                depth,
                max: max_depth,
            });
        }

        let obj = match value {
            Value::Object(obj) => obj,
            // `true` / `false` schemas carry no structure
            Value::Bool(_) => return Ok(Self::default()),
            other => {
                return Err(MappingError::invalid_schema(
                    path,
                    format!("expected schema object, found {}", value_kind(other)),
                ));
            }
        };

        let mut node = SchemaNode {
            leaf: parse_leaf(obj),
            ..Self::default()
        };

        if let Some(props) = obj.get("properties") {
            let props = props.as_object().ok_or_else(|| {
                MappingError::invalid_schema(path, "'properties' must be an object")
            })?;
            let mut members = Vec::with_capacity(props.len());
            for (name, member) in props {
                let member_path = join_path(path, name);
                members.push((
                    name.clone(),
                    Self::parse_at(member, &member_path, depth + 1, max_depth)?,
                ));
            }
            node.properties = Some(members);
        }

        if let Some(items) = obj.get("items") {
            let elements = match items {
                Value::Array(tuple) => tuple
                    .iter()
                    .map(|item| Self::parse_at(item, path, depth + 1, max_depth))
                    .collect::<MappingResult<Vec<_>>>()?,
                single => vec![Self::parse_at(single, path, depth + 1, max_depth)?],
            };
            node.items = Some(elements);
        }

        for kind in CombinatorKind::ALL {
            let Some(branches) = obj.get(kind.keyword()) else {
                continue;
            };
            let branches = branches.as_array().ok_or_else(|| {
                MappingError::invalid_schema(path, format!("'{}' must be an array", kind.keyword()))
            })?;
            let branches = branches
                .iter()
                .map(|branch| Self::parse_at(branch, path, depth + 1, max_depth))
                .collect::<MappingResult<Vec<_>>>()?;
            node.combinators.push(Combinator { kind, branches });
        }

        for keyword in ["if", "then", "else"] {
            if let Some(sub) = obj.get(keyword) {
                node.conditionals
                    .push(Self::parse_at(sub, path, depth + 1, max_depth)?);
            }
        }

        Ok(node)
    }

    /// Whether the node has any facet the flattener descends into
    pub fn is_structural(&self) -> bool {
        self.properties.is_some()
            || self.items.is_some()
            || !self.combinators.is_empty()
            || !self.conditionals.is_empty()
    }
}

fn parse_leaf(obj: &Map<String, Value>) -> LeafInfo {
    let type_value = obj.get("type");
    let is_array_typed = match type_value {
        Some(Value::String(t)) => t == "array",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("array")),
        _ => false,
    };

    LeafInfo {
        has_type: type_value.is_some(),
        field_type: type_value.and_then(FieldType::from_schema),
        is_array_typed,
        format: obj.get("format").and_then(|f| f.as_str()).map(String::from),
        enum_values: obj.get("enum").and_then(|e| e.as_array()).cloned(),
    }
}

pub(crate) fn join_path(parent: &str, member: &str) -> String {
    if parent.is_empty() {
        member.to_string()
    } else {
        format!("{}.{}", parent, member)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

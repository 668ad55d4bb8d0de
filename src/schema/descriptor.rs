//! Flattened field descriptors

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scalar JSON Schema type of a leaf field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
}

impl FieldType {
    /// Parse a JSON Schema `type` keyword value
    ///
    /// Union types (`["string", "null"]`) resolve to their first scalar
    /// member. `object`, `array` and `null` have no scalar type.
    pub fn from_schema(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::from_name(s),
            Value::Array(types) => types
                .iter()
                .filter_map(|t| t.as_str())
                .find_map(Self::from_name),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(FieldType::String),
            "number" => Some(FieldType::Number),
            "integer" => Some(FieldType::Integer),
            "boolean" => Some(FieldType::Boolean),
            _ => None,
        }
    }

    /// Get the JSON Schema type name
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership of a field in one branch of a `oneOf` construct
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneOfMembership {
    /// `<parent path or "root">#oneOf`
    pub group_id: String,
    /// Index of the branch within the `oneOf` array
    pub branch_index: usize,
}

impl OneOfMembership {
    pub fn new(group_id: impl Into<String>, branch_index: usize) -> Self {
        Self {
            group_id: group_id.into(),
            branch_index,
        }
    }
}

/// One addressable leaf location in a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Dot-separated path, unique within a descriptor collection
    pub path: String,
    /// Whether this field or one of its ancestors is multivalued
    pub is_array: bool,
    /// Scalar type, if the schema declares one
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// Semantic format tag (date-time, email, uri, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Allowed literal values, in schema order
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// `oneOf` branches this field belongs to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_of_memberships: Vec<OneOfMembership>,
    /// Path of the outermost array this field was reached through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_root: Option<String>,
}

impl FieldDescriptor {
    /// Create a new scalar field descriptor
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_array: false,
            field_type: None,
            format: None,
            enum_values: None,
            one_of_memberships: Vec::new(),
            array_root: None,
        }
    }

    /// Mark the field as multivalued, rooted at `root`
    pub fn with_array_root(mut self, root: impl Into<String>) -> Self {
        self.is_array = true;
        self.array_root = Some(root.into());
        self
    }

    /// Set the scalar type
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Set the format tag
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Add a `oneOf` membership
    pub fn with_membership(mut self, group_id: impl Into<String>, branch_index: usize) -> Self {
        self.add_membership(OneOfMembership::new(group_id, branch_index));
        self
    }

    /// Add a membership unless it is already present
    pub fn add_membership(&mut self, membership: OneOfMembership) {
        if !self.one_of_memberships.contains(&membership) {
            self.one_of_memberships.push(membership);
        }
    }

    /// Last dot segment of the path
    pub fn leaf(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    /// Path below the array root, empty for arrays of primitives
    pub fn path_within_array(&self) -> &str {
        self.path
            .strip_prefix(self.index_root())
            .map(|rest| rest.trim_start_matches('.'))
            .unwrap_or(&self.path)
    }

    /// Array root used for index resolution
    ///
    /// Falls back to the first path segment for descriptors built without
    /// an explicit root.
    pub fn index_root(&self) -> &str {
        match &self.array_root {
            Some(root) => root,
            None => self.path.split('.').next().unwrap_or(&self.path),
        }
    }

    /// Merge a descriptor for the same path reached through another branch
    ///
    /// Later type/format/enum values win when present; memberships
    /// accumulate.
    pub fn merge(&mut self, other: FieldDescriptor) {
        debug_assert_eq!(self.path, other.path);
        self.is_array |= other.is_array;
        if other.field_type.is_some() {
            self.field_type = other.field_type;
        }
        if other.format.is_some() {
            self.format = other.format;
        }
        if other.enum_values.is_some() {
            self.enum_values = other.enum_values;
        }
        if self.array_root.is_none() {
            self.array_root = other.array_root;
        }
        for membership in other.one_of_memberships {
            self.add_membership(membership);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_from_schema() {
        assert_eq!(
            FieldType::from_schema(&json!("integer")),
            Some(FieldType::Integer)
        );
        assert_eq!(
            FieldType::from_schema(&json!(["null", "string"])),
            Some(FieldType::String)
        );
        assert_eq!(FieldType::from_schema(&json!("object")), None);
        assert_eq!(FieldType::from_schema(&json!(42)), None);
    }

    #[test]
    fn test_merge_keeps_known_type_and_unions_memberships() {
        let mut a = FieldDescriptor::new("x")
            .with_type(FieldType::String)
            .with_membership("root#oneOf", 0);
        let b = FieldDescriptor::new("x")
            .with_format("email")
            .with_membership("root#oneOf", 0)
            .with_membership("root#oneOf", 1);

        a.merge(b);

        assert_eq!(a.field_type, Some(FieldType::String));
        assert_eq!(a.format.as_deref(), Some("email"));
        assert_eq!(a.one_of_memberships.len(), 2);
    }

    #[test]
    fn test_path_within_array() {
        let field = FieldDescriptor::new("product.parts.name").with_array_root("product.parts");
        assert_eq!(field.path_within_array(), "name");
        assert_eq!(field.index_root(), "product.parts");

        let tags = FieldDescriptor::new("tags").with_array_root("tags");
        assert_eq!(tags.path_within_array(), "");

        let mut legacy = FieldDescriptor::new("docs.title");
        legacy.is_array = true;
        assert_eq!(legacy.index_root(), "docs");
        assert_eq!(legacy.path_within_array(), "title");
    }

    #[test]
    fn test_serialization_uses_schema_keywords() {
        let field = FieldDescriptor::new("status").with_type(FieldType::String);
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value, json!({"path": "status", "isArray": false, "type": "string"}));
    }
}

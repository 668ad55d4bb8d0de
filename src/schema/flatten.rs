//! Schema flattening into leaf field descriptors

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use super::descriptor::{FieldDescriptor, OneOfMembership};
use super::node::{Combinator, CombinatorKind, SchemaNode, join_path};
use crate::error::MappingResult;

/// Configuration for schema flattening
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Maximum nesting depth of schema nodes
    pub max_depth: usize,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

impl FlattenConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Flattens resolved JSON Schemas into field descriptors
#[derive(Debug, Clone, Default)]
pub struct SchemaFlattener {
    config: FlattenConfig,
}

impl SchemaFlattener {
    /// Create a flattener with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flattener with custom config
    pub fn with_config(config: FlattenConfig) -> Self {
        Self { config }
    }

    /// Flatten a `$ref`-resolved schema
    ///
    /// The result is deduplicated by path and sorted lexicographically, so
    /// flattening the same schema twice yields identical lists.
    pub fn flatten(&self, schema: &Value) -> MappingResult<Vec<FieldDescriptor>> {
        let node = SchemaNode::parse(schema, self.config.max_depth)?;
        let descriptors = dedup(flatten_node(&node, &Scope::root()));
        debug!(fields = descriptors.len(), "Flattened schema");
        Ok(descriptors)
    }
}

/// Position of a node within the document being described
#[derive(Debug, Clone)]
struct Scope {
    parent: String,
    in_array: bool,
    array_root: Option<String>,
}

impl Scope {
    fn root() -> Self {
        Self {
            parent: String::new(),
            in_array: false,
            array_root: None,
        }
    }

    fn member(&self, name: &str) -> Self {
        Self {
            parent: join_path(&self.parent, name),
            in_array: self.in_array,
            array_root: self.array_root.clone(),
        }
    }

    /// Scope of an array's items
    ///
    /// Items of a root-level array describe the row itself, so they stay
    /// single-valued.
    fn element(&self) -> Self {
        if self.parent.is_empty() {
            return self.clone();
        }
        Self {
            parent: self.parent.clone(),
            in_array: true,
            array_root: Some(
                self.array_root
                    .clone()
                    .unwrap_or_else(|| self.parent.clone()),
            ),
        }
    }

    /// Descriptor at this scope's path for a node that ends here
    fn leaf_descriptor(&self, node: &SchemaNode) -> FieldDescriptor {
        let mut field = FieldDescriptor::new(self.parent.clone());
        field.is_array = self.in_array || node.leaf.is_array_typed;
        field.array_root = match &self.array_root {
            Some(root) => Some(root.clone()),
            None if node.leaf.is_array_typed => Some(self.parent.clone()),
            None => None,
        };
        field.field_type = node.leaf.field_type;
        field.format = node.leaf.format.clone();
        field.enum_values = node.leaf.enum_values.clone();
        field
    }
}

fn flatten_node(node: &SchemaNode, scope: &Scope) -> Vec<FieldDescriptor> {
    let mut out = Vec::new();

    if let Some(properties) = &node.properties {
        out.extend(flatten_properties(properties, scope));
    }
    if let Some(items) = &node.items {
        out.extend(flatten_items(node, items, scope));
    }
    for combinator in &node.combinators {
        out.extend(flatten_combinator(combinator, scope));
    }
    if !node.conditionals.is_empty() {
        out.extend(flatten_conditionals(&node.conditionals, scope));
    }
    if !node.is_structural() {
        out.extend(flatten_leaf(node, scope));
    }

    out
}

fn flatten_properties(properties: &[(String, SchemaNode)], scope: &Scope) -> Vec<FieldDescriptor> {
    let mut out = Vec::new();
    for (name, member) in properties {
        let member_scope = scope.member(name);
        let nested = flatten_node(member, &member_scope);
        if nested.is_empty() {
            out.push(member_scope.leaf_descriptor(member));
        } else {
            out.extend(nested);
        }
    }
    out
}

fn flatten_items(array: &SchemaNode, items: &[SchemaNode], scope: &Scope) -> Vec<FieldDescriptor> {
    let element_scope = scope.element();
    let nested: Vec<FieldDescriptor> = items
        .iter()
        .flat_map(|item| flatten_node(item, &element_scope))
        .collect();

    if !nested.is_empty() || scope.parent.is_empty() {
        return nested;
    }

    // Array of primitives: the array itself is the leaf
    let mut field = element_scope.leaf_descriptor(array);
    if let Some(item) = items.first() {
        field.field_type = item.leaf.field_type;
        field.format = item.leaf.format.clone();
        field.enum_values = item.leaf.enum_values.clone();
    }
    vec![field]
}

fn flatten_combinator(combinator: &Combinator, scope: &Scope) -> Vec<FieldDescriptor> {
    let group_id = if scope.parent.is_empty() {
        "root#oneOf".to_string()
    } else {
        format!("{}#oneOf", scope.parent)
    };

    let mut out = Vec::new();
    for (index, branch) in combinator.branches.iter().enumerate() {
        let mut nested = flatten_node(branch, scope);
        // allOf/anyOf branches are merged structurally, only oneOf is exclusive
        if combinator.kind == CombinatorKind::OneOf {
            for field in &mut nested {
                field.add_membership(OneOfMembership::new(group_id.clone(), index));
            }
            trace!(
                group = %group_id,
                branch = index,
                fields = nested.len(),
                "Tagged oneOf branch"
            );
        }
        out.extend(nested);
    }
    out
}

fn flatten_conditionals(branches: &[SchemaNode], scope: &Scope) -> Vec<FieldDescriptor> {
    branches
        .iter()
        .flat_map(|branch| flatten_node(branch, scope))
        .collect()
}

fn flatten_leaf(node: &SchemaNode, scope: &Scope) -> Option<FieldDescriptor> {
    if scope.parent.is_empty() {
        return None;
    }
    if !node.leaf.has_type && node.leaf.enum_values.is_none() {
        return None;
    }
    Some(scope.leaf_descriptor(node))
}

fn dedup(fields: Vec<FieldDescriptor>) -> Vec<FieldDescriptor> {
    let mut by_path: BTreeMap<String, FieldDescriptor> = BTreeMap::new();
    for field in fields {
        match by_path.get_mut(&field.path) {
            Some(existing) => existing.merge(field),
            None => {
                by_path.insert(field.path.clone(), field);
            }
        }
    }
    by_path.into_values().collect()
}

/// Flatten a schema with default configuration
pub fn flatten(schema: &Value) -> MappingResult<Vec<FieldDescriptor>> {
    SchemaFlattener::new().flatten(schema)
}

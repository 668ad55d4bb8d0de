//! `oneOf` exclusivity conflict detection
//!
//! A `oneOf` construct requires exactly one branch to be populated. When a
//! mapping sends columns into fields from different branches of the same
//! group (within the same array item), the generated documents cannot be
//! valid. Detection is advisory: callers decide whether to block or warn.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::mapping::HeaderMapping;
use crate::path::{array_scope, canonical_path};
use crate::schema::FieldDescriptor;

/// Mapped paths that populate mutually exclusive `oneOf` branches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictGroup {
    /// `oneOf` group the paths belong to
    pub group_id: String,
    /// Array item the conflict is confined to, empty outside arrays
    pub scope: String,
    /// Every mapped path in the group, sorted
    pub paths: Vec<String>,
    /// Paths by the branch that contributed them
    pub branches: BTreeMap<usize, Vec<String>>,
}

impl ConflictGroup {
    /// Key identifying the group within a document
    pub fn scope_key(&self) -> String {
        format!("{}{}", self.scope, self.group_id)
    }
}

/// Detects `oneOf` violations in finished mappings
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictValidator;

impl ConflictValidator {
    pub fn new() -> Self {
        Self
    }

    /// Report every exclusivity violation in `mapping`
    ///
    /// Paths are bucketed by array scope and group id. A bucket conflicts
    /// when no single branch covers all of its paths; paths from the same
    /// branch never conflict with each other.
    pub fn validate(&self, mapping: &HeaderMapping, fields: &[FieldDescriptor]) -> Vec<ConflictGroup> {
        let by_path: HashMap<&str, &FieldDescriptor> =
            fields.iter().map(|f| (f.path.as_str(), f)).collect();

        // (scope, group) -> path -> branches the path belongs to
        let mut buckets: BTreeMap<(String, String), BTreeMap<String, BTreeSet<usize>>> =
            BTreeMap::new();

        for path in mapping.paths() {
            let Some(field) = by_path.get(canonical_path(path).as_str()) else {
                continue;
            };
            for membership in &field.one_of_memberships {
                buckets
                    .entry((array_scope(path).to_string(), membership.group_id.clone()))
                    .or_default()
                    .entry(path.to_string())
                    .or_default()
                    .insert(membership.branch_index);
            }
        }

        let mut conflicts = Vec::new();
        for ((scope, group_id), paths) in buckets {
            if paths.len() < 2 || shares_a_branch(&paths) {
                continue;
            }

            let mut branches: BTreeMap<usize, Vec<String>> = BTreeMap::new();
            for (path, indices) in &paths {
                for index in indices {
                    branches.entry(*index).or_default().push(path.clone());
                }
            }

            warn!(
                group = %group_id,
                scope = %scope,
                paths = ?paths.keys().collect::<Vec<_>>(),
                "Mapping populates exclusive oneOf branches"
            );
            conflicts.push(ConflictGroup {
                group_id,
                scope,
                paths: paths.into_keys().collect(),
                branches,
            });
        }

        debug!(conflicts = conflicts.len(), "Validated oneOf exclusivity");
        conflicts
    }
}

fn shares_a_branch(paths: &BTreeMap<String, BTreeSet<usize>>) -> bool {
    let mut sets = paths.values();
    let Some(first) = sets.next() else {
        return true;
    };
    let mut common = first.clone();
    for set in sets {
        common = common.intersection(set).copied().collect();
        if common.is_empty() {
            return false;
        }
    }
    !common.is_empty()
}

/// Report `oneOf` conflicts with the default validator
pub fn find_conflicts(mapping: &HeaderMapping, fields: &[FieldDescriptor]) -> Vec<ConflictGroup> {
    ConflictValidator::new().validate(mapping, fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id"),
            FieldDescriptor::new("optionA").with_membership("root#oneOf", 0),
            FieldDescriptor::new("optionA2").with_membership("root#oneOf", 0),
            FieldDescriptor::new("optionB").with_membership("root#oneOf", 1),
        ]
    }

    #[test]
    fn test_conflict_between_branches() {
        let mapping = HeaderMapping::new()
            .with("A", "optionA")
            .with("B", "optionB")
            .with("ID", "id");

        let conflicts = find_conflicts(&mapping, &option_fields());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].paths, vec!["optionA", "optionB"]);
        assert_eq!(conflicts[0].group_id, "root#oneOf");
        assert_eq!(conflicts[0].scope, "");
        assert_eq!(conflicts[0].branches[&0], vec!["optionA"]);
        assert_eq!(conflicts[0].branches[&1], vec!["optionB"]);
    }

    #[test]
    fn test_single_branch_is_fine() {
        let mapping = HeaderMapping::new().with("A", "optionA").with("A2", "optionA2");
        assert!(find_conflicts(&mapping, &option_fields()).is_empty());

        let mapping = HeaderMapping::new().with("A", "optionA");
        assert!(find_conflicts(&mapping, &option_fields()).is_empty());
    }

    #[test]
    fn test_bucket_lists_every_path() {
        let mapping = HeaderMapping::new()
            .with("A", "optionA")
            .with("A2", "optionA2")
            .with("B", "optionB");

        let conflicts = find_conflicts(&mapping, &option_fields());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].paths, vec!["optionA", "optionA2", "optionB"]);
        assert_eq!(conflicts[0].branches[&0].len(), 2);
    }

    #[test]
    fn test_conflicts_are_scoped_to_array_items() {
        let fields = vec![
            FieldDescriptor::new("items.a")
                .with_array_root("items")
                .with_membership("items#oneOf", 0),
            FieldDescriptor::new("items.b")
                .with_array_root("items")
                .with_membership("items#oneOf", 1),
        ];

        let separate = HeaderMapping::new()
            .with("A 1", "items[0].a")
            .with("B 2", "items[1].b");
        assert!(find_conflicts(&separate, &fields).is_empty());

        let same = HeaderMapping::new()
            .with("A 1", "items[0].a")
            .with("B 1", "items[0].b");
        let conflicts = find_conflicts(&same, &fields);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].scope, "items[0]");
        assert_eq!(conflicts[0].scope_key(), "items[0]items#oneOf");
    }

    #[test]
    fn test_field_in_several_branches_does_not_conflict_with_itself() {
        let fields = vec![
            FieldDescriptor::new("shared")
                .with_membership("root#oneOf", 0)
                .with_membership("root#oneOf", 1),
            FieldDescriptor::new("onlyB").with_membership("root#oneOf", 1),
        ];

        let mapping = HeaderMapping::new().with("S", "shared").with("B", "onlyB");
        assert!(find_conflicts(&mapping, &fields).is_empty());
    }

    #[test]
    fn test_unknown_paths_are_ignored() {
        let mapping = HeaderMapping::new().with("X", "notInSchema");
        assert!(find_conflicts(&mapping, &option_fields()).is_empty());
    }
}

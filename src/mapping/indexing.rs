//! Array-index resolution for headers assigned to multivalued fields
//!
//! Headers bound to array fields are grouped by array root. Headers that
//! carry a number (`Doc 2 Title`) are indexed by that number, read as an
//! external 1-based item id. The remaining headers fill successive items,
//! starting a new item whenever a property repeats.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::trace;

use super::text::first_number;
use crate::schema::FieldDescriptor;

/// Rewrite descriptor paths of array-bound headers into indexed paths
///
/// Non-array assignments pass through unchanged. Returns `(header, path)`
/// pairs in input order.
pub fn resolve_array_indices(assignments: &[(&str, &FieldDescriptor)]) -> Vec<(String, String)> {
    let mut resolved: BTreeMap<&str, String> = BTreeMap::new();
    let mut groups: BTreeMap<&str, Vec<(&str, &FieldDescriptor)>> = BTreeMap::new();

    for &(header, field) in assignments {
        if field.is_array {
            groups
                .entry(field.index_root())
                .or_default()
                .push((header, field));
        } else {
            resolved.insert(header, field.path.clone());
        }
    }

    for (root, members) in groups {
        resolve_group(root, &members, &mut resolved);
    }

    assignments
        .iter()
        .filter_map(|(header, _)| {
            resolved
                .get(header)
                .map(|path| (header.to_string(), path.clone()))
        })
        .collect()
}

fn resolve_group<'a>(
    root: &str,
    members: &[(&'a str, &FieldDescriptor)],
    resolved: &mut BTreeMap<&'a str, String>,
) {
    let (numbered, mut unnumbered): (Vec<_>, Vec<_>) = members
        .iter()
        .map(|&(header, field)| (header, field, first_number(header)))
        .partition(|(_, _, id)| id.is_some());

    let ids: BTreeSet<u64> = numbered.iter().filter_map(|(_, _, id)| *id).collect();
    let index_of: BTreeMap<u64, usize> = ids
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index))
        .collect();

    for (header, field, id) in numbered {
        let index = id.and_then(|id| index_of.get(&id).copied()).unwrap_or(0);
        resolved.insert(header, indexed_path(root, field, index));
    }

    // Unnumbered headers continue after the numbered items
    unnumbered.sort_by(|a, b| a.0.cmp(b.0));
    let mut index = ids.len();
    let mut used: HashSet<&str> = HashSet::new();
    for (header, field, _) in unnumbered {
        let property = field.path_within_array();
        if used.contains(property) {
            index += 1;
            used.clear();
        }
        used.insert(property);
        resolved.insert(header, indexed_path(root, field, index));
    }

    trace!(root, items = index_of.len(), "Resolved array indices");
}

fn indexed_path(root: &str, field: &FieldDescriptor, index: usize) -> String {
    let rest = field.path.strip_prefix(root).unwrap_or("");
    format!("{}[{}]{}", root, index, rest)
}

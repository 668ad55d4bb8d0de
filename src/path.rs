//! Concrete field path handling
//!
//! Mapped paths address document locations and may carry array indices,
//! written either in brackets (`refDocs[1].title`) or as bare digit
//! segments (`refDocs.1.title`).

use std::fmt;

use crate::error::{MappingError, MappingResult};

/// One step of a concrete path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Parse a concrete path into segments
///
/// Only trailing `[digits]` groups are indices. Any other brackets belong
/// to the property name, so `size[cm]` is a single key.
pub fn parse_path(path: &str) -> MappingResult<Vec<PathSegment>> {
    let invalid = |reason: &str| MappingError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if path.is_empty() {
        return Err(invalid("path is empty"));
    }

    let mut segments = Vec::new();
    for part in path.split('.') {
        if part.is_empty() {
            return Err(invalid("empty segment"));
        }
        if is_index(part) {
            segments.push(PathSegment::Index(parse_index(part, path)?));
            continue;
        }

        let (key, indices) = split_indices(part);
        if !key.is_empty() {
            segments.push(PathSegment::Key(key.to_string()));
        }
        for digits in indices {
            segments.push(PathSegment::Index(parse_index(digits, path)?));
        }
    }

    Ok(segments)
}

/// Path with every array index removed, as used by field descriptors
pub fn canonical_path(path: &str) -> String {
    path.split('.')
        .filter(|part| !is_index(part))
        .map(|part| split_indices(part).0)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Prefix of `path` up to and including its last array index
///
/// Empty when the path has no index. Two paths with the same scope refer
/// to the same array item.
pub fn array_scope(path: &str) -> &str {
    let mut end = 0;
    let mut offset = 0;
    for part in path.split('.') {
        if is_index(part) || !split_indices(part).1.is_empty() {
            end = offset + part.len();
        }
        offset += part.len() + 1;
    }
    &path[..end]
}

/// Split a dot-separated part into its key and trailing index digits
///
/// `grid[0][2]` yields `("grid", ["0", "2"])`. Brackets that do not hold
/// digits, or that are followed by other text, stay in the key.
fn split_indices(part: &str) -> (&str, Vec<&str>) {
    let mut key = part;
    let mut indices = Vec::new();
    while let Some(inner) = key.strip_suffix(']')
        && let Some(open) = inner.rfind('[')
        && is_index(&inner[open + 1..])
    {
        indices.push(&inner[open + 1..]);
        key = &inner[..open];
    }
    indices.reverse();
    (key, indices)
}

fn is_index(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

fn parse_index(digits: &str, path: &str) -> MappingResult<usize> {
    digits.parse().map_err(|_| MappingError::InvalidPath {
        path: path.to_string(),
        reason: format!("array index '{}' is out of range", digits),
    })
}

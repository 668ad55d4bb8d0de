//! Types for header mapping results

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Heuristic tier that produced a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Normalized header equals the normalized full path
    Exact,
    /// Header is a configured alias of the path
    Synonym,
    /// Normalized header equals the normalized last segment
    Leaf,
    /// Small edit distance to the leaf or full path
    Fuzzy,
    /// Acronym of one side matches the other
    Acronym,
    /// Word overlap between header and path
    TokenSet,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchTier::Exact => write!(f, "exact"),
            MatchTier::Synonym => write!(f, "synonym"),
            MatchTier::Leaf => write!(f, "leaf"),
            MatchTier::Fuzzy => write!(f, "fuzzy"),
            MatchTier::Acronym => write!(f, "acronym"),
            MatchTier::TokenSet => write!(f, "token_set"),
        }
    }
}

/// Score of one header against one field path (0 = perfect)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub score: f64,
    pub tier: MatchTier,
}

/// A scored header/field pairing considered during assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub header: String,
    pub path: String,
    pub score: f64,
    pub tier: MatchTier,
}

/// Header to concrete field path mapping
///
/// Array fields carry resolved indices (`refDocs[1].title`). Serializes as
/// a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderMapping {
    entries: BTreeMap<String, String>,
}

impl HeaderMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a header to a path, replacing any previous target
    pub fn insert(&mut self, header: impl Into<String>, path: impl Into<String>) {
        self.entries.insert(header.into(), path.into());
    }

    /// Builder-style insert
    pub fn with(mut self, header: impl Into<String>, path: impl Into<String>) -> Self {
        self.insert(header, path);
        self
    }

    /// Remove a header
    pub fn remove(&mut self, header: &str) -> Option<String> {
        self.entries.remove(header)
    }

    /// Path mapped for a header
    pub fn get(&self, header: &str) -> Option<&str> {
        self.entries.get(header).map(String::as_str)
    }

    /// Iterate `(header, path)` pairs ordered by header
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(h, p)| (h.as_str(), p.as_str()))
    }

    /// All mapped paths
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: Into<String>, P: Into<String>> FromIterator<(H, P)> for HeaderMapping {
    fn from_iter<I: IntoIterator<Item = (H, P)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(h, p)| (h.into(), p.into()))
                .collect(),
        }
    }
}

/// How one header ended up in the mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderMatch {
    pub header: String,
    /// Descriptor path the header was assigned to
    pub field_path: String,
    /// Concrete path after array-index resolution
    pub resolved_path: String,
    pub score: f64,
    pub tier: MatchTier,
}

/// Statistics about an auto-mapping run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingStats {
    /// Distinct headers considered
    pub headers: usize,
    /// Field descriptors considered
    pub fields: usize,
    /// Headers that received a path
    pub mapped_headers: usize,
    /// Mapped headers bound to array fields
    pub array_headers: usize,
    /// Headers without a viable candidate
    pub unmapped_headers: usize,
    /// Fields no header was assigned to
    pub unmapped_fields: usize,
}

impl MappingStats {
    /// Fraction of headers that were mapped
    pub fn coverage(&self) -> f64 {
        if self.headers == 0 {
            return 1.0;
        }
        self.mapped_headers as f64 / self.headers as f64
    }
}

/// Result of auto-mapping a header row onto a schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingReport {
    pub mapping: HeaderMapping,
    /// One record per mapped header, in assignment order
    pub matches: Vec<HeaderMatch>,
    /// Headers left out of the mapping, in input order
    pub unmapped_headers: Vec<String>,
    /// Descriptor paths with no header, sorted
    pub unmapped_fields: Vec<String>,
    pub stats: MappingStats,
}

impl MappingReport {
    /// Create an empty report
    pub fn empty() -> Self {
        Self::default()
    }

    /// Match record for a header
    pub fn match_for(&self, header: &str) -> Option<&HeaderMatch> {
        self.matches.iter().find(|m| m.header == header)
    }
}

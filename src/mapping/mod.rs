//! Header mapping module for matching tabular columns to schema fields
//!
//! This module provides functionality to:
//! - Score a column header against a field path with layered heuristics
//!   (exact, synonym, leaf, fuzzy, acronym, token set)
//! - Assign headers to fields globally, best score first
//! - Resolve array item indices from numbers embedded in headers
//! - Suggest candidate fields for a single header
//!
//! # Example
//!
//! ```rust
//! use tabular_mapping_sdk::mapping::{AutoMapper, MappingConfig};
//! use tabular_mapping_sdk::schema::flatten;
//! use serde_json::json;
//!
//! let fields = flatten(&json!({
//!     "type": "object",
//!     "properties": {
//!         "tradeName": {"type": "string"},
//!         "refDocs": {
//!             "type": "array",
//!             "items": {"properties": {"title": {"type": "string"}}}
//!         }
//!     }
//! }))
//! .unwrap();
//!
//! let mapper = AutoMapper::with_config(MappingConfig::new().with_synonym("Label", "tradeName"));
//! let mapping = mapper.map(&["Label", "RefDoc 1 Title", "RefDoc 2 Title"], &fields);
//!
//! assert_eq!(mapping.get("Label"), Some("tradeName"));
//! assert_eq!(mapping.get("RefDoc 2 Title"), Some("refDocs[1].title"));
//! ```

mod config;
mod indexing;
mod matcher;
mod scorer;
mod synonyms;
mod text;
mod types;

pub use config::MappingConfig;
pub use indexing::resolve_array_indices;
pub use matcher::{
    AssignmentStrategy, AutoMapper, GreedyAssignment, ScoredPair, auto_map, prepare_fields,
};
pub use scorer::{MatchScorer, PreparedField, PreparedHeader, score, score_match};
pub use synonyms::SynonymTable;
pub use text::{levenshtein_distance, normalize};
pub use types::{
    HeaderMapping, HeaderMatch, MappingReport, MappingStats, MatchCandidate, MatchScore,
    MatchTier,
};

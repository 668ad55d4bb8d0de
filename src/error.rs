//! Error types for schema flattening and header mapping

use thiserror::Error;

/// Errors that can occur while flattening schemas or applying mappings
///
/// Unmatched headers, empty inputs and exclusivity conflicts are not
/// errors; they degrade to empty or partial results. Only malformed input
/// shapes end up here.
#[derive(Error, Debug)]
pub enum MappingError {
    /// A schema node has a shape the flattener cannot walk
    #[error("Invalid schema at '{path}': {reason}")]
    InvalidSchema { path: String, reason: String },

    /// Schema nesting is deeper than the configured limit
    #[error("Maximum schema depth exceeded at '{path}': {depth} > {max}")]
    MaxDepthExceeded {
        path: String,
        depth: usize,
        max: usize,
    },

    /// A mapped field path could not be parsed into segments
    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl MappingError {
    pub(crate) fn invalid_schema(path: &str, reason: impl Into<String>) -> Self {
        let path = if path.is_empty() { "root" } else { path };
        MappingError::InvalidSchema {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

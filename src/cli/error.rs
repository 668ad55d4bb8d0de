//! CLI error types

use std::path::PathBuf;

use tabular_mapping_sdk::MappingError;
use thiserror::Error;

/// Errors surfaced by `tabmap` commands
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read file {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write file {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(PathBuf, String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Mapping error: {0}")]
    MappingError(#[from] MappingError),
}

//! Tabular Mapping SDK - Map spreadsheet columns onto nested JSON Schema documents
//!
//! Provides:
//! - Schema flattening into addressable leaf field descriptors
//! - Header-to-field matching with layered scoring heuristics
//! - Global header assignment with array index resolution
//! - `oneOf` exclusivity conflict detection
//! - Row materialization into nested JSON documents
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use tabular_mapping_sdk::{MappingSession, find_conflicts};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "id": {"type": "integer"},
//!         "tradeName": {"type": "string"}
//!     }
//! });
//!
//! let session = MappingSession::from_schema(&schema).unwrap();
//! let mapping = session.auto_map(&["ID", "Brand"]);
//! assert!(find_conflicts(&mapping, session.fields()).is_empty());
//!
//! let row = HashMap::from([("ID", "7"), ("Brand", "Acme")]);
//! let doc = session.materializer::<&str>(&[]).materialize(&mapping, &row).unwrap();
//! assert_eq!(doc, json!({"id": 7, "tradeName": "Acme"}));
//! ```

pub mod error;
pub mod mapping;
pub mod materialize;
pub mod path;
pub mod schema;
pub mod session;
pub mod validation;

pub use error::{MappingError, MappingResult};
pub use mapping::{
    AutoMapper, HeaderMapping, MappingConfig, MappingReport, MatchCandidate, MatchTier,
    SynonymTable, auto_map, score,
};
pub use materialize::{
    ContextTemplate, InferredValue, MaterializeConfig, RawRow, RowMaterializer, materialize,
};
pub use schema::{FieldDescriptor, FieldType, FlattenConfig, OneOfMembership, flatten};
pub use session::MappingSession;
pub use validation::{ConflictGroup, find_conflicts};

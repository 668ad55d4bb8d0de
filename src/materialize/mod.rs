//! Row materialization
//!
//! Turns one tabular row plus a header mapping into a nested JSON document:
//! - Cell values are inferred as booleans, numbers or strings
//! - Containers are created on demand; digit segments create arrays
//! - Null holes left by sparse array indices are compacted away
//! - An optional JSON-LD `@context` is rendered from sector ids
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use tabular_mapping_sdk::mapping::HeaderMapping;
//! use tabular_mapping_sdk::materialize::RowMaterializer;
//! use serde_json::json;
//!
//! let mapping = HeaderMapping::new()
//!     .with("ID", "id")
//!     .with("Doc 2 Title", "refDocs[1].title");
//! let row = HashMap::from([
//!     ("ID".to_string(), "17".to_string()),
//!     ("Doc 2 Title".to_string(), "Manual".to_string()),
//! ]);
//!
//! let doc = RowMaterializer::new().materialize(&mapping, &row).unwrap();
//! assert_eq!(doc, json!({"id": 17, "refDocs": [{"title": "Manual"}]}));
//! ```

mod config;
mod context;
mod materializer;
mod value;

pub use config::MaterializeConfig;
pub use context::ContextTemplate;
pub use materializer::{MAX_ARRAY_INDEX, RawRow, RowMaterializer, materialize};
pub use value::InferredValue;

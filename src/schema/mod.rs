//! Schema flattening
//!
//! Walks a fully `$ref`-resolved JSON Schema and produces an ordered,
//! deduplicated list of [`FieldDescriptor`]s, one per addressable leaf.
//! Array membership and `oneOf` exclusivity are recorded on each
//! descriptor so the mapper and conflict validator never have to look at
//! the schema again.
//!
//! # Example
//!
//! ```rust
//! use tabular_mapping_sdk::schema::flatten;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "tradeName": {"type": "string"},
//!         "refDocs": {
//!             "type": "array",
//!             "items": {"properties": {"title": {"type": "string"}}}
//!         }
//!     }
//! });
//!
//! let fields = flatten(&schema).unwrap();
//! assert_eq!(fields[0].path, "refDocs.title");
//! assert!(fields[0].is_array);
//! ```

mod descriptor;
mod flatten;
mod node;

pub use descriptor::{FieldDescriptor, FieldType, OneOfMembership};
pub use flatten::{FlattenConfig, SchemaFlattener, flatten};
pub use node::{Combinator, CombinatorKind, LeafInfo, SchemaNode};

//! Materialization of mapped rows into nested documents

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use super::config::MaterializeConfig;
use super::value::InferredValue;
use crate::error::{MappingError, MappingResult};
use crate::mapping::HeaderMapping;
use crate::path::{PathSegment, canonical_path, parse_path};
use crate::schema::{FieldDescriptor, FieldType};

/// Largest array index a mapped path may address
pub const MAX_ARRAY_INDEX: usize = 65_535;

/// One tabular row addressed by header
pub trait RawRow {
    /// Raw text of the cell under `header`, if the row has one
    fn cell(&self, header: &str) -> Option<&str>;
}

impl<K, V, S> RawRow for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn cell(&self, header: &str) -> Option<&str> {
        self.get(header).map(|value| value.as_ref())
    }
}

impl<K, V> RawRow for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn cell(&self, header: &str) -> Option<&str> {
        self.get(header).map(|value| value.as_ref())
    }
}

/// JSON rows; only string cells are read, `null` counts as missing
impl RawRow for Map<String, Value> {
    fn cell(&self, header: &str) -> Option<&str> {
        self.get(header).and_then(Value::as_str)
    }
}

impl<T: RawRow + ?Sized> RawRow for &T {
    fn cell(&self, header: &str) -> Option<&str> {
        (**self).cell(header)
    }
}

/// Builds one output document per row from a header mapping
#[derive(Debug, Clone, Default)]
pub struct RowMaterializer {
    config: MaterializeConfig,
    field_types: HashMap<String, Option<FieldType>>,
    context: Option<Value>,
}

impl RowMaterializer {
    /// Create a materializer with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a materializer with custom config
    pub fn with_config(config: MaterializeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Declared field types, used when `respect_field_types` is on
    pub fn with_fields(mut self, fields: &[FieldDescriptor]) -> Self {
        self.field_types = fields
            .iter()
            .map(|f| (f.path.clone(), f.field_type))
            .collect();
        self
    }

    /// Sectors rendered into every document's `@context`
    pub fn with_sectors<S: AsRef<str>>(mut self, sectors: &[S]) -> Self {
        self.context = self.config.context.render(sectors);
        self
    }

    pub fn config(&self) -> &MaterializeConfig {
        &self.config
    }

    /// Rendered `@context`, if any sectors were given
    pub fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }

    /// Build the document for a single row
    ///
    /// Headers without a cell, and empty cells, are skipped. Fails only when
    /// a mapped path cannot be parsed.
    pub fn materialize<R: RawRow + ?Sized>(
        &self,
        mapping: &HeaderMapping,
        row: &R,
    ) -> MappingResult<Value> {
        let mut document = Value::Object(Map::new());
        if let Some(context) = &self.context {
            document["@context"] = context.clone();
        }

        let mut written = 0usize;
        for (header, path) in mapping.iter() {
            let Some(raw) = row.cell(header) else {
                continue;
            };
            let Some(value) = self.infer(path, raw) else {
                continue;
            };

            let segments = parse_path(path)?;
            check_indices(&segments, path)?;
            trace!(header, path, kind = value.type_name(), "Writing cell");
            set_path(&mut document, &segments, value.into_json(), path);
            written += 1;
        }

        if self.config.compact_arrays {
            compact(&mut document);
        }

        debug!(mapped = mapping.len(), written, "Materialized row");
        Ok(document)
    }

    /// Build one document per row, in row order
    pub fn materialize_rows<R: RawRow>(
        &self,
        mapping: &HeaderMapping,
        rows: &[R],
    ) -> MappingResult<Vec<Value>> {
        let documents = rows
            .iter()
            .map(|row| self.materialize(mapping, row))
            .collect::<MappingResult<Vec<_>>>()?;
        debug!(rows = documents.len(), "Materialized table");
        Ok(documents)
    }

    fn infer(&self, path: &str, raw: &str) -> Option<InferredValue> {
        let declared = if self.config.respect_field_types {
            self.field_types
                .get(canonical_path(path).as_str())
                .copied()
                .flatten()
        } else {
            None
        };

        InferredValue::infer_for(
            raw,
            declared,
            self.config.infer_booleans,
            self.config.infer_numbers,
        )
    }
}

fn check_indices(segments: &[PathSegment], path: &str) -> MappingResult<()> {
    for segment in segments {
        if let PathSegment::Index(index) = segment
            && *index > MAX_ARRAY_INDEX
        {
            return Err(MappingError::InvalidPath {
                path: path.to_string(),
                reason: format!("array index {} exceeds {}", index, MAX_ARRAY_INDEX),
            });
        }
    }
    Ok(())
}

/// Write `value` at `segments`, creating containers on demand
///
/// An index segment makes its container an array, padded with nulls up to
/// the index. A scalar standing where a container is needed is replaced.
fn set_path(root: &mut Value, segments: &[PathSegment], value: Value, path: &str) {
    let mut cursor = root;
    for segment in segments {
        cursor = child_mut(cursor, segment, path);
    }
    if cursor.is_object() || cursor.is_array() {
        warn!(path, "Overwriting nested value with a scalar");
    }
    *cursor = value;
}

fn child_mut<'v>(container: &'v mut Value, segment: &PathSegment, path: &str) -> &'v mut Value {
    match segment {
        PathSegment::Key(key) => {
            if !container.is_object() {
                if !container.is_null() {
                    warn!(path, key = %key, "Replacing scalar with an object");
                }
                *container = Value::Object(Map::new());
            }
            &mut container[key.as_str()]
        }
        PathSegment::Index(index) => {
            if !container.is_array() {
                if !container.is_null() {
                    warn!(path, index, "Replacing scalar with an array");
                }
                *container = Value::Array(Vec::new());
            }
            if let Value::Array(items) = &mut *container
                && items.len() <= *index
            {
                items.resize(*index + 1, Value::Null);
            }
            &mut container[*index]
        }
    }
}

/// Remove null holes from every array, recursively
fn compact(value: &mut Value) {
    match value {
        Value::Array(items) => {
            items.retain(|item| !item.is_null());
            items.iter_mut().for_each(compact);
        }
        Value::Object(map) => map.values_mut().for_each(compact),
        _ => {}
    }
}

/// Materialize a single row with default configuration
pub fn materialize<R: RawRow + ?Sized>(mapping: &HeaderMapping, row: &R) -> MappingResult<Value> {
    RowMaterializer::new().materialize(mapping, row)
}

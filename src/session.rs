//! Caller-owned mapping session
//!
//! A session flattens a schema once and keeps the descriptors together with
//! their precomputed comparison forms, so repeated mapping and suggestion
//! calls during one import skip the per-field preparation work.

use serde_json::Value;
use tracing::debug;

use crate::error::MappingResult;
use crate::mapping::{
    AutoMapper, HeaderMapping, MappingConfig, MappingReport, MatchCandidate, PreparedField,
    prepare_fields,
};
use crate::materialize::{MaterializeConfig, RowMaterializer};
use crate::schema::{FieldDescriptor, FlattenConfig, SchemaFlattener};
use crate::validation::{ConflictGroup, ConflictValidator};

/// Descriptors, prepared match forms and configuration for one import
#[derive(Debug, Clone)]
pub struct MappingSession {
    fields: Vec<FieldDescriptor>,
    prepared: Vec<PreparedField>,
    mapper: AutoMapper,
    materialize: MaterializeConfig,
}

impl MappingSession {
    /// Start a session from already flattened descriptors
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        let prepared = prepare_fields(&fields);
        debug!(fields = fields.len(), "Prepared mapping session");
        Self {
            fields,
            prepared,
            mapper: AutoMapper::new(),
            materialize: MaterializeConfig::default(),
        }
    }

    /// Flatten `schema` with default settings and start a session
    pub fn from_schema(schema: &Value) -> MappingResult<Self> {
        Self::from_schema_with(schema, FlattenConfig::default())
    }

    /// Flatten `schema` with custom settings and start a session
    pub fn from_schema_with(schema: &Value, config: FlattenConfig) -> MappingResult<Self> {
        let fields = SchemaFlattener::with_config(config).flatten(schema)?;
        Ok(Self::new(fields))
    }

    /// Replace the matching configuration
    pub fn with_config(mut self, config: MappingConfig) -> Self {
        self.mapper = AutoMapper::with_config(config);
        self
    }

    /// Replace the materialization configuration
    pub fn with_materialize_config(mut self, config: MaterializeConfig) -> Self {
        self.materialize = config;
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn config(&self) -> &MappingConfig {
        self.mapper.config()
    }

    /// Auto-map headers, returning only the mapping
    pub fn auto_map<H: AsRef<str>>(&self, headers: &[H]) -> HeaderMapping {
        self.map_with_report(headers).mapping
    }

    /// Auto-map headers with a full report
    pub fn map_with_report<H: AsRef<str>>(&self, headers: &[H]) -> MappingReport {
        self.mapper
            .map_prepared(headers, &self.fields, &self.prepared)
    }

    /// Best candidate fields for a header, up to `max_suggestions`
    pub fn suggest(&self, header: &str) -> Vec<MatchCandidate> {
        self.mapper
            .suggest_prepared(header, &self.prepared, self.config().max_suggestions)
    }

    /// `oneOf` conflicts in a mapping over this session's fields
    pub fn conflicts(&self, mapping: &HeaderMapping) -> Vec<ConflictGroup> {
        ConflictValidator::new().validate(mapping, &self.fields)
    }

    /// Materializer aware of this session's field types
    pub fn materializer<S: AsRef<str>>(&self, sectors: &[S]) -> RowMaterializer {
        RowMaterializer::with_config(self.materialize.clone())
            .with_fields(&self.fields)
            .with_sectors(sectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MatchTier;
    use serde_json::json;
    use std::collections::HashMap;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "tradeName": {"type": "string"},
                "gtin": {"type": "string"},
                "color": {"type": "string"}
            },
            "oneOf": [
                {"properties": {"optionA": {"type": "string"}}},
                {"properties": {"optionB": {"type": "string"}}}
            ]
        })
    }

    #[test]
    fn test_session_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MappingSession>();
    }

    #[test]
    fn test_session_map_and_suggest() {
        let session = MappingSession::from_schema(&schema()).unwrap();
        assert_eq!(session.fields().len(), 6);

        let mapping = session.auto_map(&["Brand", "EAN", "ID"]);
        assert_eq!(mapping.get("Brand"), Some("tradeName"));
        assert_eq!(mapping.get("EAN"), Some("gtin"));
        assert_eq!(mapping.get("ID"), Some("id"));

        let suggestions = session.suggest("Brand");
        assert_eq!(suggestions[0].path, "tradeName");
        assert_eq!(suggestions[0].tier, MatchTier::Synonym);
    }

    #[test]
    fn test_session_matches_direct_mapper() {
        let session = MappingSession::from_schema(&schema()).unwrap();
        let headers = ["Trade Name", "Colour", "Option A"];
        assert_eq!(
            session.auto_map(&headers),
            AutoMapper::new().map(&headers, session.fields())
        );
    }

    #[test]
    fn test_session_conflicts() {
        let session = MappingSession::from_schema(&schema()).unwrap();
        let mapping = HeaderMapping::new().with("A", "optionA").with("B", "optionB");
        assert_eq!(session.conflicts(&mapping).len(), 1);
    }

    #[test]
    fn test_session_materializer_respects_types() {
        let session = MappingSession::from_schema(&schema())
            .unwrap()
            .with_materialize_config(MaterializeConfig::new().with_respect_field_types(true));
        let mapping = HeaderMapping::new().with("EAN", "gtin").with("ID", "id");
        let row = HashMap::from([("EAN", "0042"), ("ID", "42")]);

        let doc = session
            .materializer(&["core"])
            .materialize(&mapping, &row)
            .unwrap();
        assert_eq!(doc["gtin"], json!("0042"));
        assert_eq!(doc["id"], json!(42));
        assert!(doc["@context"].is_string());
    }

    #[test]
    fn test_invalid_schema() {
        assert!(MappingSession::from_schema(&json!("nope")).is_err());
    }
}

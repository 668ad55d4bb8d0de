//! `convert` command: materialize every CSV row into a JSON document

use std::path::PathBuf;

use tabular_mapping_sdk::{MappingConfig, MappingSession, MaterializeConfig};
use tracing::info;

use crate::error::CliError;
use crate::input::{load_config, load_csv, load_mapping, load_schema};
use crate::output::{format_conflicts, write_json};

/// Arguments for the `convert` command
pub struct ConvertArgs {
    pub schema: PathBuf,
    pub csv: PathBuf,
    /// Explicit header mapping; auto-mapped when absent
    pub mapping: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub sectors: Vec<String>,
    pub respect_types: bool,
    pub output: Option<PathBuf>,
}

/// Handle the `convert` command
pub fn handle_convert(args: &ConvertArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => MappingConfig::default(),
    };
    let schema = load_schema(&args.schema)?;
    let table = load_csv(&args.csv)?;

    let session = MappingSession::from_schema(&schema)?
        .with_config(config)
        .with_materialize_config(
            MaterializeConfig::new().with_respect_field_types(args.respect_types),
        );

    let mapping = match &args.mapping {
        Some(path) => load_mapping(path)?,
        None => session.auto_map(&table.headers),
    };
    if mapping.is_empty() {
        return Err(CliError::InvalidArgument(
            "No CSV header could be mapped onto the schema".to_string(),
        ));
    }

    let conflicts = session.conflicts(&mapping);
    eprint!("{}", format_conflicts(&conflicts));

    let documents = session
        .materializer(&args.sectors)
        .materialize_rows(&mapping, &table.rows)?;

    info!(
        rows = documents.len(),
        mapped = mapping.len(),
        "Converted table"
    );
    write_json(&documents, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_convert_table() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.json");
        let csv = dir.path().join("table.csv");
        let output = dir.path().join("out.json");

        std::fs::write(
            &schema,
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "tradeName": {"type": "string"}
                }
            })
            .to_string(),
        )
        .unwrap();
        std::fs::write(&csv, "ID,Brand\n1,Acme\n2,\n").unwrap();

        handle_convert(&ConvertArgs {
            schema,
            csv,
            mapping: None,
            config: None,
            sectors: vec!["core".to_string()],
            respect_types: false,
            output: Some(output.clone()),
        })
        .unwrap();

        let documents: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let context = "https://schemas.example.org/contexts/core.jsonld";
        assert_eq!(
            documents,
            json!([
                {"@context": context, "id": 1, "tradeName": "Acme"},
                {"@context": context, "id": 2}
            ])
        );
    }

    #[test]
    fn test_convert_without_mappable_headers() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.json");
        let csv = dir.path().join("table.csv");
        std::fs::write(&schema, r#"{"properties": {"id": {"type": "integer"}}}"#).unwrap();
        std::fs::write(&csv, "Unrelated\nx\n").unwrap();

        let err = handle_convert(&ConvertArgs {
            schema,
            csv,
            mapping: None,
            config: None,
            sectors: Vec::new(),
            respect_types: false,
            output: None,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }
}

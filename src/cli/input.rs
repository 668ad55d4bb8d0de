//! Loading schemas, configs, mappings and CSV tables from disk

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tabular_mapping_sdk::{HeaderMapping, MappingConfig};
use tracing::debug;

use crate::error::CliError;

/// Header row plus every data row keyed by header
#[derive(Debug, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))
}

fn parse_error(path: &Path, e: impl ToString) -> CliError {
    CliError::ParseError(path.to_path_buf(), e.to_string())
}

/// Load a JSON Schema; `.yaml` / `.yml` files are read as YAML
pub fn load_schema(path: &Path) -> Result<Value, CliError> {
    let content = read(path)?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| parse_error(path, e))
    } else {
        serde_json::from_str(&content).map_err(|e| parse_error(path, e))
    }
}

/// Load a `MappingConfig` from TOML; missing keys keep their defaults
pub fn load_config(path: &Path) -> Result<MappingConfig, CliError> {
    let content = read(path)?;
    toml::from_str(&content).map_err(|e| parse_error(path, e))
}

/// Load a header mapping from a JSON object of header -> path
pub fn load_mapping(path: &Path) -> Result<HeaderMapping, CliError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|e| parse_error(path, e))
}

/// Read a CSV file with a header row
///
/// Rows shorter than the header simply lack the trailing cells.
pub fn load_csv(path: &Path) -> Result<CsvTable, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_error(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| parse_error(path, e))?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        rows.push(row);
    }

    debug!(
        path = %path.display(),
        headers = headers.len(),
        rows = rows.len(),
        "Loaded CSV"
    );
    Ok(CsvTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_json_and_yaml_schema() {
        let json = temp_file(".json", r#"{"properties": {"id": {"type": "integer"}}}"#);
        let yaml = temp_file(".yaml", "properties:\n  id:\n    type: integer\n");

        let a = load_schema(json.path()).unwrap();
        let b = load_schema(yaml.path()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_load_config() {
        let file = temp_file(
            ".toml",
            "fuzzy_matching = false\n\n[synonyms]\n\"Label\" = \"tradeName\"\n",
        );
        let config = load_config(file.path()).unwrap();
        assert!(!config.fuzzy_matching);
        assert!(config.acronym_matching);
        assert_eq!(config.synonyms.target("label"), Some("tradeName"));
    }

    #[test]
    fn test_load_mapping() {
        let file = temp_file(".json", r#"{"ID": "id", "Doc 1": "refDocs[0].title"}"#);
        let mapping = load_mapping(file.path()).unwrap();
        assert_eq!(mapping.get("Doc 1"), Some("refDocs[0].title"));
    }

    #[test]
    fn test_load_csv() {
        let file = temp_file(".csv", "ID, Brand ,Colour\n1,Acme,red\n2,Globex\n");
        let table = load_csv(file.path()).unwrap();
        assert_eq!(table.headers, vec!["ID", "Brand", "Colour"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["Colour"], "red");
        assert!(!table.rows[1].contains_key("Colour"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_schema(Path::new("/nonexistent/schema.json")).unwrap_err();
        assert!(matches!(err, CliError::FileReadError(..)));
    }

    #[test]
    fn test_invalid_schema_file() {
        let file = temp_file(".json", "{not json");
        assert!(matches!(
            load_schema(file.path()).unwrap_err(),
            CliError::ParseError(..)
        ));
    }
}

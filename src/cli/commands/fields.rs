//! `fields` command: print flattened descriptors

use std::path::PathBuf;

use tabular_mapping_sdk::schema::{FlattenConfig, SchemaFlattener};
use tracing::info;

use crate::error::CliError;
use crate::input::load_schema;
use crate::output::write_json;

/// Arguments for the `fields` command
pub struct FieldsArgs {
    pub schema: PathBuf,
    pub max_depth: usize,
    pub output: Option<PathBuf>,
}

/// Handle the `fields` command
pub fn handle_fields(args: &FieldsArgs) -> Result<(), CliError> {
    let schema = load_schema(&args.schema)?;
    let flattener =
        SchemaFlattener::with_config(FlattenConfig::new().with_max_depth(args.max_depth));
    let fields = flattener.flatten(&schema)?;

    info!(schema = %args.schema.display(), fields = fields.len(), "Flattened schema");
    write_json(&fields, args.output.as_deref())
}

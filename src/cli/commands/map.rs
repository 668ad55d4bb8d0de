//! `map` command: auto-map CSV headers onto a schema

use std::path::PathBuf;

use tabular_mapping_sdk::{MappingConfig, MappingSession};
use tracing::info;

use crate::error::CliError;
use crate::input::{load_config, load_csv, load_schema};
use crate::output::{format_report, write_json};

/// Arguments for the `map` command
pub struct MapArgs {
    pub schema: PathBuf,
    pub csv: PathBuf,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// Write the full report instead of the bare mapping
    pub report: bool,
    pub verbose: bool,
}

/// Handle the `map` command
pub fn handle_map(args: &MapArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => MappingConfig::default(),
    };
    let schema = load_schema(&args.schema)?;
    let table = load_csv(&args.csv)?;

    let session = MappingSession::from_schema(&schema)?.with_config(config);
    let report = session.map_with_report(&table.headers);
    let conflicts = session.conflicts(&report.mapping);

    info!(
        headers = report.stats.headers,
        mapped = report.stats.mapped_headers,
        conflicts = conflicts.len(),
        "Mapped headers"
    );
    eprint!("{}", format_report(&report, &conflicts, args.verbose));

    if args.report {
        write_json(&report, args.output.as_deref())
    } else {
        write_json(&report.mapping, args.output.as_deref())
    }
}

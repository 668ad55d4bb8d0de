//! `tabmap` - map CSV tables onto nested JSON Schema documents

mod commands;
mod error;
mod input;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::convert::{ConvertArgs, handle_convert};
use commands::fields::{FieldsArgs, handle_fields};
use commands::map::{MapArgs, handle_map};

#[derive(Parser)]
#[command(name = "tabmap")]
#[command(about = "Map CSV columns onto nested JSON Schema documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the flattened field descriptors of a schema
    Fields {
        /// Schema file (JSON or YAML)
        #[arg(long)]
        schema: PathBuf,
        /// Maximum schema nesting depth
        #[arg(long, default_value_t = 64)]
        max_depth: usize,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Auto-map CSV headers onto schema fields
    Map {
        /// Schema file (JSON or YAML)
        #[arg(long)]
        schema: PathBuf,
        /// CSV file with a header row
        #[arg(long)]
        csv: PathBuf,
        /// Mapping configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the full report instead of the bare mapping
        #[arg(long)]
        report: bool,
        /// Show every match and unmapped field
        #[arg(short, long)]
        verbose: bool,
    },
    /// Convert every CSV row into a JSON document
    Convert {
        /// Schema file (JSON or YAML)
        #[arg(long)]
        schema: PathBuf,
        /// CSV file with a header row
        #[arg(long)]
        csv: PathBuf,
        /// Header mapping (JSON object); auto-mapped when omitted
        #[arg(long)]
        mapping: Option<PathBuf>,
        /// Mapping configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Sector id for `@context`, repeatable
        #[arg(long = "sector")]
        sectors: Vec<String>,
        /// Keep raw text for fields declared as strings
        #[arg(long)]
        respect_types: bool,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tabular_mapping_sdk=info,tabmap=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fields {
            schema,
            max_depth,
            output,
        } => handle_fields(&FieldsArgs {
            schema,
            max_depth,
            output,
        })?,
        Commands::Map {
            schema,
            csv,
            config,
            output,
            report,
            verbose,
        } => handle_map(&MapArgs {
            schema,
            csv,
            config,
            output,
            report,
            verbose,
        })?,
        Commands::Convert {
            schema,
            csv,
            mapping,
            config,
            sectors,
            respect_types,
            output,
        } => handle_convert(&ConvertArgs {
            schema,
            csv,
            mapping,
            config,
            sectors,
            respect_types,
            output,
        })?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert_sectors() {
        let cli = Cli::try_parse_from([
            "tabmap", "convert", "--schema", "s.json", "--csv", "t.csv", "--sector", "core",
            "--sector", "textile",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert { sectors, mapping, .. } => {
                assert_eq!(sectors, vec!["core", "textile"]);
                assert!(mapping.is_none());
            }
            _ => panic!("expected convert"),
        }
    }
}

//! Output formatting for CLI

use std::path::Path;

use serde::Serialize;
use tabular_mapping_sdk::{ConflictGroup, MappingReport};

use crate::error::CliError;

/// Human readable summary of a mapping report, written to stderr
pub fn format_report(report: &MappingReport, conflicts: &[ConflictGroup], verbose: bool) -> String {
    let stats = &report.stats;
    let mut output = String::new();

    output.push_str("\nMapping Results\n");
    output.push_str("===============\n");
    output.push_str(&format!(
        "Mapped headers: {}/{} ({:.1}%)\n",
        stats.mapped_headers,
        stats.headers,
        stats.coverage() * 100.0
    ));
    output.push_str(&format!("Array headers: {}\n", stats.array_headers));
    output.push_str(&format!("Schema fields: {}\n", stats.fields));

    if verbose && !report.matches.is_empty() {
        output.push_str("\nMatches:\n");
        for m in &report.matches {
            output.push_str(&format!(
                "  {} -> {} ({}, {:.2})\n",
                m.header, m.resolved_path, m.tier, m.score
            ));
        }
    }

    if !report.unmapped_headers.is_empty() {
        output.push_str("\nUnmapped headers:\n");
        for header in &report.unmapped_headers {
            output.push_str(&format!("  {}\n", header));
        }
    }

    if verbose && !report.unmapped_fields.is_empty() {
        output.push_str("\nUnmapped fields:\n");
        for field in &report.unmapped_fields {
            output.push_str(&format!("  {}\n", field));
        }
    }

    output.push_str(&format_conflicts(conflicts));
    output
}

/// Warning block for `oneOf` conflicts, empty when there are none
pub fn format_conflicts(conflicts: &[ConflictGroup]) -> String {
    let mut output = String::new();
    for conflict in conflicts {
        output.push_str(&format!(
            "\nWARNING: exclusive oneOf branches mapped together ({}{}):\n",
            conflict.scope, conflict.group_id
        ));
        for (branch, paths) in &conflict.branches {
            output.push_str(&format!("  branch {}: {}\n", branch, paths.join(", ")));
        }
    }
    output
}

/// Write pretty JSON to `output`, or stdout when no file is given
pub fn write_json<T: Serialize + ?Sized>(value: &T, output: Option<&Path>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::InvalidArgument(format!("Failed to serialize output: {}", e)))?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(|e| CliError::FileWriteError(path.to_path_buf(), e.to_string()))?;
            eprintln!("Written to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

//! Output formatting utilities
//!
//! This module renders flat entries and single values in the supported
//! output formats and handles writing to files or stdout.

use std::path::Path;

use anyhow::{Context, Result};
use flatpath_core::{FlatMap, Value};
use tracing::info;

use crate::cli::OutputFormat;

/// Helper function to write output to file or stdout
pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<()> {
    if let Some(path) = output_path {
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Output written to {}", path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Render a value on one line
///
/// Strings are printed bare so they can be used directly from a shell;
/// everything else is compact JSON.
pub fn render_value(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Ok(serde_json::to_string(&other.to_json()?)?),
    }
}

/// Format a single value based on output format
pub fn format_value(value: &Value, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Lines => render_value(value),
        OutputFormat::Json => serde_json::to_string_pretty(&value.to_json()?).map_err(Into::into),
    }
}

/// Format every entry of a map based on output format
pub fn format_entries(map: &FlatMap, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Lines => {
            let lines = map
                .iter()
                .map(|(key, value)| Ok(format!("{} = {}", key, render_value(value)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => serde_json::to_string_pretty(map).map_err(Into::into),
    }
}

/// One key per line, in insertion order
pub fn format_keys(map: &FlatMap) -> String {
    map.keys().map(String::as_str).collect::<Vec<_>>().join("\n")
}

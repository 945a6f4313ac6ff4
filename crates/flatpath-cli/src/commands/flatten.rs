//! Flatten command implementations
//!
//! Handles printing all flat entries or just their keys.

use crate::cli::OutputFormat;
use crate::formatters::{format_entries, format_keys, write_output};
use crate::loader::load_documents;
use anyhow::Result;
use flatpath_core::FlattenOptions;
use std::path::{Path, PathBuf};
use tracing::info;

/// Execute flatten command
pub fn cmd_flatten(
    files: &[PathBuf],
    options: &FlattenOptions,
    output: Option<&Path>,
    format: &OutputFormat,
) -> Result<()> {
    info!("Flattening {} document(s)", files.len());

    let map = load_documents(files, options.clone())?;
    let output_content = format_entries(&map, format)?;
    write_output(&output_content, output)
}

/// Execute keys command
pub fn cmd_keys(files: &[PathBuf], options: &FlattenOptions, output: Option<&Path>) -> Result<()> {
    let map = load_documents(files, options.clone())?;
    write_output(&format_keys(&map), output)
}

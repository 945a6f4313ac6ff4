//! Single key lookup

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::formatters::{format_value, write_output};
use crate::loader::load_documents;
use anyhow::Result;
use flatpath_core::FlattenOptions;
use std::path::PathBuf;
use tracing::{debug, error};

/// Execute get command
pub fn cmd_get(
    key: &str,
    files: &[PathBuf],
    options: &FlattenOptions,
    format: &OutputFormat,
) -> Result<()> {
    debug!("Looking up '{}'", key);

    let map = load_documents(files, options.clone())?;
    let Some(value) = map.get(key) else {
        error!("Key '{}' not found in {} entries", key, map.len());
        return Err(CliError::KeyNotFound(key.to_string()).into());
    };

    write_output(&format_value(value, format)?, None)
}

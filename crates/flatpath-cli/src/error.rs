//! Error type for CLI operations

use flatpath_core::FlatpathError;

/// Common result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Common error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Flatpath(#[from] FlatpathError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported document format: {0} (expected .json or .toml)")]
    UnsupportedFormat(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),
}

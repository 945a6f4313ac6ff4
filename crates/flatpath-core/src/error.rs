//! Error types for flatpath-core
//!
//! Flattening itself never fails: unsupported shapes simply contribute no
//! entries. The errors here cover the surfaces around it, namely parsing
//! documents into [`Value`](crate::Value)s, serializing values back out and
//! validating [`FlattenOptions`](crate::FlattenOptions).

use thiserror::Error;

/// Errors that can occur outside of the flattening walk itself
#[derive(Debug, Error)]
pub enum FlatpathError {
    /// Document could not be parsed as JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value references itself and cannot be written out as a tree
    #[error("cyclic value at '{path}' cannot be serialized")]
    CyclicValue {
        /// Key path of the composite that closed the cycle
        path: String,
    },

    /// Key separator must be a non-empty string
    #[error("invalid key separator: {0:?}")]
    InvalidSeparator(String),
}

/// Convenience result alias for fallible flatpath operations
pub type Result<T> = core::result::Result<T, FlatpathError>;

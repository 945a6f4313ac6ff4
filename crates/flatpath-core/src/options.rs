//! Flattening configuration

use serde::{Deserialize, Serialize};

use crate::error::{FlatpathError, Result};
use crate::key::DEFAULT_SEPARATOR;

/// Options controlling how nested values are flattened
///
/// The defaults produce dot-joined keys and columnize arrays of records.
/// Options can be deserialized, so a tool can keep them next to the
/// documents it flattens:
///
/// ```rust
/// use flatpath_core::FlattenOptions;
///
/// let options: FlattenOptions = serde_json::from_str(r#"{"separator": "/"}"#).unwrap();
/// assert_eq!(options.separator, "/");
/// assert!(options.columnize_arrays);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenOptions {
    /// String placed between field names in a flat key
    pub separator: String,
    /// Collect the fields of records inside arrays into per-field lists.
    /// When disabled, arrays are stored as opaque values only.
    pub columnize_arrays: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            columnize_arrays: true,
        }
    }
}

impl FlattenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `separator` between field names
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Enable or disable columnization of arrays of records
    pub fn with_columnize_arrays(mut self, columnize: bool) -> Self {
        self.columnize_arrays = columnize;
        self
    }

    /// Check the options before they are used for flattening
    ///
    /// An empty separator would make `a.bc` and `ab.c` collide, so it is
    /// rejected.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(FlatpathError::InvalidSeparator(self.separator.clone()));
        }
        Ok(())
    }
}

//! The flat lookup table
//!
//! [`FlatMap`] wraps an ordered [`IndexMap`] and fills it by flattening
//! nested records. Lookups are plain key lookups on the joined paths; the
//! usual map operations are available and behave like on any ordered map.

use indexmap::map::{IntoIter, Iter, Keys, Values};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::Result;
use crate::options::FlattenOptions;
use crate::traverse::Traverser;
use crate::value::Value;

/// Ordered lookup table from flat key paths to values
///
/// Constructing from a record flattens it; further values can be merged in
/// later. Merging only adds and overwrites keys, it never removes keys the
/// new value lacks.
///
/// # Examples
///
/// ```rust
/// use flatpath_core::{FlatMap, Value};
/// use serde_json::json;
///
/// let mut config = FlatMap::from_value(json!({
///     "api": { "http": { "auth": { "token": "secret" } } }
/// }));
/// assert_eq!(config.get("api.http.auth.token"), Some(&Value::from("secret")));
///
/// config.merge(json!({ "api": { "http": { "port": 8080 } } }));
/// assert_eq!(config.get("api.http.port"), Some(&Value::from(8080)));
/// assert!(config.contains_key("api.http.auth.token"));
/// ```
///
/// Stored values are handles to the flattened input, not copies: a record
/// changed after it was merged is seen changed through the map too.
#[derive(Debug, Clone, Default)]
pub struct FlatMap {
    entries: IndexMap<String, Value>,
    options: FlattenOptions,
}

impl FlatMap {
    /// Create an empty map with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with the given options
    pub fn with_options(options: FlattenOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            entries: IndexMap::new(),
            options,
        })
    }

    /// Create a map from an initial value
    ///
    /// Only a record is flattened; any other value (null, scalars, arrays)
    /// produces an empty map.
    pub fn from_value(value: impl Into<Value>) -> Self {
        let mut map = Self::new();
        map.construct(value.into());
        map
    }

    /// [`FlatMap::from_value`] with explicit options
    pub fn from_value_with_options(value: impl Into<Value>, options: FlattenOptions) -> Result<Self> {
        let mut map = Self::with_options(options)?;
        map.construct(value.into());
        Ok(map)
    }

    fn construct(&mut self, value: Value) {
        Traverser::new(&mut self.entries, &self.options).flatten(&value);
    }

    /// Options used for flattening and [`FlatMap::get_path`]
    pub fn options(&self) -> &FlattenOptions {
        &self.options
    }

    /// Flatten another value into this map
    ///
    /// Existing keys present in `value` are overwritten, new ones are
    /// appended, all others are kept. An array of records is split into
    /// columns keyed by its field names; scalars and other arrays add
    /// nothing. Returns the number of entries written, overwrites and
    /// column appends included.
    pub fn merge(&mut self, value: impl Into<Value>) -> usize {
        let value = value.into();
        Traverser::new(&mut self.entries, &self.options).merge(&value)
    }

    /// Value stored under a flat key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up by field names, joined with the configured separator
    pub fn get_path<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Value> {
        let key = segments
            .iter()
            .map(|segment| segment.as_ref())
            .collect::<Vec<&str>>()
            .join(&self.options.separator);
        self.entries.get(&key)
    }

    /// Whether a flat key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set a single entry without flattening it
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove an entry, keeping the order of the rest
    ///
    /// Returns whether the key was present. Entries below `key` are not
    /// touched.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    /// Remove every entry; the options are kept
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.entries.keys()
    }

    /// Values in insertion order
    pub fn values(&self) -> Values<'_, String, Value> {
        self.entries.values()
    }
}

impl From<Value> for FlatMap {
    fn from(value: Value) -> Self {
        FlatMap::from_value(value)
    }
}

impl<'a> IntoIterator for &'a FlatMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for FlatMap {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Serializes as a single-level map from flat key to value
impl Serialize for FlatMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

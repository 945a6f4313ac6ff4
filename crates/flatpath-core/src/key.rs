//! Key paths for flat lookups
//!
//! A [`KeyPath`] is the sequence of field names leading from the root of a
//! document to one of its values. Joined with a separator it becomes the
//! string key under which the value is stored in a
//! [`FlatMap`](crate::FlatMap), e.g. `api.http.auth.token`.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Separator used when none is configured
pub const DEFAULT_SEPARATOR: &str = ".";

/// Field names from the root to a value
///
/// Paths are extended by copy: [`KeyPath::child`] returns a new path and
/// leaves the parent untouched, so a path can be handed to several sibling
/// branches of a walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// The empty path of a top-level value
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// New path with one more segment appended
    pub fn child(&self, segment: impl Into<String>) -> KeyPath {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment.into());
        KeyPath { segments }
    }

    /// Split a flat key back into segments
    ///
    /// This is the inverse of [`KeyPath::join`] only when no field name
    /// contains the separator.
    pub fn parse(key: &str, separator: &str) -> KeyPath {
        if key.is_empty() {
            return KeyPath::root();
        }
        key.split(separator).collect()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Join the segments into a flat key
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatpath_core::KeyPath;
    ///
    /// let path = KeyPath::root().child("api").child("port");
    /// assert_eq!(path.join("."), "api.port");
    /// assert_eq!(path.join("/"), "api/port");
    /// ```
    pub fn join(&self, separator: &str) -> String {
        self.segments.join(separator)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(DEFAULT_SEPARATOR))
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        KeyPath {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

//! Core types for flattening nested records into dot-path lookup tables
//!
//! This crate turns an arbitrarily nested record, such as a configuration
//! document, into a [`FlatMap`] keyed by joined field paths. Instead of
//! walking `config["api"]["http"]["port"]` a caller asks for
//! `config.get("api.http.port")`. Several partial documents can be merged
//! into one map over time; a merged list of records is split into
//! per-field columns just like a nested one.
//!
//! # Features
//!
//! - **Shared values**: records and arrays are reference counted handles, so
//!   one instance can appear under several keys or contain itself
//! - **Cycle safe**: self references are stored but never descended into
//!   twice along the same branch
//! - **Columns**: fields of records inside arrays are gathered into
//!   per-field lists (`rows.id -> [1, 2, 3]`)
//! - **Ordered**: entries iterate in the order they were first written
//!
//! # Usage
//!
//! ```rust
//! use flatpath_core::{FlatMap, Value};
//! use serde_json::json;
//!
//! let map = FlatMap::from_value(json!({
//!     "servers": [{ "host": "a", "port": 1 }, { "host": "b", "port": 2 }]
//! }));
//! assert_eq!(map.get("servers.host"), Some(&Value::from(json!(["a", "b"]))));
//! assert!(!map.contains_key("servers.0"));
//! ```

// Module declarations
pub mod error;
pub mod key;
mod lineage;
pub mod options;
pub mod store;
mod traverse;
pub mod value;

// Re-export all public types for convenience
pub use error::{FlatpathError, Result};
pub use key::{KeyPath, DEFAULT_SEPARATOR};
pub use options::FlattenOptions;
pub use store::FlatMap;
pub use value::{Array, Kind, NodeId, Number, Record, Value};

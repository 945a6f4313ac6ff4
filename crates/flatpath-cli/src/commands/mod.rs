//! Command implementations for the flatpath CLI tool
//!
//! This module contains the implementation of all CLI commands, organized by functionality.

pub mod flatten;
pub mod get;

pub use flatten::{cmd_flatten, cmd_keys};
pub use get::cmd_get;

//! Command-line interface definitions for the flatpath CLI tool
//!
//! This module contains all the clap-related structures for argument parsing
//! and command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use flatpath_core::{FlattenOptions, DEFAULT_SEPARATOR};
use std::path::PathBuf;

#[derive(Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `key = value` line per entry
    #[value(name = "lines")]
    #[default]
    Lines,
    /// A single JSON object keyed by flat path
    #[value(name = "json")]
    Json,
}

#[derive(Parser)]
#[command(name = "flatpath")]
#[command(about = "Flatten nested JSON and TOML documents into dot-path entries")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Separator placed between field names in flat keys
    #[arg(long, global = true, default_value = DEFAULT_SEPARATOR)]
    pub separator: String,

    /// Keep arrays of records whole instead of splitting them into columns
    #[arg(long, global = true)]
    pub no_columns: bool,
}

impl Cli {
    /// Flattening options selected by the global flags
    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions::new()
            .with_separator(self.separator.clone())
            .with_columnize_arrays(!self.no_columns)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge documents in order and print every flat entry
    Flatten {
        /// JSON or TOML documents, later ones override earlier ones
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "lines", value_enum)]
        format: OutputFormat,
    },

    /// Print the value stored under a single flat key
    Get {
        /// Flat key (e.g., 'api.http.port')
        #[arg(value_name = "KEY")]
        key: String,

        /// JSON or TOML documents, later ones override earlier ones
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(long, default_value = "lines", value_enum)]
        format: OutputFormat,
    },

    /// List flat keys in insertion order
    Keys {
        /// JSON or TOML documents, later ones override earlier ones
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

//! CLI tool for flattening nested documents into dot-path entries
//!
//! This binary provides the `flatpath` command-line interface for merging
//! JSON and TOML documents and querying the resulting flat keys.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod error;
mod formatters;
mod loader;

use cli::{Cli, Commands};
use commands::{cmd_flatten, cmd_get, cmd_keys};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing on stderr so stdout only carries results
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = cli.flatten_options();

    match cli.command {
        Commands::Flatten {
            files,
            output,
            format,
        } => cmd_flatten(&files, &options, output.as_deref(), &format),

        Commands::Get { key, files, format } => cmd_get(&key, &files, &options, &format),

        Commands::Keys { files, output } => cmd_keys(&files, &options, output.as_deref()),
    }
}

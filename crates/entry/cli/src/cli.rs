use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Betty: a static site generator for your ancestry.
///
/// Exposes a fixed set of four subcommands and resolves the
/// configuration file lazily, per subcommand.
#[derive(Debug, Parser)]
#[command(name = "betty", version, about)]
pub struct Cli {
    /// The path to a Betty configuration file. Defaults to
    /// betty.json|yaml|yml in the current working directory.
    #[arg(short = 'c', long = "configuration", global = true)]
    pub configuration: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a static site.
    Generate,
    /// Serve a generated site.
    Serve,
    /// Clear all caches.
    ClearCaches,
    /// Explore a demonstration site.
    Demo,
}

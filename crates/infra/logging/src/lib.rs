//! Tracing subscriber initialization, and (behind the `cli` feature)
//! user-facing console output conventions shared by Betty's binaries.

use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
mod cli;

#[cfg(feature = "cli")]
pub use cli::{print_error, print_success, print_warning};

/// Verbosity requested on the command line, translated into a
/// `tracing_subscriber::EnvFilter` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    #[must_use]
    fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// Install the global tracing subscriber. Must be called exactly once,
/// as early as possible in every binary entrypoint.
///
/// Honors `RUST_LOG` if set, falling back to `verbosity` otherwise.
pub fn init(verbosity: Verbosity) -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize logging: {error}"))
}

//! Betty: a static site generator for your ancestry.
//!
//! This crate is a facade over Betty's individual crates, re-exporting
//! the pieces an embedder needs without requiring a direct dependency
//! on each one. The `cli` feature (on by default) additionally builds
//! the `betty` binary.

#[cfg(feature = "core")]
pub use betty_assets as assets;
#[cfg(feature = "core")]
pub use betty_config as config;
#[cfg(feature = "core")]
pub use betty_extension as extension;
#[cfg(feature = "core")]
pub use betty_generator as generator;
#[cfg(feature = "core")]
pub use betty_model as model;
#[cfg(feature = "core")]
pub use betty_pool as pool;
#[cfg(feature = "core")]
pub use betty_project as project;
#[cfg(feature = "core")]
pub use betty_traits as traits;

//! Extension discovery (`inventory`-based link-time registries),
//! dependency-ordered batching, and capability dispatch.

mod dispatch;
mod error;
mod extension;
mod graph;
mod registry;

pub use dispatch::ExtensionDispatcher;
pub use error::ExtensionError;
pub use extension::{discover, Extension, ExtensionFactory};
pub use registry::ExtensionRegistry;

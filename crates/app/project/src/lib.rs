//! The Betty project: configuration, the resolved extension registry, the
//! layered asset repository, the per-run job context, and the bootstrap/
//! shutdown lifecycle tying them together.

mod job;
mod lifecycle;
mod project;
mod temporary;

pub use job::{JobContext, MemoryCache};
pub use lifecycle::{Lifecycle, LifecycleError};
pub use project::{load, Project};
pub use temporary::temporary_project;

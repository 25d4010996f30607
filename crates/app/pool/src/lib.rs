//! A two-level worker pool: OS threads, each running a concurrent batch
//! of async generation tasks, draining a shared queue.

mod pool;

pub use pool::{Task, WorkerPool};

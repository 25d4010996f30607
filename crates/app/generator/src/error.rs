use std::path::PathBuf;

/// A failure raised while running the generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("failed to prepare the output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("extension dispatch failed: {source}")]
    ExtensionDispatch {
        #[source]
        source: anyhow::Error,
    },

    #[error("a delegated generation task failed: {source}")]
    Task {
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to normalize permissions under {path}: {source}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

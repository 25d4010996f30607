use std::path::PathBuf;

/// Failures accessing the asset repository's overlaid filesystem.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("not found in any of the asset repository's search paths, tried: {tried:?}")]
    NotFound { tried: Vec<PathBuf> },

    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

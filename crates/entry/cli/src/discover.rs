use std::path::{Path, PathBuf};

use crate::error::UserFacingError;

const CANDIDATE_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Resolve the configuration file to load: `explicit` if given, otherwise
/// the first of `betty.json`, `betty.yaml`, `betty.yml` that exists in
/// `working_directory`.
pub fn discover_configuration_file(
    working_directory: &Path,
    explicit: Option<PathBuf>,
) -> Result<PathBuf, anyhow::Error> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(UserFacingError::new(format!(
                "Configuration file \"{}\" does not exist.",
                path.display()
            ))
            .into());
        }
        return Ok(path);
    }

    for extension in CANDIDATE_EXTENSIONS {
        let candidate = working_directory.join(format!("betty.{extension}"));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(UserFacingError::new(format!(
        "No configuration file was found in \"{}\". Expected betty.json, betty.yaml or betty.yml, or pass --configuration.",
        working_directory.display()
    ))
    .into())
}

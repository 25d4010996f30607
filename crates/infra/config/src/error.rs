use std::fmt;

/// A single validation failure, anchored to the dotted path of the value
/// that caused it, e.g. `extensions.betty-maps.enabled`.
#[derive(Debug, Clone)]
pub struct ConfigurationError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// One or more [`ConfigurationError`]s collected during a single load
/// pass. A load either fully succeeds or reports everything wrong with
/// it at once, rather than failing fast on the first bad field.
#[derive(Debug)]
pub struct ConfigurationLoadError {
    pub errors: Vec<ConfigurationError>,
}

impl fmt::Display for ConfigurationLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} configuration error(s) found:", self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "- {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigurationLoadError {}

/// The configuration file's contents could not even be parsed as JSON or
/// YAML, or its extension is not one Betty recognizes.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationFormatError {
    #[error("{path} does not have a file extension Betty recognizes as configuration (expected one of .json, .yaml, .yml)")]
    UnknownExtension { path: String },

    #[error("{path} could not be parsed as {format}: {source}")]
    Parse {
        path: String,
        format: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

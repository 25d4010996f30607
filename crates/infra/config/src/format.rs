use std::path::Path;

use betty_model::Value;

use crate::error::ConfigurationFormatError;

/// The serialization formats Betty recognizes for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Infer the format from a configuration file's extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigurationFormatError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("yaml" | "yml") => Ok(Format::Yaml),
            _ => Err(ConfigurationFormatError::UnknownExtension {
                path: path.display().to_string(),
            }),
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

/// Parse `contents` in the given `format` into Betty's configuration tree.
pub fn parse(contents: &str, format: Format, path: &Path) -> Result<Value, ConfigurationFormatError> {
    match format {
        Format::Json => serde_json::from_str::<serde_json::Value>(contents)
            .map(Value::from)
            .map_err(|source| ConfigurationFormatError::Parse {
                path: path.display().to_string(),
                format: "JSON",
                source: source.into(),
            }),
        Format::Yaml => serde_yaml::from_str::<serde_yaml::Value>(contents)
            .map(Value::from)
            .map_err(|source| ConfigurationFormatError::Parse {
                path: path.display().to_string(),
                format: "YAML",
                source: source.into(),
            }),
    }
}

/// Serialize `value` in the given `format`.
pub fn dump(value: Value, format: Format) -> Result<String, anyhow::Error> {
    match format {
        Format::Json => {
            let json: serde_json::Value = value.into();
            Ok(serde_json::to_string_pretty(&json)?)
        }
        Format::Yaml => {
            let yaml: serde_yaml::Value = value.into();
            Ok(serde_yaml::to_string(&yaml)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_json() {
        assert_eq!(
            Format::from_path(&PathBuf::from("betty.json")).unwrap(),
            Format::Json
        );
    }

    #[test]
    fn detects_yaml_and_yml() {
        assert_eq!(
            Format::from_path(&PathBuf::from("betty.yaml")).unwrap(),
            Format::Yaml
        );
        assert_eq!(
            Format::from_path(&PathBuf::from("betty.yml")).unwrap(),
            Format::Yaml
        );
    }

    #[test]
    fn rejects_unknown_extension() {
        assert!(Format::from_path(&PathBuf::from("betty.toml")).is_err());
    }

    #[test]
    fn json_round_trips_through_parse_and_dump() {
        let value = parse(r#"{"a": 1}"#, Format::Json, &PathBuf::from("betty.json")).unwrap();
        let dumped = dump(value, Format::Json).unwrap();
        assert!(dumped.contains('1'));
    }
}

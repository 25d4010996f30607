use betty_model::Value;
use indexmap::IndexMap;

use crate::loader::Loader;

/// A project's configuration for a single extension: whether it is
/// enabled, and any extension-specific settings nested beneath it.
#[derive(Debug, Clone)]
pub struct ExtensionConfiguration {
    enabled: bool,
    configuration: Value,
}

impl ExtensionConfiguration {
    #[must_use]
    pub fn new(enabled: bool, configuration: Value) -> Self {
        Self {
            enabled,
            configuration,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn configuration(&self) -> &Value {
        &self.configuration
    }

    pub fn load(loader: &mut Loader, value: &Value) -> Option<Self> {
        let record = loader.assert_record(value)?.clone();
        let enabled = loader
            .optional_field(&record, "enabled", Loader::assert_bool)?
            .unwrap_or(true);
        let configuration = record.get("configuration").cloned().unwrap_or(Value::Void);
        Some(Self::new(enabled, configuration))
    }

    #[must_use]
    pub fn dump(&self) -> Value {
        let mut record = IndexMap::new();
        if !self.enabled {
            record.insert("enabled".to_string(), Value::Bool(false));
        }
        if !self.configuration.is_void() {
            record.insert("configuration".to_string(), self.configuration.clone());
        }
        if record.is_empty() {
            Value::Void
        } else {
            Value::Mapping(record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_enabled_when_absent() {
        let mut loader = Loader::new();
        let loaded = ExtensionConfiguration::load(&mut loader, &Value::mapping()).unwrap();
        assert!(loaded.is_enabled());
    }

    #[test]
    fn dump_omits_enabled_true() {
        let configuration = ExtensionConfiguration::new(true, Value::Void);
        assert_eq!(configuration.dump(), Value::Void);
    }
}

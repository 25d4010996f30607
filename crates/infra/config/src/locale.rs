use betty_model::Value;
use indexmap::IndexMap;

use crate::loader::Loader;

/// A single locale a project is generated in, together with the path
/// segment ("alias") used for that locale in multilingual URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfiguration {
    locale: String,
    alias: String,
}

impl LocaleConfiguration {
    /// Create a configuration for `locale`, using `locale` itself as the
    /// alias unless `alias` is given.
    #[must_use]
    pub fn new(locale: impl Into<String>, alias: Option<String>) -> Self {
        let locale = locale.into();
        let alias = alias.unwrap_or_else(|| locale.clone());
        Self { locale, alias }
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Load a single `locale: { alias? }` entry from the `locales` mapping;
    /// a locale with no further configuration may be mapped to `null`.
    pub fn load_entry(loader: &mut Loader, locale: &str, value: &Value) -> Option<Self> {
        if value.is_void() {
            return Some(Self::new(locale, None));
        }
        let record = loader.assert_record(value)?.clone();
        let alias = loader.optional_field(&record, "alias", |loader, value| {
            let alias = loader.assert_identifier(value)?;
            if alias.contains('/') {
                loader.error("The alias must not contain slashes.");
                return None;
            }
            Some(alias)
        })?;
        Some(Self::new(locale, alias))
    }

    /// Dump this locale's configuration, excluding the locale itself — the
    /// key under which this sits in the `locales` mapping.
    #[must_use]
    pub fn dump_entry(&self) -> Value {
        if self.alias == self.locale {
            return Value::Void;
        }
        let mut record = IndexMap::new();
        record.insert("alias".to_string(), Value::string(self.alias.clone()));
        Value::Mapping(record)
    }
}

/// The ordered collection of locales a project generates, with one marked
/// as the default (used when a visitor's browser has no better match).
#[derive(Debug, Clone)]
pub struct LocaleConfigurationMapping {
    locales: IndexMap<String, LocaleConfiguration>,
    default: String,
}

impl Default for LocaleConfigurationMapping {
    fn default() -> Self {
        let default = LocaleConfiguration::new("en-US", None);
        let mut locales = IndexMap::new();
        locales.insert(default.locale().to_string(), default.clone());
        Self {
            default: default.locale().to_string(),
            locales,
        }
    }
}

impl LocaleConfigurationMapping {
    /// Whether this project generates more than one locale.
    #[must_use]
    pub fn is_multilingual(&self) -> bool {
        self.locales.len() > 1
    }

    #[must_use]
    pub fn default(&self) -> &LocaleConfiguration {
        self.locales
            .get(&self.default)
            .expect("the default locale is always present")
    }

    /// Change the default locale. `locale` must already be configured.
    pub fn set_default(&mut self, locale: &str) -> Result<(), anyhow::Error> {
        if !self.locales.contains_key(locale) {
            anyhow::bail!("{locale} is not a configured locale");
        }
        self.default = locale.to_string();
        Ok(())
    }

    pub fn insert(&mut self, configuration: LocaleConfiguration) {
        if self.locales.is_empty() {
            self.default = configuration.locale().to_string();
        }
        self.locales
            .insert(configuration.locale().to_string(), configuration);
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &LocaleConfiguration> {
        self.locales.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    pub fn load(loader: &mut Loader, value: &Value) -> Option<Self> {
        let items = loader.assert_mapping(value, LocaleConfiguration::load_entry)?;
        if items.is_empty() {
            loader.error("At least one locale must be configured.");
            return None;
        }
        let mut mapping = Self {
            locales: IndexMap::new(),
            default: String::new(),
        };
        for (_, item) in items {
            mapping.insert(item);
        }
        Some(mapping)
    }

    #[must_use]
    pub fn dump(&self) -> Value {
        let record = self
            .locales
            .values()
            .map(|configuration| (configuration.locale().to_string(), configuration.dump_entry()))
            .collect();
        Value::Mapping(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mapping_has_one_locale() {
        let mapping = LocaleConfigurationMapping::default();
        assert!(!mapping.is_multilingual());
        assert_eq!(mapping.default().locale(), "en-US");
    }

    #[test]
    fn inserting_a_second_locale_makes_it_multilingual() {
        let mut mapping = LocaleConfigurationMapping::default();
        mapping.insert(LocaleConfiguration::new("nl-NL", None));
        assert!(mapping.is_multilingual());
    }

    #[test]
    fn alias_defaults_to_locale() {
        let configuration = LocaleConfiguration::new("nl-NL", None);
        assert_eq!(configuration.alias(), "nl-NL");
    }

    #[test]
    fn load_rejects_empty_mapping() {
        let mut loader = Loader::new();
        let result = LocaleConfigurationMapping::load(&mut loader, &Value::mapping());
        assert!(result.is_none());
        assert!(loader.has_errors());
    }

    #[test]
    fn load_reads_locales_as_a_mapping_keyed_by_locale() {
        let mut loader = Loader::new();
        let mut record = IndexMap::new();
        record.insert("en-US".to_string(), Value::Void);
        let mut nl_record = IndexMap::new();
        nl_record.insert("alias".to_string(), Value::string("nl"));
        record.insert("nl-NL".to_string(), Value::Mapping(nl_record));
        let mapping = LocaleConfigurationMapping::load(&mut loader, &Value::Mapping(record)).unwrap();
        assert!(!loader.has_errors());
        assert!(mapping.is_multilingual());
        assert_eq!(
            mapping.iter().find(|locale| locale.locale() == "nl-NL").unwrap().alias(),
            "nl"
        );
    }

    #[test]
    fn dump_omits_alias_when_it_matches_the_locale() {
        let mapping = LocaleConfigurationMapping::default();
        let dumped = mapping.dump();
        let record = dumped.as_mapping().unwrap();
        assert_eq!(record.get("en-US"), Some(&Value::Void));
    }
}

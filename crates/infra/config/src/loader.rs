use std::path::PathBuf;
use std::sync::LazyLock;

use betty_model::Value;
use indexmap::IndexMap;
use regex::Regex;

use crate::error::{ConfigurationError, ConfigurationLoadError};

static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("identifier pattern is valid"));

/// A two-phase validator: assertions record errors against the current
/// path and, if met, schedule a "committer" closure; closures only run once
/// [`Loader::commit`] confirms the *entire* pass produced zero errors.
///
/// This prevents a configuration object from ending up partially updated
/// when only one of its several fields turned out to be invalid.
#[derive(Default)]
pub struct Loader {
    errors: Vec<ConfigurationError>,
    path: Vec<String>,
    committers: Vec<Box<dyn FnOnce()>>,
}

impl Loader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn current_path(&self) -> String {
        self.path.join(".")
    }

    /// Record a validation failure against the current path.
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(ConfigurationError {
            path: self.current_path(),
            message: message.into(),
        });
    }

    /// Push `segment` onto the path for the duration of `f`.
    pub fn context<R>(&mut self, segment: impl Into<String>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(segment.into());
        let result = f(self);
        self.path.pop();
        result
    }

    /// Schedule `committer` to run only if the whole load pass succeeds.
    pub fn on_commit(&mut self, committer: impl FnOnce() + 'static) {
        self.committers.push(Box::new(committer));
    }

    /// Whether any assertion has failed so far.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Finish the load pass: if it produced no errors, run every scheduled
    /// committer in order and return `Ok(())`; otherwise, run none of them
    /// and return every error collected.
    pub fn commit(self) -> Result<(), ConfigurationLoadError> {
        if self.errors.is_empty() {
            for committer in self.committers {
                committer();
            }
            Ok(())
        } else {
            Err(ConfigurationLoadError {
                errors: self.errors,
            })
        }
    }

    pub fn assert_bool(&mut self, value: &Value) -> Option<bool> {
        match value.as_bool() {
            Some(b) => Some(b),
            None => {
                self.error("This must be a boolean.");
                None
            }
        }
    }

    pub fn assert_int(&mut self, value: &Value) -> Option<i64> {
        match value.as_int() {
            Some(i) => Some(i),
            None => {
                self.error("This must be a whole number.");
                None
            }
        }
    }

    pub fn assert_float(&mut self, value: &Value) -> Option<f64> {
        match value.as_float() {
            Some(f) => Some(f),
            None => {
                self.error("This must be a number.");
                None
            }
        }
    }

    pub fn assert_positive_number(&mut self, value: &Value) -> Option<f64> {
        let number = self.assert_float(value)?;
        if number > 0.0 {
            Some(number)
        } else {
            self.error("This must be a positive number.");
            None
        }
    }

    pub fn assert_str(&mut self, value: &Value) -> Option<String> {
        match value.as_str() {
            Some(s) => Some(s.to_owned()),
            None => {
                self.error("This must be a string.");
                None
            }
        }
    }

    /// Assert `value` is a string containing nothing but letters, digits,
    /// `-` and `_`. Used for locale aliases and extension/entity type
    /// machine names.
    pub fn assert_identifier(&mut self, value: &Value) -> Option<String> {
        let string = self.assert_str(value)?;
        if !IDENTIFIER_PATTERN.is_match(&string) {
            self.error("This must not be empty and must consist of letters, digits, - and _ only.");
            return None;
        }
        Some(string)
    }

    pub fn assert_sequence<T>(
        &mut self,
        value: &Value,
        mut item: impl FnMut(&mut Self, &Value) -> Option<T>,
    ) -> Option<Vec<T>> {
        let Some(items) = value.as_sequence() else {
            self.error("This must be a sequence.");
            return None;
        };
        let mut result = Vec::with_capacity(items.len());
        let mut ok = true;
        for (index, item_value) in items.iter().enumerate() {
            let loaded = self.context(index.to_string(), |loader| item(loader, item_value));
            match loaded {
                Some(loaded) => result.push(loaded),
                None => ok = false,
            }
        }
        ok.then_some(result)
    }

    pub fn assert_mapping<T>(
        &mut self,
        value: &Value,
        mut item: impl FnMut(&mut Self, &str, &Value) -> Option<T>,
    ) -> Option<IndexMap<String, T>> {
        let record = self.assert_record(value)?;
        let mut result = IndexMap::with_capacity(record.len());
        let mut ok = true;
        for (key, key_value) in record {
            let (key, key_value) = (key.clone(), key_value.clone());
            let loaded = self.context(key.clone(), |loader| item(loader, &key, &key_value));
            match loaded {
                Some(loaded) => {
                    result.insert(key, loaded);
                }
                None => ok = false,
            }
        }
        ok.then_some(result)
    }

    pub fn assert_record<'v>(&mut self, value: &'v Value) -> Option<&'v IndexMap<String, Value>> {
        match value.as_mapping() {
            Some(mapping) => Some(mapping),
            None => {
                self.error("This must be a key-value mapping.");
                None
            }
        }
    }

    /// Read a required key from a record, asserting it with `assert`.
    pub fn required_field<T>(
        &mut self,
        record: &IndexMap<String, Value>,
        key: &str,
        assert: impl FnOnce(&mut Self, &Value) -> Option<T>,
    ) -> Option<T> {
        match record.get(key) {
            Some(value) => self.context(key, |loader| assert(loader, value)),
            None => {
                self.context(key, |loader| loader.error("This field is required."));
                None
            }
        }
    }

    /// Read an optional key from a record. Returns `Some(None)` when the
    /// key is absent (not an error), `Some(Some(_))` when present and
    /// valid, and `None` when present but invalid.
    pub fn optional_field<T>(
        &mut self,
        record: &IndexMap<String, Value>,
        key: &str,
        assert: impl FnOnce(&mut Self, &Value) -> Option<T>,
    ) -> Option<Option<T>> {
        match record.get(key) {
            Some(value) => self
                .context(key, |loader| assert(loader, value))
                .map(Some),
            None => Some(None),
        }
    }

    pub fn assert_path(&mut self, value: &Value) -> Option<PathBuf> {
        self.assert_str(value).map(PathBuf::from)
    }

    pub fn assert_directory_path(&mut self, value: &Value) -> Option<PathBuf> {
        let path = self.assert_path(value)?;
        if path.is_dir() {
            Some(path)
        } else {
            self.error(format!("{} is not a directory.", path.display()));
            None
        }
    }
}

use betty_model::Value;
use indexmap::IndexMap;

use crate::loader::Loader;

/// A project's configuration for a single entity type: whether an
/// HTML listing page is generated for all entities of that type.
#[derive(Debug, Clone, Copy)]
pub struct EntityTypeConfiguration {
    generate_html_list: bool,
}

impl EntityTypeConfiguration {
    #[must_use]
    pub fn new(generate_html_list: bool) -> Self {
        Self { generate_html_list }
    }

    #[must_use]
    pub fn generate_html_list(&self) -> bool {
        self.generate_html_list
    }

    pub fn load(loader: &mut Loader, value: &Value) -> Option<Self> {
        let record = loader.assert_record(value)?.clone();
        let generate_html_list = loader
            .optional_field(&record, "generate_html_list", Loader::assert_bool)?
            .unwrap_or(false);
        Some(Self::new(generate_html_list))
    }

    #[must_use]
    pub fn dump(&self) -> Value {
        if self.generate_html_list {
            let mut record = IndexMap::new();
            record.insert("generate_html_list".to_string(), Value::Bool(true));
            Value::Mapping(record)
        } else {
            Value::Void
        }
    }
}

impl Default for EntityTypeConfiguration {
    fn default() -> Self {
        Self::new(false)
    }
}

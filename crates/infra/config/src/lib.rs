//! Betty's configuration layer: a two-phase assert/commit [`Loader`], the
//! JSON/YAML wire [`format`], and the [`ProjectConfiguration`] tree it
//! produces.

mod entity_type;
mod error;
mod extension;
pub mod format;
mod loader;
mod locale;
mod project;

pub use entity_type::EntityTypeConfiguration;
pub use error::{ConfigurationError, ConfigurationFormatError, ConfigurationLoadError};
pub use extension::ExtensionConfiguration;
pub use loader::Loader;
pub use locale::{LocaleConfiguration, LocaleConfigurationMapping};
pub use project::{ProjectConfiguration, DEFAULT_LIFETIME_THRESHOLD};

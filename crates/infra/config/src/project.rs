use std::path::{Path, PathBuf};

use betty_model::{minimize_preserving_containers, Value};
use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use url::Url;

use crate::entity_type::EntityTypeConfiguration;
use crate::error::ConfigurationLoadError;
use crate::extension::ExtensionConfiguration;
use crate::format::{self, Format};
use crate::loader::Loader;
use crate::locale::LocaleConfigurationMapping;

/// How long, in years, a person must be assumed dead to be treated as a
/// public figure rather than a private one.
pub const DEFAULT_LIFETIME_THRESHOLD: u32 = 125;

/// A fully validated project configuration: everything Betty needs to know
/// to generate a site, loaded from (and dumpable back to) a JSON or YAML
/// file.
#[derive(Debug, Clone)]
pub struct ProjectConfiguration {
    configuration_file_path: PathBuf,
    name: String,
    base_url: Url,
    root_path: String,
    clean_urls: bool,
    author: Option<String>,
    lifetime_threshold: u32,
    locales: LocaleConfigurationMapping,
    entity_types: IndexMap<String, EntityTypeConfiguration>,
    extensions: IndexMap<String, ExtensionConfiguration>,
    debug: bool,
    assets_directory_path: Option<PathBuf>,
}

impl ProjectConfiguration {
    /// Create a new configuration for the project rooted at
    /// `configuration_file_path`'s parent directory.
    pub fn new(configuration_file_path: impl Into<PathBuf>, base_url: &str) -> Result<Self, anyhow::Error> {
        let configuration_file_path = configuration_file_path.into();
        let name = default_name(&configuration_file_path);
        let (base_url, root_path) = validate_base_url(base_url)?;
        Ok(Self {
            base_url,
            name,
            root_path,
            clean_urls: false,
            author: None,
            lifetime_threshold: DEFAULT_LIFETIME_THRESHOLD,
            locales: LocaleConfigurationMapping::default(),
            entity_types: IndexMap::new(),
            extensions: IndexMap::new(),
            debug: false,
            assets_directory_path: None,
            configuration_file_path,
        })
    }

    #[must_use]
    pub fn configuration_file_path(&self) -> &Path {
        &self.configuration_file_path
    }

    /// The directory containing the configuration file: the project's root.
    #[must_use]
    pub fn project_directory_path(&self) -> &Path {
        self.configuration_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
    }

    #[must_use]
    pub fn output_directory_path(&self) -> PathBuf {
        self.project_directory_path().join("output")
    }

    #[must_use]
    pub fn www_directory_path(&self) -> PathBuf {
        self.output_directory_path().join("www")
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: &str) -> Result<(), anyhow::Error> {
        let (base_url, url_root_path) = validate_base_url(base_url)?;
        self.base_url = base_url;
        self.root_path = join_root_path(&url_root_path, &self.root_path);
        Ok(())
    }

    #[must_use]
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn set_root_path(&mut self, root_path: &str) {
        self.root_path = root_path.trim_matches('/').to_string();
    }

    #[must_use]
    pub fn clean_urls(&self) -> bool {
        self.clean_urls
    }

    pub fn set_clean_urls(&mut self, clean_urls: bool) {
        self.clean_urls = clean_urls;
    }

    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn set_author(&mut self, author: Option<String>) {
        self.author = author;
    }

    #[must_use]
    pub fn lifetime_threshold(&self) -> u32 {
        self.lifetime_threshold
    }

    pub fn set_lifetime_threshold(&mut self, lifetime_threshold: u32) -> Result<(), anyhow::Error> {
        if lifetime_threshold == 0 {
            anyhow::bail!("The lifetime threshold must be a positive number.");
        }
        self.lifetime_threshold = lifetime_threshold;
        Ok(())
    }

    #[must_use]
    pub fn locales(&self) -> &LocaleConfigurationMapping {
        &self.locales
    }

    #[must_use]
    pub fn locales_mut(&mut self) -> &mut LocaleConfigurationMapping {
        &mut self.locales
    }

    #[must_use]
    pub fn entity_types(&self) -> &IndexMap<String, EntityTypeConfiguration> {
        &self.entity_types
    }

    #[must_use]
    pub fn entity_types_mut(&mut self) -> &mut IndexMap<String, EntityTypeConfiguration> {
        &mut self.entity_types
    }

    #[must_use]
    pub fn extensions(&self) -> &IndexMap<String, ExtensionConfiguration> {
        &self.extensions
    }

    #[must_use]
    pub fn extensions_mut(&mut self) -> &mut IndexMap<String, ExtensionConfiguration> {
        &mut self.extensions
    }

    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    #[must_use]
    pub fn assets_directory_path(&self) -> Option<&Path> {
        self.assets_directory_path.as_deref()
    }

    pub fn set_assets_directory_path(&mut self, path: Option<PathBuf>) {
        self.assets_directory_path = path;
    }

    /// Load and validate a configuration from a parsed configuration tree.
    pub fn load(
        loader: &mut Loader,
        value: &Value,
        configuration_file_path: PathBuf,
    ) -> Option<Self> {
        let record = loader.assert_record(value)?.clone();

        let (base_url, url_root_path) = loader.required_field(&record, "base_url", |loader, value| {
            let raw = loader.assert_str(value)?;
            match validate_base_url(&raw) {
                Ok(parsed) => Some(parsed),
                Err(error) => {
                    loader.error(error.to_string());
                    None
                }
            }
        })?;

        let name = loader
            .optional_field(&record, "name", Loader::assert_str)?
            .unwrap_or_else(|| default_name(&configuration_file_path));

        let configured_root_path = loader
            .optional_field(&record, "root_path", Loader::assert_str)?
            .map(|raw| raw.trim_matches('/').to_string())
            .unwrap_or_default();
        let root_path = join_root_path(&url_root_path, &configured_root_path);

        let clean_urls = loader
            .optional_field(&record, "clean_urls", Loader::assert_bool)?
            .unwrap_or(false);

        let author = loader.optional_field(&record, "author", Loader::assert_str)?;

        let lifetime_threshold = loader
            .optional_field(&record, "lifetime_threshold", |loader, value| {
                loader.assert_positive_number(value).map(|n| n as u32)
            })?
            .unwrap_or(DEFAULT_LIFETIME_THRESHOLD);

        let locales = loader
            .optional_field(&record, "locales", LocaleConfigurationMapping::load)?
            .unwrap_or_default();

        let entity_types = loader
            .optional_field(&record, "entity_types", |loader, value| {
                loader.assert_mapping(value, |loader, _key, value| {
                    EntityTypeConfiguration::load(loader, value)
                })
            })?
            .unwrap_or_default();

        let extensions = loader
            .optional_field(&record, "extensions", |loader, value| {
                loader.assert_mapping(value, |loader, _key, value| {
                    ExtensionConfiguration::load(loader, value)
                })
            })?
            .unwrap_or_default();

        let debug = loader
            .optional_field(&record, "debug", Loader::assert_bool)?
            .unwrap_or(false);

        let assets_directory_path = loader.optional_field(
            &record,
            "assets_directory_path",
            Loader::assert_directory_path,
        )?;

        Some(Self {
            configuration_file_path,
            name,
            base_url,
            root_path,
            clean_urls,
            author,
            lifetime_threshold,
            locales,
            entity_types,
            extensions,
            debug,
            assets_directory_path,
        })
    }

    #[must_use]
    pub fn dump(&self) -> Value {
        let mut record = IndexMap::new();
        record.insert("base_url".to_string(), Value::string(self.base_url.to_string()));
        record.insert("name".to_string(), Value::string(self.name.clone()));
        if !self.root_path.is_empty() {
            record.insert("root_path".to_string(), Value::string(self.root_path.clone()));
        }
        if self.clean_urls {
            record.insert("clean_urls".to_string(), Value::Bool(true));
        }
        if let Some(author) = &self.author {
            record.insert("author".to_string(), Value::string(author.clone()));
        }
        if self.lifetime_threshold != DEFAULT_LIFETIME_THRESHOLD {
            record.insert(
                "lifetime_threshold".to_string(),
                Value::Int(i64::from(self.lifetime_threshold)),
            );
        }
        record.insert("locales".to_string(), self.locales.dump());
        record.insert(
            "entity_types".to_string(),
            Value::Mapping(
                self.entity_types
                    .iter()
                    .map(|(k, v)| (k.clone(), v.dump()))
                    .collect(),
            ),
        );
        record.insert(
            "extensions".to_string(),
            Value::Mapping(
                self.extensions
                    .iter()
                    .map(|(k, v)| (k.clone(), v.dump()))
                    .collect(),
            ),
        );
        if self.debug {
            record.insert("debug".to_string(), Value::Bool(true));
        }
        if let Some(path) = &self.assets_directory_path {
            record.insert(
                "assets_directory_path".to_string(),
                Value::string(path.display().to_string()),
            );
        }
        minimize_preserving_containers(Value::Mapping(record))
    }

    /// Read and validate a configuration file from disk.
    pub fn read_file(path: &Path) -> Result<Self, anyhow::Error> {
        let format = Format::from_path(path)?;
        let contents = std::fs::read_to_string(path)
            .map_err(|source| anyhow::anyhow!("could not read {}: {source}", path.display()))?;
        let value = format::parse(&contents, format, path)?;
        let mut loader = Loader::new();
        let loaded = Self::load(&mut loader, &value, path.to_path_buf());
        loader.commit().map_err(ConfigurationLoadError::into_anyhow)?;
        loaded.ok_or_else(|| anyhow::anyhow!("failed to load configuration from {}", path.display()))
    }

    /// Write this configuration back to its own `configuration_file_path`.
    pub fn write_file(&self) -> Result<(), anyhow::Error> {
        let format = Format::from_path(&self.configuration_file_path)?;
        let contents = format::dump(self.dump(), format)?;
        std::fs::write(&self.configuration_file_path, contents)?;
        Ok(())
    }
}

impl ConfigurationLoadError {
    fn into_anyhow(self) -> anyhow::Error {
        anyhow::anyhow!("{self}")
    }
}

/// Validate `raw` as a `base_url`: scheme must be `http`/`https`, a host
/// must be present. Any path component is stripped from the returned URL
/// and returned separately, trimmed of leading/trailing slashes, for the
/// caller to fold into `root_path`.
fn validate_base_url(raw: &str) -> Result<(Url, String), anyhow::Error> {
    let mut url = Url::parse(raw).map_err(|source| anyhow::anyhow!("{raw} is not a valid URL: {source}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("{raw} must use the http or https scheme.");
    }
    if url.host_str().is_none() {
        anyhow::bail!("{raw} must include a host name.");
    }
    let path = url.path().trim_matches('/').to_string();
    url.set_path("/");
    Ok((url, path))
}

/// Join a `base_url`'s own trailing path with an explicitly configured
/// `root_path`, the former taking precedence as the outermost segment.
fn join_root_path(url_root_path: &str, configured_root_path: &str) -> String {
    match (url_root_path.is_empty(), configured_root_path.is_empty()) {
        (true, _) => configured_root_path.to_string(),
        (false, true) => url_root_path.to_string(),
        (false, false) => format!("{url_root_path}/{configured_root_path}"),
    }
}

/// Derive a stable, filesystem- and URL-safe default project name from its
/// configuration file path, so a project never ends up nameless.
fn default_name(configuration_file_path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(configuration_file_path.display().to_string().as_bytes());
    hex::encode(hasher.finalize())[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_non_http_scheme() {
        let result = ProjectConfiguration::new("/tmp/betty.json", "ftp://example.com");
        assert!(result.is_err());
    }

    #[test]
    fn new_accepts_https() {
        let configuration =
            ProjectConfiguration::new("/tmp/betty.json", "https://example.com").unwrap();
        assert_eq!(configuration.base_url().as_str(), "https://example.com/");
    }

    #[test]
    fn default_name_is_deterministic() {
        let a = default_name(Path::new("/tmp/betty.json"));
        let b = default_name(Path::new("/tmp/betty.json"));
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn set_root_path_strips_slashes() {
        let mut configuration =
            ProjectConfiguration::new("/tmp/betty.json", "https://example.com").unwrap();
        configuration.set_root_path("/my-site/");
        assert_eq!(configuration.root_path(), "my-site");
    }

    #[test]
    fn new_moves_a_base_url_path_into_root_path() {
        let configuration =
            ProjectConfiguration::new("/tmp/betty.json", "https://example.com/my-site/").unwrap();
        assert_eq!(configuration.base_url().as_str(), "https://example.com/");
        assert_eq!(configuration.root_path(), "my-site");
    }

    #[test]
    fn set_base_url_path_is_prepended_to_an_existing_root_path() {
        let mut configuration =
            ProjectConfiguration::new("/tmp/betty.json", "https://example.com").unwrap();
        configuration.set_root_path("site");
        configuration.set_base_url("https://example.com/sub").unwrap();
        assert_eq!(configuration.root_path(), "sub/site");
    }

    #[test]
    fn load_requires_base_url() {
        let mut loader = Loader::new();
        let result =
            ProjectConfiguration::load(&mut loader, &Value::mapping(), PathBuf::from("betty.json"));
        assert!(result.is_none());
        assert!(loader.has_errors());
    }

    #[test]
    fn load_accepts_minimal_configuration() {
        let mut record = IndexMap::new();
        record.insert("base_url".to_string(), Value::string("https://example.com"));
        let mut loader = Loader::new();
        let configuration = ProjectConfiguration::load(
            &mut loader,
            &Value::Mapping(record),
            PathBuf::from("betty.json"),
        )
        .unwrap();
        assert!(!loader.has_errors());
        assert_eq!(configuration.lifetime_threshold(), DEFAULT_LIFETIME_THRESHOLD);
    }

    #[test]
    fn load_moves_a_base_url_path_into_root_path() {
        let mut record = IndexMap::new();
        record.insert(
            "base_url".to_string(),
            Value::string("https://example.com/my-site"),
        );
        let mut loader = Loader::new();
        let configuration = ProjectConfiguration::load(
            &mut loader,
            &Value::Mapping(record),
            PathBuf::from("betty.json"),
        )
        .unwrap();
        assert!(!loader.has_errors());
        assert_eq!(configuration.base_url().as_str(), "https://example.com/");
        assert_eq!(configuration.root_path(), "my-site");
    }

    #[test]
    fn load_prepends_a_base_url_path_to_a_configured_root_path() {
        let mut record = IndexMap::new();
        record.insert(
            "base_url".to_string(),
            Value::string("https://example.com/sub"),
        );
        record.insert("root_path".to_string(), Value::string("site"));
        let mut loader = Loader::new();
        let configuration = ProjectConfiguration::load(
            &mut loader,
            &Value::Mapping(record),
            PathBuf::from("betty.json"),
        )
        .unwrap();
        assert!(!loader.has_errors());
        assert_eq!(configuration.root_path(), "sub/site");
    }
}

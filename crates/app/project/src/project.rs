use std::path::Path;

use betty_assets::AssetRepository;
use betty_config::ProjectConfiguration;
use betty_extension::{Extension, ExtensionRegistry};
use indexmap::IndexMap;

use crate::job::JobContext;
use crate::lifecycle::Lifecycle;

/// The assembled, bootstrapped project: configuration, the extension
/// registry resolved from it, the asset repository overlaid from the
/// enabled extensions and the project's own `assets/` override, and a
/// fresh [`JobContext`] for the run.
///
/// Bootstrap order is: assemble extensions, then layer their assets,
/// then the project's own `assets/` override last.
pub struct Project {
    configuration: ProjectConfiguration,
    extensions: Option<ExtensionRegistry>,
    assets: AssetRepository,
    job_context: JobContext,
    lifecycle: Lifecycle,
}

impl Project {
    #[must_use]
    pub fn new(configuration: ProjectConfiguration) -> Self {
        Self {
            configuration,
            extensions: None,
            assets: AssetRepository::new(),
            job_context: JobContext::new(),
            lifecycle: Lifecycle::new(),
        }
    }

    #[must_use]
    pub fn configuration(&self) -> &ProjectConfiguration {
        &self.configuration
    }

    #[must_use]
    pub fn configuration_mut(&mut self) -> &mut ProjectConfiguration {
        &mut self.configuration
    }

    /// The resolved, dependency-ordered set of enabled extensions. `None`
    /// before [`Project::bootstrap`] has run.
    #[must_use]
    pub fn extensions(&self) -> Option<&ExtensionRegistry> {
        self.extensions.as_ref()
    }

    #[must_use]
    pub fn assets(&self) -> &AssetRepository {
        &self.assets
    }

    #[must_use]
    pub fn job_context(&self) -> &JobContext {
        &self.job_context
    }

    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        self.lifecycle.is_bootstrapped()
    }

    /// Assemble the extension registry and layer the asset repository.
    ///
    /// `available` is every extension type linked into the binary
    /// (typically [`betty_extension::discover`]); the project's
    /// `extensions:` configuration determines which of them end up
    /// enabled. Extension assets are layered in dependency-batch order —
    /// earlier batches first, so a later extension's same-named asset
    /// overrides an earlier one's — and the project's own
    /// `assets_directory_path`, if set, is prepended last so it always
    /// wins.
    pub fn bootstrap(&mut self, available: Vec<Box<dyn Extension>>) -> Result<(), anyhow::Error> {
        self.lifecycle.assert_not_bootstrapped()?;

        let configured: IndexMap<String, bool> = self
            .configuration
            .extensions()
            .iter()
            .map(|(name, extension_configuration)| {
                (name.clone(), extension_configuration.is_enabled())
            })
            .collect();

        let registry = ExtensionRegistry::build(available, &configured)?;

        self.assets.clear();
        for batch in registry.batches() {
            for name in batch {
                if let Some(extension) = registry.get(name) {
                    if let Some(path) = extension.assets_directory_path() {
                        self.assets.prepend(path);
                    }
                }
            }
        }
        if let Some(path) = self.configuration.assets_directory_path() {
            self.assets.prepend(path.to_path_buf());
        } else {
            let default_assets = self.configuration.project_directory_path().join("assets");
            if default_assets.is_dir() {
                self.assets.prepend(default_assets);
            }
        }

        self.extensions = Some(registry);
        self.lifecycle.mark_bootstrapped();
        tracing::info!(project = self.configuration.name(), "project bootstrapped");
        Ok(())
    }

    pub fn shutdown(&mut self) -> Result<(), anyhow::Error> {
        self.lifecycle.assert_bootstrapped()?;
        self.extensions = None;
        self.assets.clear();
        self.lifecycle.mark_shut_down();
        tracing::info!(project = self.configuration.name(), "project shut down");
        Ok(())
    }
}

/// Load a project's configuration from `configuration_file_path` and wrap
/// it, unbootstrapped.
pub fn load(configuration_file_path: &Path) -> Result<Project, anyhow::Error> {
    let configuration = ProjectConfiguration::read_file(configuration_file_path)?;
    Ok(Project::new(configuration))
}

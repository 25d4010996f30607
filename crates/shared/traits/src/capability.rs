use async_trait::async_trait;

/// An extension that contributes pages to the generated site.
///
/// Extensions register under single-method capability traits like this one,
/// discovered dynamically rather than called through one fixed interface.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Called once per generation run, after the pipeline has created the
    /// output directory and before it joins the worker pool.
    async fn generate(&self) -> Result<(), anyhow::Error>;
}

/// An extension that contributes files to the asset repository overlay.
pub trait AssetProvider: Send + Sync {
    /// The extension's own assets directory, prepended to the asset
    /// repository's search path ahead of the project's `assets/` override.
    fn assets_directory_path(&self) -> Option<std::path::PathBuf>;
}

/// An extension that contributes a stylesheet to be linked from every page.
pub trait CssProvider: Send + Sync {
    /// Path to the CSS file, relative to the extension's assets directory.
    fn css_path(&self) -> &str;
}

/// An extension that contributes a script to be linked from every page.
pub trait JsProvider: Send + Sync {
    /// Path to the JS file, relative to the extension's assets directory.
    fn js_path(&self) -> &str;
}

/// An extension that adds an entry point to the site's primary navigation.
pub trait EntryPointProvider: Send + Sync {
    /// The path, relative to the site root, this entry point links to.
    fn entry_point_path(&self) -> &str;

    /// The entry point's label.
    fn entry_point_label(&self) -> &str;
}

/// An extension that registers additional entity types to be generated.
pub trait EntityTypeProvider: Send + Sync {
    /// The machine names of the entity types this extension contributes.
    fn entity_types(&self) -> Vec<String>;
}

/// An extension that registers additional event types dispatched during
/// generation.
pub trait EventTypeProvider: Send + Sync {
    /// The machine names of the event types this extension contributes.
    fn event_types(&self) -> Vec<String>;
}

/// A themeable extension, i.e. one that may be configured as the project's
/// active theme.
pub trait Themable: Send + Sync {}

use std::path::PathBuf;

use betty_traits::{
    AssetProvider, CssProvider, EntityTypeProvider, EntryPointProvider, EventTypeProvider,
    Generator, JsProvider, Requirement, RequirementLeaf, Themable,
};

/// A unit of optional functionality that plugs into the project runtime.
///
/// An extension declares its identity and its place in the dependency
/// graph, and may additionally implement any of the single-method
/// capability traits from `betty-traits` by overriding the corresponding
/// `as_*` accessor below. This "optional downcast via an overridable
/// accessor" shape gives an explicit, statically checked opt-in, since
/// trait objects cannot be queried for arbitrary trait implementations
/// at runtime.
pub trait Extension: Send + Sync {
    /// The extension's stable, unique machine name.
    fn name(&self) -> &'static str;

    /// Extensions that must be enabled, and enabled first, for this one to
    /// be enabled.
    fn depends_on(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Extensions this one should run after, without requiring them to be
    /// enabled.
    fn comes_after(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Extensions this one should run before, without requiring them to be
    /// enabled.
    fn comes_before(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// The requirement that must be met for this extension to be enabled.
    /// The default requirement is always met; extensions needing, say, an
    /// external binary on `PATH` override this.
    fn enable_requirement(&self) -> Box<dyn Requirement> {
        Box::new(RequirementLeaf::new(
            format!("{} has no additional requirements", self.name()),
            true,
        ))
    }

    /// This extension's own assets directory, if any, prepended to the
    /// asset repository ahead of whatever comes after it in the project's
    /// extension order.
    fn assets_directory_path(&self) -> Option<PathBuf> {
        None
    }

    fn as_generator(&self) -> Option<&dyn Generator> {
        None
    }

    fn as_asset_provider(&self) -> Option<&dyn AssetProvider> {
        None
    }

    fn as_css_provider(&self) -> Option<&dyn CssProvider> {
        None
    }

    fn as_js_provider(&self) -> Option<&dyn JsProvider> {
        None
    }

    fn as_entry_point_provider(&self) -> Option<&dyn EntryPointProvider> {
        None
    }

    fn as_entity_type_provider(&self) -> Option<&dyn EntityTypeProvider> {
        None
    }

    fn as_event_type_provider(&self) -> Option<&dyn EventTypeProvider> {
        None
    }

    fn as_themable(&self) -> Option<&dyn Themable> {
        None
    }
}

/// An entry in the `inventory`-collected registry of extension
/// constructors, one per extension type linked into the binary.
///
/// Rather than discovering extensions at runtime, each extension crate
/// submits its constructor at link time with `inventory::submit!`.
pub struct ExtensionFactory {
    pub construct: fn() -> Box<dyn Extension>,
}

inventory::collect!(ExtensionFactory);

/// Construct one instance of every extension type linked into this
/// binary, in discovery order (undefined, and irrelevant: dependency
/// ordering is resolved separately by [`crate::graph`]).
#[must_use]
pub fn discover() -> Vec<Box<dyn Extension>> {
    inventory::iter::<ExtensionFactory>()
        .map(|factory| (factory.construct)())
        .collect()
}

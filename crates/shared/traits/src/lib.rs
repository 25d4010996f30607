//! Shared contracts: the [`Requirement`] predicate tree, and the
//! single-method capability traits that extensions implement a subset of.

mod capability;
mod requirement;

pub use capability::{
    AssetProvider, CssProvider, EntityTypeProvider, EntryPointProvider, EventTypeProvider,
    Generator, JsProvider, Themable,
};
pub use requirement::{AllRequirements, AnyRequirement, Requirement, RequirementLeaf};

use std::collections::HashSet;

use indexmap::IndexMap;

use betty_traits::{Requirement, RequirementLeaf};

use crate::error::ExtensionError;
use crate::extension::Extension;
use crate::graph;

/// The extensions a project has enabled, resolved into dependency-ordered
/// concurrency batches.
///
/// Holds two things: the enabled extension set, and the batched order
/// [`crate::ExtensionDispatcher`] walks to call each capability.
pub struct ExtensionRegistry {
    extensions: IndexMap<String, Box<dyn Extension>>,
    batches: Vec<Vec<String>>,
}

impl ExtensionRegistry {
    /// Resolve `available` (every extension type linked into the binary)
    /// against `configured` (the project's `extensions:` section: name to
    /// whether it is enabled) into an ordered, dependency-complete set.
    ///
    /// Expand: starting from the extensions configured enabled, transitively
    /// walk each candidate's [`Extension::depends_on`] and pull in any
    /// reached extension that was not itself configured, instantiated with
    /// its default configuration — an extension explicitly configured
    /// disabled is never added this way. Then apply a fixed-point pass that
    /// excludes any candidate whose [`Extension::enable_requirement`] is
    /// unmet, or whose dependency was excluded for any reason — excluding
    /// one extension can cascade to exclude its dependents.
    pub fn build(
        available: Vec<Box<dyn Extension>>,
        configured: &IndexMap<String, bool>,
    ) -> Result<Self, ExtensionError> {
        let mut seen = HashSet::new();
        let mut pool: IndexMap<String, Box<dyn Extension>> = IndexMap::new();
        for extension in available {
            let name = extension.name().to_string();
            if !seen.insert(name.clone()) {
                return Err(ExtensionError::DuplicateExtension(name));
            }
            pool.insert(name, extension);
        }

        let mut candidates: IndexMap<String, Box<dyn Extension>> = IndexMap::new();
        let mut queue: Vec<String> = configured
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.clone())
            .collect();

        while let Some(name) = queue.pop() {
            if candidates.contains_key(&name) {
                continue;
            }
            if configured.get(&name).copied() == Some(false) {
                continue;
            }
            let Some(extension) = pool.shift_remove(&name) else {
                continue;
            };
            if !extension.enable_requirement().is_met() {
                continue;
            }
            queue.extend(extension.depends_on().iter().map(|dependency| (*dependency).to_string()));
            candidates.insert(name, extension);
        }

        loop {
            let names: HashSet<String> = candidates.keys().cloned().collect();
            let before = candidates.len();
            candidates.retain(|_, extension| {
                extension
                    .depends_on()
                    .iter()
                    .all(|dependency| names.contains(*dependency))
            });
            if candidates.len() == before {
                break;
            }
        }

        let batches = graph::batches(&candidates)?;

        Ok(Self {
            extensions: candidates,
            batches,
        })
    }

    /// The requirement that must be met to disable `name`: no other
    /// currently enabled extension's [`Extension::depends_on`] may name it.
    #[must_use]
    pub fn disable_requirement(&self, name: &str) -> Box<dyn Requirement> {
        let dependents: Vec<String> = self
            .extensions
            .values()
            .filter(|extension| extension.name() != name && extension.depends_on().contains(&name))
            .map(|extension| extension.name().to_string())
            .collect();
        let met = dependents.is_empty();
        let requirement = RequirementLeaf::new(format!("\"{name}\" must not be depended on by another enabled extension"), met);
        Box::new(if dependents.is_empty() {
            requirement
        } else {
            requirement.with_details(format!("depended on by: {}", dependents.join(", ")))
        })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Extension> {
        self.extensions.get(name).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// The concurrency batches extensions are enabled/dispatched in, each
    /// a list of extension names safe to process in any order relative to
    /// each other, but only after every earlier batch has completed.
    #[must_use]
    pub fn batches(&self) -> &[Vec<String>] {
        &self.batches
    }

    /// Iterate extensions in a single dependency-respecting order (batches
    /// flattened), for callers that don't need concurrency.
    pub fn iter_ordered(&self) -> impl Iterator<Item = &dyn Extension> {
        self.batches
            .iter()
            .flatten()
            .filter_map(move |name| self.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use betty_traits::{AllRequirements, Requirement, RequirementLeaf};

    struct Enabled;
    impl Extension for Enabled {
        fn name(&self) -> &'static str {
            "enabled"
        }
    }

    struct Unmet;
    impl Extension for Unmet {
        fn name(&self) -> &'static str {
            "unmet"
        }

        fn enable_requirement(&self) -> Box<dyn Requirement> {
            Box::new(RequirementLeaf::new("never met", false))
        }
    }

    struct DependsOnUnmet;
    impl Extension for DependsOnUnmet {
        fn name(&self) -> &'static str {
            "depends-on-unmet"
        }

        fn depends_on(&self) -> Vec<&'static str> {
            vec!["unmet"]
        }
    }

    struct Helper;
    impl Extension for Helper {
        fn name(&self) -> &'static str {
            "helper"
        }
    }

    struct DependsOnHelper;
    impl Extension for DependsOnHelper {
        fn name(&self) -> &'static str {
            "depends-on-helper"
        }

        fn depends_on(&self) -> Vec<&'static str> {
            vec!["helper"]
        }
    }

    #[test]
    fn unconfigured_extensions_are_excluded() {
        let available: Vec<Box<dyn Extension>> = vec![Box::new(Enabled)];
        let configured = IndexMap::new();
        let registry = ExtensionRegistry::build(available, &configured).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn configured_and_met_extensions_are_included() {
        let available: Vec<Box<dyn Extension>> = vec![Box::new(Enabled)];
        let mut configured = IndexMap::new();
        configured.insert("enabled".to_string(), true);
        let registry = ExtensionRegistry::build(available, &configured).unwrap();
        assert!(registry.contains("enabled"));
    }

    #[test]
    fn unmet_requirement_excludes_even_if_configured_enabled() {
        let available: Vec<Box<dyn Extension>> = vec![Box::new(Unmet)];
        let mut configured = IndexMap::new();
        configured.insert("unmet".to_string(), true);
        let registry = ExtensionRegistry::build(available, &configured).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn excluding_a_dependency_cascades_to_its_dependents() {
        let available: Vec<Box<dyn Extension>> = vec![Box::new(Unmet), Box::new(DependsOnUnmet)];
        let mut configured = IndexMap::new();
        configured.insert("unmet".to_string(), true);
        configured.insert("depends-on-unmet".to_string(), true);
        let registry = ExtensionRegistry::build(available, &configured).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn an_unconfigured_dependency_is_expanded_in_with_default_configuration() {
        let available: Vec<Box<dyn Extension>> = vec![Box::new(Helper), Box::new(DependsOnHelper)];
        let mut configured = IndexMap::new();
        configured.insert("depends-on-helper".to_string(), true);
        let registry = ExtensionRegistry::build(available, &configured).unwrap();
        assert!(registry.contains("depends-on-helper"));
        assert!(registry.contains("helper"));
    }

    #[test]
    fn a_dependency_explicitly_configured_disabled_is_not_expanded_in() {
        let available: Vec<Box<dyn Extension>> = vec![Box::new(Helper), Box::new(DependsOnHelper)];
        let mut configured = IndexMap::new();
        configured.insert("depends-on-helper".to_string(), true);
        configured.insert("helper".to_string(), false);
        let registry = ExtensionRegistry::build(available, &configured).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn disable_requirement_is_unmet_while_an_enabled_extension_depends_on_it() {
        let available: Vec<Box<dyn Extension>> = vec![Box::new(Helper), Box::new(DependsOnHelper)];
        let mut configured = IndexMap::new();
        configured.insert("depends-on-helper".to_string(), true);
        let registry = ExtensionRegistry::build(available, &configured).unwrap();
        assert!(!registry.disable_requirement("helper").is_met());
        assert!(registry.disable_requirement("depends-on-helper").is_met());
    }

    #[test]
    fn duplicate_extension_names_are_rejected() {
        let available: Vec<Box<dyn Extension>> = vec![Box::new(Enabled), Box::new(Enabled)];
        let configured = IndexMap::new();
        assert!(matches!(
            ExtensionRegistry::build(available, &configured),
            Err(ExtensionError::DuplicateExtension(_))
        ));
    }

    #[test]
    fn all_requirements_combinator_is_usable_as_enable_requirement() {
        let requirement = AllRequirements::new(vec![Box::new(RequirementLeaf::new("ok", true))]);
        assert!(requirement.is_met());
    }
}

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::error::ExtensionError;
use crate::extension::Extension;

/// Build the "must run before" adjacency for a set of enabled extensions:
/// for each extension, the names (restricted to `enabled`) of the
/// extensions that must occupy an earlier batch.
///
/// Combines `depends_on` and `comes_after` (forward edges: the other
/// extension precedes this one) with `comes_before` (a reverse edge: this
/// extension precedes the other one). Edges to names outside `enabled`
/// are dropped — `comes_after`/`comes_before` are soft ordering hints, and
/// any `depends_on` target absent from `enabled` has already caused this
/// extension to be excluded from it by the registry before the graph is
/// built.
fn predecessors(
    extensions: &IndexMap<String, Box<dyn Extension>>,
) -> HashMap<String, HashSet<String>> {
    let enabled: HashSet<&str> = extensions.keys().map(String::as_str).collect();
    let mut predecessors: HashMap<String, HashSet<String>> = extensions
        .keys()
        .map(|name| (name.clone(), HashSet::new()))
        .collect();

    for (name, extension) in extensions {
        for predecessor in extension
            .depends_on()
            .into_iter()
            .chain(extension.comes_after())
        {
            if enabled.contains(predecessor) {
                predecessors
                    .get_mut(name)
                    .expect("name is a key of extensions")
                    .insert(predecessor.to_string());
            }
        }
        for successor in extension.comes_before() {
            if let Some(entry) = predecessors.get_mut(successor) {
                entry.insert(name.clone());
            }
        }
    }

    predecessors
}

/// Arrange `extensions` into ordered batches: every extension in batch `n`
/// may run concurrently with its batch-mates, and only after every
/// extension in batches `0..n` has finished.
///
/// Implemented as a single Kahn's algorithm pass over the dependency
/// and ordering-hint edges.
pub fn batches(
    extensions: &IndexMap<String, Box<dyn Extension>>,
) -> Result<Vec<Vec<String>>, ExtensionError> {
    let mut remaining = predecessors(extensions);
    let mut result = Vec::new();

    while !remaining.is_empty() {
        let ready: Vec<String> = remaining
            .iter()
            .filter(|(_, preds)| preds.is_empty())
            .map(|(name, _)| name.clone())
            .collect();

        if ready.is_empty() {
            let mut stuck: Vec<String> = remaining.keys().cloned().collect();
            stuck.sort();
            return Err(ExtensionError::CyclicDependency(stuck));
        }

        for name in &ready {
            remaining.remove(name);
        }
        for preds in remaining.values_mut() {
            for name in &ready {
                preds.remove(name);
            }
        }

        let mut batch = ready;
        batch.sort();
        result.push(batch);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        name: &'static str,
        depends_on: Vec<&'static str>,
        comes_after: Vec<&'static str>,
        comes_before: Vec<&'static str>,
    }

    impl Extension for Stub {
        fn name(&self) -> &'static str {
            self.name
        }

        fn depends_on(&self) -> Vec<&'static str> {
            self.depends_on.clone()
        }

        fn comes_after(&self) -> Vec<&'static str> {
            self.comes_after.clone()
        }

        fn comes_before(&self) -> Vec<&'static str> {
            self.comes_before.clone()
        }
    }

    fn stub(
        name: &'static str,
        depends_on: Vec<&'static str>,
        comes_after: Vec<&'static str>,
        comes_before: Vec<&'static str>,
    ) -> Box<dyn Extension> {
        Box::new(Stub {
            name,
            depends_on,
            comes_after,
            comes_before,
        })
    }

    #[test]
    fn independent_extensions_share_one_batch() {
        let mut extensions: IndexMap<String, Box<dyn Extension>> = IndexMap::new();
        extensions.insert("a".into(), stub("a", vec![], vec![], vec![]));
        extensions.insert("b".into(), stub("b", vec![], vec![], vec![]));

        let result = batches(&extensions).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0], vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn depends_on_forces_a_later_batch() {
        let mut extensions: IndexMap<String, Box<dyn Extension>> = IndexMap::new();
        extensions.insert("a".into(), stub("a", vec![], vec![], vec![]));
        extensions.insert("b".into(), stub("b", vec!["a"], vec![], vec![]));

        let result = batches(&extensions).unwrap();
        assert_eq!(result, vec![vec!["a".to_string()], vec!["b".to_string()]]);
    }

    #[test]
    fn comes_before_forces_an_earlier_batch() {
        let mut extensions: IndexMap<String, Box<dyn Extension>> = IndexMap::new();
        extensions.insert("a".into(), stub("a", vec![], vec![], vec!["b"]));
        extensions.insert("b".into(), stub("b", vec![], vec![], vec![]));

        let result = batches(&extensions).unwrap();
        assert_eq!(result, vec![vec!["a".to_string()], vec!["b".to_string()]]);
    }

    #[test]
    fn cycle_is_detected() {
        let mut extensions: IndexMap<String, Box<dyn Extension>> = IndexMap::new();
        extensions.insert("a".into(), stub("a", vec!["b"], vec![], vec![]));
        extensions.insert("b".into(), stub("b", vec!["a"], vec![], vec![]));

        assert!(matches!(
            batches(&extensions),
            Err(ExtensionError::CyclicDependency(_))
        ));
    }

    #[test]
    fn unresolved_dependency_outside_enabled_set_is_ignored() {
        let mut extensions: IndexMap<String, Box<dyn Extension>> = IndexMap::new();
        extensions.insert("a".into(), stub("a", vec!["missing"], vec![], vec![]));

        let result = batches(&extensions).unwrap();
        assert_eq!(result, vec![vec!["a".to_string()]]);
    }
}

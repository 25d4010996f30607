use futures::future::try_join_all;

use crate::extension::Extension;
use crate::registry::ExtensionRegistry;

/// Calls a single-method capability across every extension that
/// implements it, batch by batch, awaiting each batch concurrently before
/// moving to the next.
///
/// Extensions expose each capability through an explicit accessor on
/// [`crate::Extension`] rather than runtime introspection, so dispatch
/// here is a static downcast per batch member.
pub struct ExtensionDispatcher<'a> {
    registry: &'a ExtensionRegistry,
}

impl<'a> ExtensionDispatcher<'a> {
    #[must_use]
    pub fn new(registry: &'a ExtensionRegistry) -> Self {
        Self { registry }
    }

    /// Dispatch [`betty_traits::Generator::generate`] to every extension
    /// that implements it, respecting batch order.
    pub async fn dispatch_generate(&self) -> Result<(), anyhow::Error> {
        for batch in self.registry.batches() {
            let generators: Vec<&dyn betty_traits::Generator> = batch
                .iter()
                .filter_map(|name| self.registry.get(name))
                .filter_map(Extension::as_generator)
                .collect();
            try_join_all(generators.iter().map(|generator| generator.generate())).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use indexmap::IndexMap;

    use super::*;

    struct Counting {
        name: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl betty_traits::Generator for Counting {
        async fn generate(&self) -> Result<(), anyhow::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl Extension for Counting {
        fn name(&self) -> &'static str {
            self.name
        }

        fn as_generator(&self) -> Option<&dyn betty_traits::Generator> {
            Some(self)
        }
    }

    #[tokio::test]
    async fn dispatch_generate_calls_every_generator() {
        let calls = Arc::new(AtomicUsize::new(0));
        let available: Vec<Box<dyn Extension>> = vec![
            Box::new(Counting {
                name: "a",
                calls: calls.clone(),
            }),
            Box::new(Counting {
                name: "b",
                calls: calls.clone(),
            }),
        ];
        let mut configured = IndexMap::new();
        configured.insert("a".to_string(), true);
        configured.insert("b".to_string(), true);

        let registry = ExtensionRegistry::build(available, &configured).unwrap();
        ExtensionDispatcher::new(&registry)
            .dispatch_generate()
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

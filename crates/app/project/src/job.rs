use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// A process-local, type-erased scratchpad: generation tasks stash
/// expensive-to-recompute values (rendered templates, resolved entity
/// lookups) under a string key and retrieve them back as the concrete
/// type they stored.
///
/// `Clone` is a cheap `Arc` clone sharing the same underlying entries, so
/// every task handed a [`JobContext`] sees the same cache.
#[derive(Default, Clone)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, Arc<dyn Any + Send + Sync>>>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key` if present and of type `T`,
    /// otherwise compute it with `f`, cache it, and return it.
    pub fn get_or_insert_with<T: Send + Sync + 'static>(
        &self,
        key: &str,
        f: impl FnOnce() -> T,
    ) -> Arc<T> {
        let mut entries = self.entries.lock().expect("memory cache mutex poisoned");
        if let Some(existing) = entries.get(key) {
            if let Ok(value) = Arc::clone(existing).downcast::<T>() {
                return value;
            }
        }
        let value = Arc::new(f());
        entries.insert(key.to_string(), value.clone());
        value
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .expect("memory cache mutex poisoned")
            .clear();
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache").finish_non_exhaustive()
    }
}

/// The per-generation-run context threaded through every task: a claim
/// set that lets concurrent tasks agree on who performs a shared piece of
/// work exactly once, and a [`MemoryCache`] for anything worth memoizing
/// for the run's duration.
///
/// Cheaply `Clone`: every field is `Arc`-backed, so a generation pipeline
/// clones one `JobContext` into every delegated task and they all share the
/// same claim set and cache.
#[derive(Debug, Default, Clone)]
pub struct JobContext {
    claimed: Arc<Mutex<HashSet<String>>>,
    cache: MemoryCache,
}

impl JobContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to claim `job_id`. Returns `true` the first time any task
    /// claims a given ID during this context's lifetime, and `false` on
    /// every subsequent attempt — the mechanism generation tasks use to
    /// deduplicate work (e.g. only one task renders a shared partial)
    /// across the worker pool.
    pub fn claim(&self, job_id: impl Into<String>) -> bool {
        self.claimed
            .lock()
            .expect("claimed job set mutex poisoned")
            .insert(job_id.into())
    }

    #[must_use]
    pub fn cache(&self) -> &MemoryCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_succeeds_once_per_job_id() {
        let context = JobContext::new();
        assert!(context.claim("render:index"));
        assert!(!context.claim("render:index"));
    }

    #[test]
    fn different_job_ids_claim_independently() {
        let context = JobContext::new();
        assert!(context.claim("a"));
        assert!(context.claim("b"));
    }

    #[test]
    fn a_clone_shares_the_same_claim_set() {
        let context = JobContext::new();
        let clone = context.clone();
        assert!(context.claim("render:index"));
        assert!(!clone.claim("render:index"));
    }

    #[test]
    fn memory_cache_computes_once() {
        let cache = MemoryCache::new();
        let calls = std::cell::Cell::new(0);
        let first = cache.get_or_insert_with("key", || {
            calls.set(calls.get() + 1);
            42
        });
        let second = cache.get_or_insert_with("key", || {
            calls.set(calls.get() + 1);
            42
        });
        assert_eq!(*first, 42);
        assert_eq!(*second, 42);
        assert_eq!(calls.get(), 1);
    }
}

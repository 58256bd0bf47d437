//! In-process memo of component dependency orders
//!
//! Ordering a component set is deterministic for a given set of manifests,
//! so the result is memoized per unique set. The cache is an explicit object
//! handed to whoever needs it; the component registry and the override store
//! call [`OrderCache::invalidate`] when installation state changes.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};

/// Cache key: the component set, order-insensitive
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentSetKey(BTreeSet<String>);

impl ComponentSetKey {
    pub fn new<S: AsRef<str>>(components: &[S]) -> Self {
        Self(components.iter().map(|c| c.as_ref().to_string()).collect())
    }
}

/// Shared, clonable memo of dependency orders
#[derive(Debug, Clone, Default)]
pub struct OrderCache {
    cache: Arc<Mutex<HashMap<ComponentSetKey, Vec<String>>>>,
}

impl OrderCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<ComponentSetKey, Vec<String>>>> {
        self.cache.lock().map_err(|_| Error::LockPoisoned {
            context: "component order cache".to_string(),
        })
    }

    /// Get the cached order for `key`, or compute and cache it if not present
    pub fn get_or_compute<F>(&self, key: ComponentSetKey, compute: F) -> Result<Vec<String>>
    where
        F: FnOnce() -> Result<Vec<String>>,
    {
        if let Some(cached) = self.lock()?.get(&key) {
            return Ok(cached.clone());
        }

        // Computed outside the lock; a concurrent miss computes the same value.
        let order = compute()?;
        self.lock()?.insert(key, order.clone());
        Ok(order)
    }

    /// Get a value from cache without computing
    pub fn get(&self, key: &ComponentSetKey) -> Result<Option<Vec<String>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    /// Drop every memoized order.
    pub fn invalidate(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    /// Get the number of cached entries
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }
}

//! In-memory cache implementation using DashMap

use dashmap::DashMap;

use super::CacheEntry;
use super::CacheProvider;
use crate::error::CacheError;

/// An in-memory cache backed by a concurrent hash map.
///
/// Fast and thread-safe, but entries are lost when the process exits.
///
/// # Example
///
/// ```
/// use royale_lib::cache::InMemoryCache;
///
/// let cache = InMemoryCache::new();
/// assert!(cache.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCache {
    store: DashMap<String, CacheEntry>,
}

impl InMemoryCache {
    /// Creates a new empty in-memory cache.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Creates a new in-memory cache with the specified initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: DashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl CacheProvider for InMemoryCache {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.store.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        self.store.insert(key.to_string(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.store.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, CacheError> {
        Ok(self.store.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::transport::ResponseEnvelope;

    #[test]
    fn test_set_get_remove_clear() {
        let cache = InMemoryCache::with_capacity(4);
        let entry = CacheEntry::new(ResponseEnvelope::json_body(200, &serde_json::json!([1, 2])), Utc::now());

        CacheProvider::set(&cache, "a", entry.clone()).unwrap();
        CacheProvider::set(&cache, "b", entry.clone()).unwrap();
        assert_eq!(CacheProvider::get(&cache, "a").unwrap(), Some(entry));
        assert_eq!(cache.len(), 2);

        CacheProvider::remove(&cache, "a").unwrap();
        assert_eq!(CacheProvider::get(&cache, "a").unwrap(), None);

        CacheProvider::clear(&cache).unwrap();
        assert!(cache.is_empty());
    }
}

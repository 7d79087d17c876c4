//! Response caching layer
//!
//! Provides a `CacheProvider` trait with in-memory and SQLite implementations, and
//! [`ResponseCache`], which applies the configured TTL on top of a provider. Responses
//! are cached by request key as raw [`ResponseEnvelope`]s, so a hit decodes exactly the
//! bytes a miss would have.

mod config;
mod memory;
mod sqlite;

pub use config::*;
pub use memory::*;
pub use sqlite::*;

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use log::debug;
use log::warn;

use crate::error::CacheError;
use crate::transport::ResponseEnvelope;

/// A cached response and the time it was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The response as received from the network.
    pub envelope: ResponseEnvelope,
    /// When the response was stored.
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates a new cache entry.
    pub fn new(envelope: ResponseEnvelope, stored_at: DateTime<Utc>) -> Self {
        Self { envelope, stored_at }
    }

    /// Returns when this entry stops being served for a TTL.
    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        self.stored_at + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero())
    }

    /// Returns `true` while `now - stored_at < ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now < self.expires_at(ttl)
    }
}

/// Trait for cache providers.
///
/// A provider is a plain key-value store. It knows nothing about TTLs: expired entries
/// stay in place until they are overwritten or the cache is cleared, and
/// [`ResponseCache`] decides what is still fresh.
///
/// Providers are synchronous so the blocking and non-blocking clients can share them.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use royale_lib::cache::{CacheEntry, CacheProvider, InMemoryCache};
/// use royale_lib::transport::ResponseEnvelope;
///
/// let cache = InMemoryCache::new();
/// let envelope = ResponseEnvelope::json_body(200, &serde_json::json!({"name": "Eric"}));
/// cache.set("GET /players/%232P0LYQ", CacheEntry::new(envelope, Utc::now())).unwrap();
/// assert!(cache.get("GET /players/%232P0LYQ").unwrap().is_some());
/// ```
pub trait CacheProvider: Send + Sync {
    /// Retrieves an entry by key, fresh or not.
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Stores an entry, replacing any previous one.
    fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError>;

    /// Removes an entry.
    fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Removes every entry.
    fn clear(&self) -> Result<(), CacheError>;

    /// Returns the number of stored entries, including expired ones.
    fn len(&self) -> Result<usize, CacheError>;

    /// Returns `true` if nothing is stored.
    fn is_empty(&self) -> Result<bool, CacheError> {
        self.len().map(|len| len == 0)
    }
}

/// A cache provider with a time-to-live.
///
/// Cheap to clone; clones share the provider.
#[derive(Clone)]
pub struct ResponseCache {
    provider: Arc<dyn CacheProvider>,
    ttl: Duration,
}

impl ResponseCache {
    /// Creates a cache over a provider.
    pub fn new(provider: Arc<dyn CacheProvider>, ttl: Duration) -> Self {
        Self { provider, ttl }
    }

    /// Returns the TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the underlying provider.
    pub fn provider(&self) -> &Arc<dyn CacheProvider> {
        &self.provider
    }

    /// Returns the entry for `key` if it is still fresh at `now`.
    ///
    /// Provider failures are logged and treated as a miss.
    pub fn lookup(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        match self.provider.get(key) {
            Ok(Some(entry)) if entry.is_fresh(now, self.ttl) => {
                debug!("cache hit: {}", key);
                Some(entry)
            }
            Ok(Some(_)) => {
                debug!("cache expired: {}", key);
                None
            }
            Ok(None) => {
                debug!("cache miss: {}", key);
                None
            }
            Err(e) => {
                warn!("cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Stores an envelope under `key`, overwriting any previous entry.
    ///
    /// Provider failures are logged and the write is skipped. Returns the entry as it
    /// would be served.
    pub fn store(&self, key: &str, envelope: ResponseEnvelope, now: DateTime<Utc>) -> CacheEntry {
        let entry = CacheEntry::new(envelope, now);
        if let Err(e) = self.provider.set(key, entry.clone()) {
            warn!("cache write failed for {}: {}", key, e);
        }
        entry
    }

    /// Removes every entry.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.provider.clear()
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

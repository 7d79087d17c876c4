//! Cache configuration

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::CacheProvider;
use super::InMemoryCache;
use super::ResponseCache;
use super::SqliteCache;
use super::sqlite::DEFAULT_TABLE_NAME;
use crate::error::CacheError;

/// Where cached responses are kept.
#[derive(Clone)]
pub enum CacheStore {
    /// A SQLite database file.
    Sqlite(PathBuf),
    /// Process memory.
    Memory,
    /// A caller-supplied provider.
    Custom(Arc<dyn CacheProvider>),
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(path) => f.debug_tuple("Sqlite").field(path).finish(),
            Self::Memory => f.write_str("Memory"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Configuration for response caching.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use royale_lib::cache::CacheConfig;
///
/// let config = CacheConfig::sqlite("royale.db")
///     .with_ttl(Duration::from_secs(60))
///     .with_table_name("responses");
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Storage backend.
    pub store: CacheStore,

    /// How long a cached response is served.
    ///
    /// Default: 10 seconds
    pub ttl: Duration,

    /// Table name for the SQLite backend.
    ///
    /// Default: `cache`
    pub table_name: String,
}

impl CacheConfig {
    /// Default TTL for cached responses.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

    fn with_store(store: CacheStore) -> Self {
        Self {
            store,
            ttl: Self::DEFAULT_TTL,
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }

    /// Caches responses in a SQLite database file.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self::with_store(CacheStore::Sqlite(path.into()))
    }

    /// Caches responses in process memory.
    pub fn in_memory() -> Self {
        Self::with_store(CacheStore::Memory)
    }

    /// Caches responses in a custom provider.
    pub fn custom(provider: Arc<dyn CacheProvider>) -> Self {
        Self::with_store(CacheStore::Custom(provider))
    }

    /// Sets the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the SQLite table name.
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Opens the configured store.
    pub fn open(&self) -> Result<ResponseCache, CacheError> {
        let provider: Arc<dyn CacheProvider> = match &self.store {
            CacheStore::Sqlite(path) => Arc::new(SqliteCache::open(path, &self.table_name)?),
            CacheStore::Memory => Arc::new(InMemoryCache::new()),
            CacheStore::Custom(provider) => Arc::clone(provider),
        };
        Ok(ResponseCache::new(provider, self.ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::in_memory();
        assert_eq!(config.ttl, Duration::from_secs(10));
        assert_eq!(config.table_name, "cache");
    }

    #[test]
    fn test_open_rejects_bad_table_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::sqlite(dir.path().join("c.db")).with_table_name("bad name");
        assert!(matches!(config.open(), Err(CacheError::InvalidTableName(_))));
    }

    #[test]
    fn test_custom_provider_is_shared() {
        let provider = Arc::new(InMemoryCache::new());
        let cache = CacheConfig::custom(provider.clone())
            .with_ttl(Duration::from_secs(3))
            .open()
            .unwrap();
        assert_eq!(cache.ttl(), Duration::from_secs(3));
        cache.store(
            "k",
            crate::transport::ResponseEnvelope::json_body(200, &serde_json::json!({})),
            chrono::Utc::now(),
        );
        assert_eq!(provider.len(), 1);
    }
}

//! SQLite-backed persistent cache implementation.

use std::path::Path;
use std::sync::Mutex;
use std::sync::PoisonError;

use chrono::DateTime;
use rusqlite::Connection;
use rusqlite::OptionalExtension;

use super::CacheEntry;
use super::CacheProvider;
use crate::error::CacheError;
use crate::transport::ResponseEnvelope;

/// Default table name for cached responses.
pub const DEFAULT_TABLE_NAME: &str = "cache";

/// A persistent cache backed by SQLite.
///
/// Entries live in one table (`cache` unless configured otherwise) keyed by request
/// key, holding the bincode-encoded response and the time it was stored in epoch
/// milliseconds. File databases use WAL journal mode.
///
/// # Example
///
/// ```ignore
/// use royale_lib::cache::SqliteCache;
///
/// // File-based cache
/// let cache = SqliteCache::open("royale.db", "cache")?;
///
/// // In-memory cache (for testing)
/// let cache = SqliteCache::open_in_memory()?;
/// ```
pub struct SqliteCache {
    conn: Mutex<Connection>,
    table: String,
}

impl SqliteCache {
    /// Opens a SQLite cache at the specified path.
    ///
    /// Creates the database file and cache table if they don't exist.
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self, CacheError> {
        validate_table_name(table)?;
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        Self::init(conn, table)
    }

    /// Opens an in-memory SQLite cache.
    ///
    /// Useful for testing. Data is lost when the cache is dropped.
    pub fn open_in_memory() -> Result<Self, CacheError> {
        Self::init(Connection::open_in_memory()?, DEFAULT_TABLE_NAME)
    }

    fn init(conn: Connection, table: &str) -> Result<Self, CacheError> {
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    key TEXT PRIMARY KEY,
                    data BLOB NOT NULL,
                    stored_at INTEGER NOT NULL
                )"
            ),
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            table: table.to_string(),
        })
    }

    /// Returns the table entries are stored in.
    pub fn table(&self) -> &str {
        &self.table
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheProvider for SqliteCache {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let row = self
            .conn()
            .query_row(
                &format!("SELECT data, stored_at FROM {} WHERE key = ?1", self.table),
                [key],
                |row| Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;

        let Some((data, stored_at)) = row else {
            return Ok(None);
        };
        let envelope: ResponseEnvelope = bincode::deserialize(&data)?;
        let stored_at =
            DateTime::from_timestamp_millis(stored_at).ok_or(CacheError::InvalidTimestamp(stored_at))?;
        Ok(Some(CacheEntry::new(envelope, stored_at)))
    }

    fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let data = bincode::serialize(&entry.envelope)?;
        self.conn().execute(
            &format!(
                "INSERT OR REPLACE INTO {} (key, data, stored_at) VALUES (?1, ?2, ?3)",
                self.table
            ),
            rusqlite::params![key, data, entry.stored_at.timestamp_millis()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.conn()
            .execute(&format!("DELETE FROM {} WHERE key = ?1", self.table), [key])?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.conn().execute(&format!("DELETE FROM {}", self.table), [])?;
        Ok(())
    }

    fn len(&self) -> Result<usize, CacheError> {
        let count = self.conn().query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count as usize)
    }
}

impl std::fmt::Debug for SqliteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCache")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

/// Table names are interpolated into SQL, so only plain identifiers are accepted.
fn validate_table_name(name: &str) -> Result<(), CacheError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CacheError::InvalidTableName(name.to_string()))
    }
}

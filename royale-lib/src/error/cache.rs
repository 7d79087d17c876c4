//! Cache storage errors

/// Errors raised by a [`CacheProvider`](crate::cache::CacheProvider).
///
/// The client never fails a request because of these; they only surface from explicit
/// cache administration such as opening the store or clearing it.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The SQLite backend failed.
    #[error("Cache database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A cached envelope could not be serialized or deserialized.
    #[error("Cache encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    /// The configured table name is not a plain SQL identifier.
    #[error("Invalid cache table name: {0}")]
    InvalidTableName(String),

    /// A stored timestamp was out of range.
    #[error("Invalid cache timestamp: {0}")]
    InvalidTimestamp(i64),
}

//! esgcache error types

/// Error type for cache, report, and maintenance operations.
///
/// Wrapped query failures surface as [`EsgCacheError::Database`] and are
/// never cached — a failed query leaves the cache untouched and the next
/// call for the same key retries.
#[derive(Debug, thiserror::Error)]
pub enum EsgCacheError {
    /// Invalid construction-time configuration (e.g. a negative TTL).
    ///
    /// Rejected at build time rather than silently clamped.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The persistent store rejected or failed a query.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed or unexpected data from the storage layer.
    #[error("data error: {0}")]
    Data(String),

    /// Internal invariant violation; indicates a bug in this crate.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

/// Result type alias for esgcache operations
pub type Result<T> = std::result::Result<T, EsgCacheError>;

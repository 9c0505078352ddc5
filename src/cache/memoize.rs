//! Memoizing orchestrator over the cache store.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::key::derive_key;
use crate::cache::stats::CacheStats;
use crate::cache::store::CacheStore;
use crate::cache::CachedValue;
use crate::error::{EsgCacheError, Result};
use crate::telemetry;

/// Configuration for the query cache.
///
/// ```rust
/// # use esgcache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new().ttl(Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Validity window for cached entries. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Build a config from a signed seconds value, as dashboard settings
    /// store it. A negative TTL is a configuration error, not a clamp.
    pub fn from_ttl_secs(secs: i64) -> Result<Self> {
        if secs < 0 {
            return Err(EsgCacheError::Configuration(format!(
                "ttl_seconds must be non-negative, got {secs}"
            )));
        }
        Ok(Self {
            ttl: Duration::from_secs(secs as u64),
        })
    }
}

/// Memoizes query executions keyed on `(descriptor, parameters)`.
///
/// On a hit the stored value is returned and the callback never runs — there
/// is no stale-while-revalidate. On a miss the callback is awaited *outside*
/// the store lock, so a slow query never blocks unrelated cache traffic; the
/// lock is re-acquired once afterwards to record the result.
///
/// Two tasks missing on the same key concurrently will both execute the
/// callback; the last insert wins. Deduplicating in-flight executions
/// (single-flight) is intentionally out of scope.
pub struct QueryCache {
    store: CacheStore,
}

impl QueryCache {
    /// Create a new query cache from the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            store: CacheStore::new(config.ttl),
        }
    }

    /// Resolve `descriptor` + `params` from cache, or compute and store.
    ///
    /// A failing callback propagates its error untouched: nothing is cached
    /// (no negative caching), the attempt counts as a miss but not as a
    /// completed query, and the next call for the same key retries.
    pub async fn get_or_compute<F, Fut>(
        &self,
        descriptor: &str,
        params: &[String],
        compute: F,
    ) -> Result<CachedValue>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedValue>>,
    {
        let key = derive_key(descriptor, params);

        if let Some(value) = self.store.get(key) {
            debug!(descriptor, "cache hit");
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "operation" => descriptor.to_string())
                .increment(1);
            return Ok(value);
        }

        debug!(descriptor, "cache miss");
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => descriptor.to_string())
            .increment(1);

        // Lock is released here; the callback may block for arbitrarily long.
        let started = Instant::now();
        let value = compute().await?;
        let elapsed = started.elapsed();

        metrics::histogram!(
            telemetry::QUERY_DURATION_SECONDS,
            "operation" => descriptor.to_string()
        )
        .record(elapsed.as_secs_f64());

        self.store.commit(key, value.clone(), elapsed);
        Ok(value)
    }

    /// Consistent statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        self.store.snapshot()
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.store.clear();
    }

    /// Drop entries past their TTL, returning the count removed.
    pub fn sweep_expired(&self) -> usize {
        self.store.sweep_expired()
    }

    /// Direct access to the underlying store.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }
}

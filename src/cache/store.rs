//! TTL-bounded shared cache store.
//!
//! One `Mutex` guards both the entry map and the performance counters, so a
//! statistics snapshot is always internally consistent. Lock scope is kept
//! minimal: no I/O, no callback invocation, and no allocation beyond a value
//! clone ever happens under the lock.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::info;

use crate::cache::CachedValue;
use crate::cache::stats::{CacheStats, PerfCounters};

/// A single cached query result.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    value: CachedValue,
    created_at: Instant,
}

impl CacheEntry {
    fn new(value: CachedValue) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    /// An entry whose age has reached the TTL is logically absent even
    /// before it is physically removed.
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

struct Inner {
    entries: HashMap<u64, CacheEntry>,
    perf: PerfCounters,
}

/// Thread-safe map of cache key → entry with TTL-based freshness.
///
/// Every lookup counts as a hit or a miss; the counters share the map's
/// mutex. A lookup that finds a stale entry drops it opportunistically.
/// Entries are only ever replaced wholesale — there is no partial mutation.
pub struct CacheStore {
    ttl: Duration,
    inner: Mutex<Inner>,
}

impl CacheStore {
    /// Create an empty store with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                perf: PerfCounters::default(),
            }),
        }
    }

    /// The validity window entries are checked against.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a key, returning the value only if it is still fresh.
    ///
    /// Records a hit or a miss. A stale entry found here is removed before
    /// reporting the miss.
    pub fn get(&self, key: u64) -> Option<CachedValue> {
        let mut inner = self.lock();
        match inner.entries.get(&key) {
            Some(entry) if !entry.is_expired(self.ttl) => {
                let value = entry.value.clone();
                inner.perf.record_hit();
                Some(value)
            }
            Some(_) => {
                inner.entries.remove(&key);
                inner.perf.record_miss();
                None
            }
            None => {
                inner.perf.record_miss();
                None
            }
        }
    }

    /// Insert or replace an entry with a fresh `created_at`.
    pub fn insert(&self, key: u64, value: CachedValue) {
        let mut inner = self.lock();
        inner.entries.insert(key, CacheEntry::new(value));
    }

    /// Record a completed miss: store the freshly computed value and fold
    /// its execution time into the counters, in one lock acquisition.
    pub(crate) fn commit(&self, key: u64, value: CachedValue, elapsed: Duration) {
        let mut inner = self.lock();
        inner.perf.record_completion(elapsed);
        inner.entries.insert(key, CacheEntry::new(value));
    }

    /// Unconditionally remove all entries. Counters are preserved.
    pub fn clear(&self) {
        let removed = {
            let mut inner = self.lock();
            let removed = inner.entries.len();
            inner.entries.clear();
            removed
        };
        info!(removed, "query cache cleared");
    }

    /// Remove every entry past its TTL, returning how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let removed = {
            let mut inner = self.lock();
            let before = inner.entries.len();
            let ttl = self.ttl;
            inner.entries.retain(|_, entry| !entry.is_expired(ttl));
            before - inner.entries.len()
        };
        if removed > 0 {
            info!(removed, "swept expired cache entries");
        }
        removed
    }

    /// Number of physical entries, stale ones included.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take a consistent statistics snapshot under a single lock.
    pub fn snapshot(&self) -> CacheStats {
        let inner = self.lock();
        let cache_size = inner.entries.len();
        let valid_entries = inner
            .entries
            .values()
            .filter(|e| !e.is_expired(self.ttl))
            .count();
        CacheStats {
            cache_size,
            valid_entries,
            expired_entries: cache_size - valid_entries,
            cache_hit_rate: inner.perf.hit_rate(),
            performance: inner.perf.snapshot(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned mutex means a panic mid-mutation; the map holds only
        // wholesale-replaced entries, so the data is still coherent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}

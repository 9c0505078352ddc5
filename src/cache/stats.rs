//! Cache statistics tracking.
//!
//! The cumulative counters live inside the store mutex (see
//! [`CacheStore`](crate::cache::CacheStore)), so every snapshot is taken in
//! one consistent view — hit/miss counts and entry counts can never be torn
//! across a concurrent mutation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cumulative performance counters, mutated under the store mutex.
///
/// `total_queries` and `total_query_time` track only *completed* executions:
/// a callback that fails still counts as a miss, but contributes nothing to
/// the timing figures.
#[derive(Debug, Clone, Default)]
pub(crate) struct PerfCounters {
    pub total_queries: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub total_query_time: Duration,
}

impl PerfCounters {
    pub fn record_hit(&mut self) {
        self.cache_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.cache_misses += 1;
    }

    /// Record a completed (successful) query execution.
    pub fn record_completion(&mut self, elapsed: Duration) {
        self.total_queries += 1;
        self.total_query_time += elapsed;
    }

    /// Percentage of lookups served from cache, 0 when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64 * 100.0
        }
    }

    pub fn snapshot(&self) -> PerfStats {
        let total_query_time_secs = self.total_query_time.as_secs_f64();
        let avg_query_time_secs = if self.total_queries == 0 {
            0.0
        } else {
            total_query_time_secs / self.total_queries as f64
        };
        PerfStats {
            total_queries: self.total_queries,
            cache_hits: self.cache_hits,
            cache_misses: self.cache_misses,
            total_query_time_secs,
            avg_query_time_secs,
        }
    }
}

/// Serializable snapshot of the performance counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfStats {
    /// Completed query executions (misses that ran to success).
    pub total_queries: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Cumulative wall-clock time spent in completed executions.
    pub total_query_time_secs: f64,
    /// `total_query_time / total_queries`, 0 when nothing completed.
    pub avg_query_time_secs: f64,
}

/// Full cache statistics snapshot for dashboard display.
///
/// Produced by [`CacheStore::snapshot`](crate::cache::CacheStore::snapshot)
/// under a single lock acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Physical entry count, including not-yet-swept stale entries.
    pub cache_size: usize,
    /// Entries still within their TTL window.
    pub valid_entries: usize,
    /// Entries past their TTL but not yet removed.
    pub expired_entries: usize,
    /// `hits / (hits + misses) * 100`, 0 when no lookups have happened.
    pub cache_hit_rate: f64,
    /// Cumulative performance counters.
    pub performance: PerfStats,
}

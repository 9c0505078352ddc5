//! Telemetry metric name constants.
//!
//! Centralised metric names for esgcache operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `esgcache_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `operation` — cached accessor invoked (e.g. "standards", "kpis")
//! - `directive` — maintenance directive (e.g. "create_indexes", "optimize")
//! - `status` — outcome: "ok" or "error"

/// Total cache hits.
///
/// Labels: `operation`.
pub const CACHE_HITS_TOTAL: &str = "esgcache_cache_hits_total";

/// Total cache misses.
///
/// Labels: `operation`.
pub const CACHE_MISSES_TOTAL: &str = "esgcache_cache_misses_total";

/// Duration of completed (uncached) query executions in seconds.
///
/// Labels: `operation`.
pub const QUERY_DURATION_SECONDS: &str = "esgcache_query_duration_seconds";

/// Total maintenance directives issued against the persistent store.
///
/// Labels: `directive`, `status` ("ok" | "error").
pub const MAINTENANCE_TOTAL: &str = "esgcache_maintenance_total";

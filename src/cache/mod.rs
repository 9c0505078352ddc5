//! Caching subsystem.
//!
//! Layered bottom-up:
//!
//! - [`key`] — deterministic key derivation from a query descriptor plus its
//!   ordered parameters.
//! - [`store`] — the shared `Mutex`-guarded map of key → entry, with TTL
//!   freshness checks, sweeping, and the performance counters under the same
//!   lock (see [`stats`]).
//! - [`QueryCache`] — the memoizer: check cache, else compute-then-store.
//!   The caller-supplied callback always runs outside the store lock.
//!
//! Eviction is lazy: a stale entry is dropped when a lookup trips over it or
//! when [`CacheStore::sweep_expired`] is called explicitly. There is no
//! background sweep task and no size bound — key cardinality is the number
//! of distinct dashboard queries, which stays small.

pub mod key;
mod memoize;
pub mod stats;
pub mod store;

pub use memoize::{CacheConfig, QueryCache};
pub use stats::{CacheStats, PerfStats};
pub use store::CacheStore;

use crate::types::{
    DisclosureResponse, Indicator, Kpi, MappingSummary, Risk, Standard, Target,
};

/// Cached query result — one variant per report accessor.
///
/// The descriptor is part of the cache key, so a key always maps back to the
/// variant its accessor stored; accessors still match defensively and treat
/// a mismatch as an internal error.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Standards(Vec<Standard>),
    Indicators(Vec<Indicator>),
    Responses(Vec<DisclosureResponse>),
    Kpis(Vec<Kpi>),
    Targets(Vec<Target>),
    Risks(Vec<Risk>),
    MappingSummary(MappingSummary),
}

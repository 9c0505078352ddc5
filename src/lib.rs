//! esgcache — shared query cache for sustainability-reporting dashboards
//!
//! The reporting dashboards re-run the same expensive read queries on every
//! refresh. This crate memoizes those reads behind a thread-safe, TTL-based,
//! statistics-tracking in-memory cache, and bundles the sibling maintenance
//! service that keeps the underlying SQLite store fast (index creation,
//! `ANALYZE`, `VACUUM`).
//!
//! # Example
//!
//! ```rust,no_run
//! use esgcache::CachedReports;
//! use sqlx::sqlite::SqlitePoolOptions;
//!
//! #[tokio::main]
//! async fn main() -> esgcache::Result<()> {
//!     let pool = SqlitePoolOptions::new().connect("sqlite://reports.db").await?;
//!     let reports = CachedReports::builder()
//!         .pool(pool)
//!         .ttl_seconds(3600)
//!         .build()?;
//!
//!     // First call runs the query; the second is served from cache.
//!     let standards = reports.standards(Some("Environmental")).await?;
//!     let _again = reports.standards(Some("Environmental")).await?;
//!
//!     let stats = reports.cache_stats();
//!     println!("{} standards, hit rate {:.1}%", standards.len(), stats.cache_hit_rate);
//!     Ok(())
//! }
//! ```
//!
//! # What this is not
//!
//! Not a distributed cache, not persistent across restarts, not size-bounded
//! (no LRU), and strictly read-only memoization: writes to the reporting
//! tables are invisible to it until entries expire or the cache is cleared.
//! Concurrent misses on one key may run the query twice (no single-flight).

pub mod cache;
pub mod error;
pub mod maintenance;
pub mod report;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheStats, CacheStore, CachedValue, PerfStats, QueryCache};
pub use error::{EsgCacheError, Result};
pub use maintenance::{IndexReport, MaintenanceService, MaintenanceState, OptimizeReport};
pub use report::{CachedReports, CachedReportsBuilder, ReportStore, SqliteReportStore};
pub use types::{
    DisclosureResponse, Indicator, Kpi, MappingSummary, Risk, Standard, Target,
};

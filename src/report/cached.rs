//! Cached report accessors — the public facade of this crate.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::cache::{CacheConfig, CacheStats, CachedValue, QueryCache};
use crate::error::{EsgCacheError, Result};
use crate::maintenance::{IndexReport, MaintenanceService, OptimizeReport};
use crate::report::{ReportStore, SqliteReportStore};
use crate::types::{
    DisclosureResponse, Indicator, Kpi, MappingSummary, Risk, Standard, Target,
};

/// Encode present filters as `name=value` parameter strings.
///
/// The field name is part of the parameter, so two accessor calls that set
/// different filters to the same value never share a cache key.
fn filter_params(filters: &[(&str, Option<String>)]) -> Vec<String> {
    filters
        .iter()
        .filter_map(|(name, value)| value.as_ref().map(|value| format!("{name}={value}")))
        .collect()
}

/// Memoizing wrapper over a [`ReportStore`].
///
/// One instance is constructed at application startup and shared (`Arc`)
/// with every dashboard needing cached reads. Each accessor resolves from
/// the cache when a fresh entry exists and otherwise runs the underlying
/// query exactly as an uncached call would — callers observe identical
/// success/error behavior, plus up-to-TTL staleness on the success path.
///
/// ```rust,no_run
/// use esgcache::CachedReports;
/// use sqlx::sqlite::SqlitePoolOptions;
///
/// # #[tokio::main]
/// # async fn main() -> esgcache::Result<()> {
/// let pool = SqlitePoolOptions::new().connect("sqlite://reports.db").await?;
/// let reports = CachedReports::builder()
///     .pool(pool)
///     .ttl_seconds(3600)
///     .build()?;
///
/// let standards = reports.standards(Some("Environmental")).await?;
/// println!("{} standards", standards.len());
/// # Ok(())
/// # }
/// ```
pub struct CachedReports {
    store: Arc<dyn ReportStore>,
    cache: QueryCache,
    maintenance: Option<MaintenanceService>,
}

impl std::fmt::Debug for CachedReports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedReports").finish_non_exhaustive()
    }
}

impl CachedReports {
    /// Create a builder for configuring a cached report handle.
    pub fn builder() -> CachedReportsBuilder {
        CachedReportsBuilder::new()
    }

    /// Disclosure standards, optionally restricted to one category.
    pub async fn standards(&self, category: Option<&str>) -> Result<Vec<Standard>> {
        let params = filter_params(&[("category", category.map(String::from))]);
        let store = Arc::clone(&self.store);
        let value = self
            .cache
            .get_or_compute("standards", &params, || async move {
                store
                    .fetch_standards(category)
                    .await
                    .map(CachedValue::Standards)
            })
            .await?;
        match value {
            CachedValue::Standards(rows) => Ok(rows),
            _ => Err(EsgCacheError::Internal("cached value variant mismatch")),
        }
    }

    /// Indicators, optionally restricted by owning standard and/or category.
    pub async fn indicators(
        &self,
        standard_id: Option<i64>,
        category: Option<&str>,
    ) -> Result<Vec<Indicator>> {
        let params = filter_params(&[
            ("standard_id", standard_id.map(|v| v.to_string())),
            ("category", category.map(String::from)),
        ]);
        let store = Arc::clone(&self.store);
        let value = self
            .cache
            .get_or_compute("indicators", &params, || async move {
                store
                    .fetch_indicators(standard_id, category)
                    .await
                    .map(CachedValue::Indicators)
            })
            .await?;
        match value {
            CachedValue::Indicators(rows) => Ok(rows),
            _ => Err(EsgCacheError::Internal("cached value variant mismatch")),
        }
    }

    /// A company's disclosure responses, optionally for one indicator.
    pub async fn responses(
        &self,
        company_id: i64,
        indicator_id: Option<i64>,
    ) -> Result<Vec<DisclosureResponse>> {
        let params = filter_params(&[
            ("company_id", Some(company_id.to_string())),
            ("indicator_id", indicator_id.map(|v| v.to_string())),
        ]);
        let store = Arc::clone(&self.store);
        let value = self
            .cache
            .get_or_compute("responses", &params, || async move {
                store
                    .fetch_responses(company_id, indicator_id)
                    .await
                    .map(CachedValue::Responses)
            })
            .await?;
        match value {
            CachedValue::Responses(rows) => Ok(rows),
            _ => Err(EsgCacheError::Internal("cached value variant mismatch")),
        }
    }

    /// KPIs, optionally restricted to one indicator.
    pub async fn kpis(&self, indicator_id: Option<i64>) -> Result<Vec<Kpi>> {
        let params = filter_params(&[("indicator_id", indicator_id.map(|v| v.to_string()))]);
        let store = Arc::clone(&self.store);
        let value = self
            .cache
            .get_or_compute("kpis", &params, || async move {
                store.fetch_kpis(indicator_id).await.map(CachedValue::Kpis)
            })
            .await?;
        match value {
            CachedValue::Kpis(rows) => Ok(rows),
            _ => Err(EsgCacheError::Internal("cached value variant mismatch")),
        }
    }

    /// Targets, optionally restricted to one year.
    pub async fn targets(&self, year: Option<i64>) -> Result<Vec<Target>> {
        let params = filter_params(&[("year", year.map(|v| v.to_string()))]);
        let store = Arc::clone(&self.store);
        let value = self
            .cache
            .get_or_compute("targets", &params, || async move {
                store.fetch_targets(year).await.map(CachedValue::Targets)
            })
            .await?;
        match value {
            CachedValue::Targets(rows) => Ok(rows),
            _ => Err(EsgCacheError::Internal("cached value variant mismatch")),
        }
    }

    /// Risks, optionally restricted to one risk level.
    pub async fn risks(&self, risk_level: Option<&str>) -> Result<Vec<Risk>> {
        let params = filter_params(&[("risk_level", risk_level.map(String::from))]);
        let store = Arc::clone(&self.store);
        let value = self
            .cache
            .get_or_compute("risks", &params, || async move {
                store.fetch_risks(risk_level).await.map(CachedValue::Risks)
            })
            .await?;
        match value {
            CachedValue::Risks(rows) => Ok(rows),
            _ => Err(EsgCacheError::Internal("cached value variant mismatch")),
        }
    }

    /// Aggregate counts over the cross-framework mapping tables.
    pub async fn mapping_summary(&self) -> Result<MappingSummary> {
        let store = Arc::clone(&self.store);
        let value = self
            .cache
            .get_or_compute("mapping_summary", &[], || async move {
                store
                    .fetch_mapping_summary()
                    .await
                    .map(CachedValue::MappingSummary)
            })
            .await?;
        match value {
            CachedValue::MappingSummary(summary) => Ok(summary),
            _ => Err(EsgCacheError::Internal("cached value variant mismatch")),
        }
    }

    /// Consistent cache statistics snapshot.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached entry.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Drop entries past their TTL, returning the count removed.
    pub fn clear_expired_cache(&self) -> usize {
        self.cache.sweep_expired()
    }

    /// Create the read-path indexes on the persistent store.
    ///
    /// Clears the cache afterwards — index changes shift query plans and the
    /// maintenance window is a natural refresh point for cached aggregates.
    pub async fn create_performance_indexes(&self) -> Result<IndexReport> {
        let report = self.maintenance()?.create_performance_indexes().await;
        self.cache.clear();
        Ok(report)
    }

    /// Refresh planner statistics and compact the persistent store.
    ///
    /// Clears the cache afterwards, since storage-level changes can
    /// invalidate previously cached aggregates.
    pub async fn optimize_storage(&self) -> Result<OptimizeReport> {
        let report = self.maintenance()?.optimize_storage().await;
        self.cache.clear();
        Ok(report)
    }

    /// Direct access to the memoizer, mainly for tests and diagnostics.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn maintenance(&self) -> Result<&MaintenanceService> {
        self.maintenance.as_ref().ok_or_else(|| {
            EsgCacheError::Configuration(
                "maintenance requires a SQLite pool; this handle was built from a custom store"
                    .into(),
            )
        })
    }
}

/// Builder for [`CachedReports`].
///
/// Either a SQLite [`pool`](Self::pool) (enabling the bundled store and the
/// maintenance service) or a custom [`store`](Self::store) is required.
pub struct CachedReportsBuilder {
    pool: Option<SqlitePool>,
    store: Option<Arc<dyn ReportStore>>,
    ttl_seconds: i64,
}

impl CachedReportsBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            store: None,
            ttl_seconds: 3600,
        }
    }

    /// Use a SQLite pool for both report queries and storage maintenance.
    pub fn pool(mut self, pool: SqlitePool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Use a custom report store. Maintenance still requires a pool.
    pub fn store(mut self, store: Arc<dyn ReportStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Cache validity window in seconds (default 3600).
    ///
    /// Negative values are rejected at [`build`](Self::build) time.
    pub fn ttl_seconds(mut self, secs: i64) -> Self {
        self.ttl_seconds = secs;
        self
    }

    /// Build the cached report handle.
    pub fn build(self) -> Result<CachedReports> {
        let config = CacheConfig::from_ttl_secs(self.ttl_seconds)?;
        let maintenance = self.pool.clone().map(MaintenanceService::new);

        let store: Arc<dyn ReportStore> = match self.store {
            Some(store) => store,
            None => {
                let pool = self.pool.ok_or_else(|| {
                    EsgCacheError::Configuration(
                        "either a SQLite pool or a custom report store is required".into(),
                    )
                })?;
                Arc::new(SqliteReportStore::new(pool))
            }
        };

        Ok(CachedReports {
            store,
            cache: QueryCache::new(&config),
            maintenance,
        })
    }
}

impl Default for CachedReportsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

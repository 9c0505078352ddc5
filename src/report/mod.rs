//! Report data access.
//!
//! [`ReportStore`] is the seam between the cache and the domain layer: one
//! fetch method per dashboard entity, each a plain uncached query. The
//! SQLite implementation lives in [`sqlite`]; [`CachedReports`] wraps any
//! store in the memoizing cache and is what application code holds.

mod cached;
mod sqlite;

pub use cached::{CachedReports, CachedReportsBuilder};
pub use sqlite::SqliteReportStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    DisclosureResponse, Indicator, Kpi, MappingSummary, Risk, Standard, Target,
};

/// Uncached read access to the reporting data.
///
/// Implementations must be cheap to share (`Send + Sync`); the cached facade
/// holds one behind an `Arc`. Every method corresponds to a cached accessor
/// on [`CachedReports`] and must observe identical success/error behavior —
/// the cache only ever adds up-to-TTL staleness on the success path.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Disclosure standards, optionally restricted to one category.
    async fn fetch_standards(&self, category: Option<&str>) -> Result<Vec<Standard>>;

    /// Indicators, optionally restricted by owning standard and/or category.
    async fn fetch_indicators(
        &self,
        standard_id: Option<i64>,
        category: Option<&str>,
    ) -> Result<Vec<Indicator>>;

    /// A company's disclosure responses, optionally for a single indicator.
    async fn fetch_responses(
        &self,
        company_id: i64,
        indicator_id: Option<i64>,
    ) -> Result<Vec<DisclosureResponse>>;

    /// KPIs, optionally restricted to one indicator.
    async fn fetch_kpis(&self, indicator_id: Option<i64>) -> Result<Vec<Kpi>>;

    /// Targets, optionally restricted to one year.
    async fn fetch_targets(&self, year: Option<i64>) -> Result<Vec<Target>>;

    /// Risks, optionally restricted to one risk level.
    async fn fetch_risks(&self, risk_level: Option<&str>) -> Result<Vec<Risk>>;

    /// Aggregate counts over the cross-framework mapping tables.
    async fn fetch_mapping_summary(&self) -> Result<MappingSummary>;
}

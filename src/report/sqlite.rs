//! SQLite-backed [`ReportStore`] implementation.
//!
//! Queries are built at runtime (no compile-time checked macros — the schema
//! lives with the application, not this crate) with positional binds in a
//! fixed condition order. Display columns from the owning standard are
//! joined in so the dashboards render rows without follow-up lookups.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::report::ReportStore;
use crate::types::{
    DisclosureResponse, Indicator, Kpi, MappingSummary, Risk, Standard, Target,
};

/// Read-side query executor over the reporting database.
#[derive(Debug, Clone)]
pub struct SqliteReportStore {
    pool: SqlitePool,
}

impl SqliteReportStore {
    /// Create a store over an existing connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ReportStore for SqliteReportStore {
    async fn fetch_standards(&self, category: Option<&str>) -> Result<Vec<Standard>> {
        let mut sql =
            String::from("SELECT id, code, title, category, type, description FROM standards");
        if category.is_some() {
            sql.push_str(" WHERE category = ?");
        }
        sql.push_str(" ORDER BY category, code");

        let mut query = sqlx::query_as::<_, Standard>(&sql);
        if let Some(category) = category {
            query = query.bind(category);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn fetch_indicators(
        &self,
        standard_id: Option<i64>,
        category: Option<&str>,
    ) -> Result<Vec<Indicator>> {
        let mut sql = String::from(
            "SELECT i.id, i.code, i.title, i.description, i.unit, i.methodology, \
             i.priority, i.requirement_level, i.standard_id, \
             s.code AS standard_code, s.title AS standard_title, s.category \
             FROM indicators i JOIN standards s ON i.standard_id = s.id",
        );

        let mut conditions = Vec::new();
        if standard_id.is_some() {
            conditions.push("i.standard_id = ?");
        }
        if category.is_some() {
            conditions.push("s.category = ?");
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY s.category, s.code, i.code");

        let mut query = sqlx::query_as::<_, Indicator>(&sql);
        if let Some(standard_id) = standard_id {
            query = query.bind(standard_id);
        }
        if let Some(category) = category {
            query = query.bind(category);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn fetch_responses(
        &self,
        company_id: i64,
        indicator_id: Option<i64>,
    ) -> Result<Vec<DisclosureResponse>> {
        let mut sql = String::from(
            "SELECT r.id, r.company_id, r.indicator_id, r.period, r.response_value, \
             r.numerical_value, r.unit, r.reporting_status, r.notes, \
             i.code AS disclosure_code, i.title AS disclosure_title, \
             s.code AS standard_code, s.category \
             FROM responses r \
             JOIN indicators i ON r.indicator_id = i.id \
             JOIN standards s ON i.standard_id = s.id \
             WHERE r.company_id = ?",
        );
        if indicator_id.is_some() {
            sql.push_str(" AND r.indicator_id = ?");
        }
        sql.push_str(" ORDER BY s.category, i.code, r.period");

        let mut query = sqlx::query_as::<_, DisclosureResponse>(&sql).bind(company_id);
        if let Some(indicator_id) = indicator_id {
            query = query.bind(indicator_id);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn fetch_kpis(&self, indicator_id: Option<i64>) -> Result<Vec<Kpi>> {
        let mut sql = String::from(
            "SELECT k.id, k.indicator_id, k.name, k.formula, k.unit, k.frequency, k.owner, \
             i.code AS disclosure_code, s.code AS standard_code, s.category \
             FROM kpis k \
             JOIN indicators i ON k.indicator_id = i.id \
             JOIN standards s ON i.standard_id = s.id",
        );
        if indicator_id.is_some() {
            sql.push_str(" WHERE k.indicator_id = ?");
        }
        sql.push_str(" ORDER BY s.category, i.code, k.name");

        let mut query = sqlx::query_as::<_, Kpi>(&sql);
        if let Some(indicator_id) = indicator_id {
            query = query.bind(indicator_id);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn fetch_targets(&self, year: Option<i64>) -> Result<Vec<Target>> {
        let mut sql = String::from(
            "SELECT t.id, t.indicator_id, t.year, t.target_value, t.unit, t.method, \
             i.code AS disclosure_code, s.code AS standard_code, s.category \
             FROM targets t \
             JOIN indicators i ON t.indicator_id = i.id \
             JOIN standards s ON i.standard_id = s.id",
        );
        if year.is_some() {
            sql.push_str(" WHERE t.year = ?");
        }
        sql.push_str(" ORDER BY t.year, s.category, i.code");

        let mut query = sqlx::query_as::<_, Target>(&sql);
        if let Some(year) = year {
            query = query.bind(year);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn fetch_risks(&self, risk_level: Option<&str>) -> Result<Vec<Risk>> {
        let mut sql = String::from(
            "SELECT r.id, r.indicator_id, r.risk_level, r.impact, r.likelihood, r.notes, \
             i.code AS disclosure_code, s.code AS standard_code, s.category \
             FROM risks r \
             JOIN indicators i ON r.indicator_id = i.id \
             JOIN standards s ON i.standard_id = s.id",
        );
        if risk_level.is_some() {
            sql.push_str(" WHERE r.risk_level = ?");
        }
        sql.push_str(" ORDER BY r.risk_level, s.category, i.code");

        let mut query = sqlx::query_as::<_, Risk>(&sql);
        if let Some(risk_level) = risk_level {
            query = query.bind(risk_level);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn fetch_mapping_summary(&self) -> Result<MappingSummary> {
        let sdg_mappings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM map_sdg_indicator")
            .fetch_one(&self.pool)
            .await?;

        let framework_mappings: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM map_framework_disclosure")
                .fetch_one(&self.pool)
                .await?;

        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT s.category, COUNT(*) FROM indicators i \
             JOIN standards s ON i.standard_id = s.id \
             GROUP BY s.category",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(MappingSummary {
            sdg_mappings,
            framework_mappings,
            category_distribution: rows.into_iter().collect(),
        })
    }
}

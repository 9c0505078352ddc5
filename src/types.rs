//! Domain record types returned by the report accessors.
//!
//! These are the row shapes the reporting dashboards consume. Each type maps
//! to a query in [`SqliteReportStore`](crate::report::SqliteReportStore);
//! joined display columns (standard code/title, category) are flattened into
//! the record so callers never need a second lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A disclosure standard (e.g. "305: Emissions").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Standard {
    pub id: i64,
    /// Standard code (e.g. "305").
    pub code: String,
    pub title: String,
    /// Reporting category: "Environmental", "Social", "Governance", or "Universal".
    pub category: String,
    /// Standard type (e.g. "topic", "universal").
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub description: Option<String>,
}

/// A disclosure indicator belonging to a [`Standard`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Indicator {
    pub id: i64,
    /// Disclosure code (e.g. "305-1").
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub methodology: Option<String>,
    pub priority: Option<String>,
    pub requirement_level: Option<String>,
    pub standard_id: i64,
    /// Code of the owning standard (joined).
    pub standard_code: String,
    /// Title of the owning standard (joined).
    pub standard_title: String,
    /// Category of the owning standard (joined).
    pub category: String,
}

/// A company's reported response to an indicator for a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DisclosureResponse {
    pub id: i64,
    pub company_id: i64,
    pub indicator_id: i64,
    /// Reporting period (e.g. "2025").
    pub period: String,
    pub response_value: Option<String>,
    pub numerical_value: Option<f64>,
    pub unit: Option<String>,
    pub reporting_status: Option<String>,
    pub notes: Option<String>,
    pub disclosure_code: String,
    pub disclosure_title: String,
    pub standard_code: String,
    pub category: String,
}

/// A key performance indicator derived from a disclosure indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Kpi {
    pub id: i64,
    pub indicator_id: i64,
    pub name: String,
    pub formula: Option<String>,
    pub unit: Option<String>,
    pub frequency: Option<String>,
    pub owner: Option<String>,
    pub disclosure_code: String,
    pub standard_code: String,
    pub category: String,
}

/// A reduction or improvement target set against an indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Target {
    pub id: i64,
    pub indicator_id: i64,
    pub year: i64,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub method: Option<String>,
    pub disclosure_code: String,
    pub standard_code: String,
    pub category: String,
}

/// A sustainability risk associated with an indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Risk {
    pub id: i64,
    pub indicator_id: i64,
    /// Risk level (e.g. "high", "medium", "low").
    pub risk_level: String,
    pub impact: Option<String>,
    pub likelihood: Option<String>,
    pub notes: Option<String>,
    pub disclosure_code: String,
    pub standard_code: String,
    pub category: String,
}

/// Aggregate view of the cross-framework mapping tables.
///
/// Assembled from several count queries rather than a single row, so it
/// does not derive `FromRow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSummary {
    /// Number of SDG ↔ indicator mappings.
    pub sdg_mappings: i64,
    /// Number of disclosure ↔ external-framework mappings.
    pub framework_mappings: i64,
    /// Indicator count per reporting category.
    pub category_distribution: BTreeMap<String, i64>,
}

//! Storage maintenance directives.
//!
//! A sibling service to the query cache, not part of it: it targets the
//! persistent SQLite store, which has its own failure domain and its own
//! concurrency discipline (the pool). It never touches the cache lock —
//! [`CachedReports`](crate::report::CachedReports) clears the cache itself
//! after a maintenance run completes.
//!
//! Directives are coarse and infrequent: create the read-path indexes,
//! refresh planner statistics (`ANALYZE`), reclaim space (`VACUUM`). Every
//! statement runs independently; a failure is captured into the report's
//! `errors` and never raised to the caller, so partial progress (indexes
//! created before a later failing statement) is preserved, not rolled back.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::telemetry;

/// Index statements for the hot read paths of the reporting dashboards.
const INDEX_STATEMENTS: &[(&str, &str)] = &[
    (
        "standards_category",
        "CREATE INDEX IF NOT EXISTS idx_standards_category ON standards(category)",
    ),
    (
        "indicators_standard_id",
        "CREATE INDEX IF NOT EXISTS idx_indicators_standard_id ON indicators(standard_id)",
    ),
    (
        "indicators_code",
        "CREATE INDEX IF NOT EXISTS idx_indicators_code ON indicators(code)",
    ),
    (
        "responses_company_indicator",
        "CREATE INDEX IF NOT EXISTS idx_responses_company_indicator \
         ON responses(company_id, indicator_id)",
    ),
    (
        "responses_period",
        "CREATE INDEX IF NOT EXISTS idx_responses_period ON responses(period)",
    ),
    (
        "kpis_indicator_id",
        "CREATE INDEX IF NOT EXISTS idx_kpis_indicator_id ON kpis(indicator_id)",
    ),
    (
        "targets_year",
        "CREATE INDEX IF NOT EXISTS idx_targets_year ON targets(year)",
    ),
    (
        "risks_level",
        "CREATE INDEX IF NOT EXISTS idx_risks_level ON risks(risk_level)",
    ),
    (
        "map_sdg_indicator_code",
        "CREATE INDEX IF NOT EXISTS idx_map_sdg_indicator_code ON map_sdg_indicator(sdg_code)",
    ),
    (
        "map_framework_disclosure_code",
        "CREATE INDEX IF NOT EXISTS idx_map_framework_disclosure_code \
         ON map_framework_disclosure(disclosure_code)",
    ),
];

/// Tables whose row counts appear in the optimization report.
const REPORT_TABLES: &[&str] = &[
    "standards",
    "indicators",
    "responses",
    "kpis",
    "targets",
    "risks",
];

/// Lifecycle of a maintenance run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenanceState {
    /// No run has started, or the service is between runs.
    Idle,
    /// A directive is currently executing.
    Running,
    /// The last run finished without errors.
    Completed,
    /// The last run recorded at least one error (partial progress kept).
    Failed,
}

/// Result of [`MaintenanceService::create_performance_indexes`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexReport {
    /// Short names of the indexes that were created (or already existed).
    pub created_indexes: Vec<String>,
    /// One message per failed statement.
    pub errors: Vec<String>,
}

/// Result of [`MaintenanceService::optimize_storage`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizeReport {
    /// Whether `ANALYZE` completed.
    pub analyze_completed: bool,
    /// Whether `VACUUM` completed.
    pub vacuum_completed: bool,
    /// Names of all user-created indexes present after the run.
    pub indexes: Vec<String>,
    /// Row count per reporting table.
    pub table_rows: BTreeMap<String, i64>,
    /// One message per failed statement.
    pub errors: Vec<String>,
}

/// Administrator-triggered maintenance over the reporting database.
pub struct MaintenanceService {
    pool: SqlitePool,
    state: Mutex<MaintenanceState>,
}

impl MaintenanceService {
    /// Create a service over an existing connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            state: Mutex::new(MaintenanceState::Idle),
        }
    }

    /// State of the most recent run.
    pub fn state(&self) -> MaintenanceState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: MaintenanceState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Create the read-path indexes, one statement at a time.
    ///
    /// A failing statement is recorded and the remaining statements still
    /// run. Never returns an error to the caller.
    pub async fn create_performance_indexes(&self) -> IndexReport {
        self.set_state(MaintenanceState::Running);
        info!("creating performance indexes");

        let mut report = IndexReport::default();
        for (name, sql) in INDEX_STATEMENTS {
            match sqlx::query(sql).execute(&self.pool).await {
                Ok(_) => report.created_indexes.push((*name).to_string()),
                Err(e) => {
                    warn!(index = name, error = %e, "index creation failed");
                    report.errors.push(format!("{name}: {e}"));
                }
            }
        }

        self.finish("create_indexes", report.errors.is_empty());
        info!(
            created = report.created_indexes.len(),
            failed = report.errors.len(),
            "performance index run finished"
        );
        report
    }

    /// Refresh planner statistics, compact the database, and inventory the
    /// resulting indexes and table sizes.
    pub async fn optimize_storage(&self) -> OptimizeReport {
        self.set_state(MaintenanceState::Running);
        info!("optimizing report storage");

        let mut report = OptimizeReport::default();

        match sqlx::query("ANALYZE").execute(&self.pool).await {
            Ok(_) => report.analyze_completed = true,
            Err(e) => {
                warn!(error = %e, "ANALYZE failed");
                report.errors.push(format!("analyze: {e}"));
            }
        }

        match sqlx::query("VACUUM").execute(&self.pool).await {
            Ok(_) => report.vacuum_completed = true,
            Err(e) => {
                warn!(error = %e, "VACUUM failed");
                report.errors.push(format!("vacuum: {e}"));
            }
        }

        match sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master \
             WHERE type = 'index' AND sql IS NOT NULL ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        {
            Ok(names) => report.indexes = names,
            Err(e) => report.errors.push(format!("index inventory: {e}")),
        }

        for table in REPORT_TABLES {
            // Table names come from a fixed allow-list, never from input.
            let sql = format!("SELECT COUNT(*) FROM {table}");
            match sqlx::query_scalar::<_, i64>(&sql).fetch_one(&self.pool).await {
                Ok(count) => {
                    report.table_rows.insert((*table).to_string(), count);
                }
                Err(e) => report.errors.push(format!("{table}: {e}")),
            }
        }

        self.finish("optimize", report.errors.is_empty());
        info!(
            analyze = report.analyze_completed,
            vacuum = report.vacuum_completed,
            tables = report.table_rows.len(),
            failed = report.errors.len(),
            "storage optimization finished"
        );
        report
    }

    fn finish(&self, directive: &'static str, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(
            telemetry::MAINTENANCE_TOTAL,
            "directive" => directive,
            "status" => status
        )
        .increment(1);
        self.set_state(if ok {
            MaintenanceState::Completed
        } else {
            MaintenanceState::Failed
        });
    }
}

impl std::fmt::Debug for MaintenanceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceService")
            .field("state", &self.state())
            .finish()
    }
}

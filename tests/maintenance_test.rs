//! Tests for [`MaintenanceService`] and the SQLite report store, against
//! real SQLite databases.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use esgcache::{CachedReports, MaintenanceService, MaintenanceState};

// ============================================================================
// Fixtures
// ============================================================================

/// One connection only: each `:memory:` connection is its own database.
async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite")
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE standards (id INTEGER PRIMARY KEY, code TEXT NOT NULL, \
     title TEXT NOT NULL, category TEXT NOT NULL, type TEXT NOT NULL, description TEXT)",
    "CREATE TABLE indicators (id INTEGER PRIMARY KEY, code TEXT NOT NULL, \
     title TEXT NOT NULL, description TEXT, unit TEXT, methodology TEXT, \
     priority TEXT, requirement_level TEXT, standard_id INTEGER NOT NULL)",
    "CREATE TABLE responses (id INTEGER PRIMARY KEY, company_id INTEGER NOT NULL, \
     indicator_id INTEGER NOT NULL, period TEXT NOT NULL, response_value TEXT, \
     numerical_value REAL, unit TEXT, reporting_status TEXT, notes TEXT)",
    "CREATE TABLE kpis (id INTEGER PRIMARY KEY, indicator_id INTEGER NOT NULL, \
     name TEXT NOT NULL, formula TEXT, unit TEXT, frequency TEXT, owner TEXT)",
    "CREATE TABLE targets (id INTEGER PRIMARY KEY, indicator_id INTEGER NOT NULL, \
     year INTEGER NOT NULL, target_value REAL, unit TEXT, method TEXT)",
    "CREATE TABLE risks (id INTEGER PRIMARY KEY, indicator_id INTEGER NOT NULL, \
     risk_level TEXT NOT NULL, impact TEXT, likelihood TEXT, notes TEXT)",
    "CREATE TABLE map_sdg_indicator (id INTEGER PRIMARY KEY, sdg_code TEXT NOT NULL, \
     indicator_code TEXT NOT NULL)",
    "CREATE TABLE map_framework_disclosure (id INTEGER PRIMARY KEY, \
     framework TEXT NOT NULL, disclosure_code TEXT NOT NULL)",
];

async fn create_schema(pool: &SqlitePool, skip: Option<&str>) {
    for stmt in SCHEMA {
        if let Some(table) = skip {
            if stmt.contains(&format!("CREATE TABLE {table} ")) {
                continue;
            }
        }
        sqlx::query(stmt).execute(pool).await.expect("schema");
    }
}

async fn seed(pool: &SqlitePool) {
    let rows = [
        "INSERT INTO standards VALUES (1, '305', 'Emissions', 'Environmental', 'topic', NULL)",
        "INSERT INTO standards VALUES (2, '401', 'Employment', 'Social', 'topic', NULL)",
        "INSERT INTO indicators VALUES (1, '305-1', 'Direct GHG emissions', NULL, 'tCO2e', \
         NULL, 'high', NULL, 1)",
        "INSERT INTO indicators VALUES (2, '401-1', 'New employee hires', NULL, NULL, \
         NULL, NULL, NULL, 2)",
        "INSERT INTO responses VALUES (1, 1, 1, '2025', '12,400 tCO2e', 12400.0, 'tCO2e', \
         'reported', NULL)",
        "INSERT INTO kpis VALUES (1, 1, 'Total GHG', 'scope1 + scope2', 'tCO2e', 'annual', NULL)",
        "INSERT INTO targets VALUES (1, 1, 2030, -42.0, '%', 'SBTi')",
        "INSERT INTO risks VALUES (1, 1, 'high', 'regulatory', 'likely', NULL)",
        "INSERT INTO map_sdg_indicator VALUES (1, 'SDG-13', '305-1')",
        "INSERT INTO map_framework_disclosure VALUES (1, 'ESRS', '305-1')",
    ];
    for row in rows {
        sqlx::query(row).execute(pool).await.expect("seed");
    }
}

// ============================================================================
// Index creation
// ============================================================================

#[tokio::test]
async fn creates_all_performance_indexes() {
    let pool = memory_pool().await;
    create_schema(&pool, None).await;

    let service = MaintenanceService::new(pool.clone());
    assert_eq!(service.state(), MaintenanceState::Idle);

    let report = service.create_performance_indexes().await;
    assert_eq!(report.created_indexes.len(), 10);
    assert!(report.errors.is_empty());
    assert_eq!(service.state(), MaintenanceState::Completed);

    // The indexes really exist in the catalog.
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND sql IS NOT NULL",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert!(names.contains(&"idx_standards_category".to_string()));
    assert!(names.contains(&"idx_responses_company_indicator".to_string()));
}

#[tokio::test]
async fn index_creation_is_idempotent() {
    let pool = memory_pool().await;
    create_schema(&pool, None).await;
    let service = MaintenanceService::new(pool);

    let first = service.create_performance_indexes().await;
    let second = service.create_performance_indexes().await;
    assert_eq!(first.created_indexes, second.created_indexes);
    assert!(second.errors.is_empty());
}

#[tokio::test]
async fn failing_statement_preserves_partial_progress() {
    let pool = memory_pool().await;
    // No risks table: its index statement must fail, the rest must not.
    create_schema(&pool, Some("risks")).await;

    let service = MaintenanceService::new(pool.clone());
    let report = service.create_performance_indexes().await;

    assert_eq!(report.created_indexes.len(), 9);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("risks_level:"));
    assert_eq!(service.state(), MaintenanceState::Failed);

    // Indexes created before and after the failing statement are kept.
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND sql IS NOT NULL",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert!(names.contains(&"idx_standards_category".to_string()));
    assert!(names.contains(&"idx_map_sdg_indicator_code".to_string()));
}

// ============================================================================
// Storage optimization
// ============================================================================

#[tokio::test]
async fn optimize_reports_row_counts_and_indexes() {
    let pool = memory_pool().await;
    create_schema(&pool, None).await;
    seed(&pool).await;

    let service = MaintenanceService::new(pool);
    service.create_performance_indexes().await;

    let report = service.optimize_storage().await;
    assert!(report.analyze_completed);
    assert!(report.vacuum_completed);
    assert!(report.errors.is_empty());
    assert_eq!(service.state(), MaintenanceState::Completed);

    assert_eq!(report.table_rows.get("standards"), Some(&2));
    assert_eq!(report.table_rows.get("indicators"), Some(&2));
    assert_eq!(report.table_rows.get("responses"), Some(&1));
    assert_eq!(report.table_rows.get("risks"), Some(&1));
    assert!(report.indexes.contains(&"idx_targets_year".to_string()));
}

#[tokio::test]
async fn optimize_captures_errors_for_missing_tables() {
    let pool = memory_pool().await;
    create_schema(&pool, Some("kpis")).await;

    let service = MaintenanceService::new(pool);
    let report = service.optimize_storage().await;

    // ANALYZE/VACUUM still ran; only the kpis row count failed.
    assert!(report.analyze_completed);
    assert!(report.vacuum_completed);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("kpis:"));
    assert!(report.table_rows.get("kpis").is_none());
    assert_eq!(report.table_rows.get("standards"), Some(&0));
    assert_eq!(service.state(), MaintenanceState::Failed);
}

#[tokio::test]
async fn optimize_works_on_a_file_backed_database() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("reports.db").display());
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("file-backed sqlite");
    create_schema(&pool, None).await;
    seed(&pool).await;

    let service = MaintenanceService::new(pool);
    let report = service.optimize_storage().await;
    assert!(report.vacuum_completed);
    assert!(report.errors.is_empty());
}

// ============================================================================
// End to end: SQLite store behind the cached facade
// ============================================================================

#[tokio::test]
async fn cached_reports_over_sqlite_round_trip() {
    let pool = memory_pool().await;
    create_schema(&pool, None).await;
    seed(&pool).await;

    let reports = CachedReports::builder()
        .pool(pool)
        .ttl_seconds(3600)
        .build()
        .unwrap();

    let environmental = reports.standards(Some("Environmental")).await.unwrap();
    assert_eq!(environmental.len(), 1);
    assert_eq!(environmental[0].code, "305");
    assert_eq!(environmental[0].kind, "topic");

    let all = reports.standards(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let indicators = reports.indicators(Some(1), None).await.unwrap();
    assert_eq!(indicators.len(), 1);
    assert_eq!(indicators[0].standard_code, "305");
    assert_eq!(indicators[0].category, "Environmental");

    let responses = reports.responses(1, None).await.unwrap();
    assert_eq!(responses[0].disclosure_code, "305-1");
    assert_eq!(responses[0].numerical_value, Some(12_400.0));

    let kpis = reports.kpis(None).await.unwrap();
    assert_eq!(kpis[0].name, "Total GHG");

    let targets = reports.targets(Some(2030)).await.unwrap();
    assert_eq!(targets[0].target_value, Some(-42.0));

    let risks = reports.risks(Some("high")).await.unwrap();
    assert_eq!(risks[0].impact.as_deref(), Some("regulatory"));

    let summary = reports.mapping_summary().await.unwrap();
    assert_eq!(summary.sdg_mappings, 1);
    assert_eq!(summary.framework_mappings, 1);
    assert_eq!(summary.category_distribution.get("Environmental"), Some(&1));
    assert_eq!(summary.category_distribution.get("Social"), Some(&1));

    // Second identical call is a hit.
    reports.standards(Some("Environmental")).await.unwrap();
    assert_eq!(reports.cache_stats().performance.cache_hits, 1);
}

#[tokio::test]
async fn maintenance_through_the_facade_clears_the_cache() {
    let pool = memory_pool().await;
    create_schema(&pool, None).await;
    seed(&pool).await;

    let reports = CachedReports::builder()
        .pool(pool)
        .ttl_seconds(3600)
        .build()
        .unwrap();

    reports.standards(None).await.unwrap();
    assert_eq!(reports.cache_stats().cache_size, 1);

    let index_report = reports.create_performance_indexes().await.unwrap();
    assert!(index_report.errors.is_empty());
    assert_eq!(reports.cache_stats().cache_size, 0);

    reports.kpis(None).await.unwrap();
    let optimize_report = reports.optimize_storage().await.unwrap();
    assert!(optimize_report.analyze_completed);
    assert_eq!(reports.cache_stats().cache_size, 0);
}

//! Common test utilities for integration tests
//!
//! Shared fixtures for building records and an engine over an in-memory
//! SQLite database.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;

use studio_taskgen::adapters::sqlite::{
    create_migrated_test_pool, RecordBatch, SqliteRecordSource, SqliteTaskStore,
};
use studio_taskgen::domain::models::{
    EmployeeRosterEntry, EngineConfig, Lead, LeadStatus, Quotation, QuotationStatus,
};
use studio_taskgen::services::TaskGenerationEngine;

pub type SqliteEngine = TaskGenerationEngine<SqliteRecordSource, SqliteTaskStore>;

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Fixed pass snapshot so ages are exact.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

#[allow(dead_code)]
pub fn quotation(id: i64, total: f64, status: QuotationStatus, age_days: i64) -> Quotation {
    Quotation::new(id, format!("Client {id}"), total, status, days_ago(age_days))
}

#[allow(dead_code)]
pub fn lead(id: i64, status: LeadStatus, age_days: i64) -> Lead {
    Lead::new(id, format!("Prospect {id}"), status, days_ago(age_days))
}

#[allow(dead_code)]
pub fn sales_roster() -> Vec<EmployeeRosterEntry> {
    vec![
        EmployeeRosterEntry::new(1, "Meera")
            .with_role("Sales Head")
            .with_department("Sales"),
        EmployeeRosterEntry::new(2, "Kabir")
            .with_role("Sales Executive")
            .with_department("Sales"),
        EmployeeRosterEntry::new(3, "Ishaan")
            .with_role("Accounts")
            .with_department("Finance"),
    ]
}

/// In-memory database seeded with `batch`.
pub async fn seeded_pool(batch: RecordBatch) -> SqlitePool {
    let pool = create_migrated_test_pool()
        .await
        .expect("Failed to create test database");
    SqliteRecordSource::new(pool.clone())
        .import(&batch)
        .await
        .expect("Failed to seed records");
    pool
}

pub fn engine(pool: &SqlitePool, config: &EngineConfig) -> SqliteEngine {
    TaskGenerationEngine::new(
        Arc::new(SqliteRecordSource::new(pool.clone())),
        Arc::new(SqliteTaskStore::new(pool.clone())),
        config,
    )
}

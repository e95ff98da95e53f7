//! SQLite-backed business record source, plus bulk import of records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::adapters::sqlite::{format_datetime, parse_datetime, parse_json_or_default};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{EmployeeRosterEntry, Lead, LeadStatus, Quotation, QuotationStatus};
use crate::domain::ports::BusinessRecordSource;

#[derive(Clone)]
pub struct SqliteRecordSource {
    pool: SqlitePool,
}

/// Records loaded from an import file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecordBatch {
    #[serde(default)]
    pub quotations: Vec<Quotation>,
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub employees: Vec<EmployeeRosterEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub quotations: usize,
    pub leads: usize,
    pub employees: usize,
}

impl SqliteRecordSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Upsert every record in the batch by id, in one transaction.
    pub async fn import(&self, batch: &RecordBatch) -> DomainResult<ImportSummary> {
        for quotation in &batch.quotations {
            quotation.validate().map_err(DomainError::ValidationFailed)?;
        }
        for lead in &batch.leads {
            lead.validate().map_err(DomainError::ValidationFailed)?;
        }

        let mut tx = self.pool.begin().await?;

        for q in &batch.quotations {
            sqlx::query(
                r#"INSERT INTO quotations (id, client_name, total_amount, status, created_at, updated_at)
                   VALUES (?, ?, ?, ?, ?, ?)
                   ON CONFLICT(id) DO UPDATE SET
                       client_name = excluded.client_name,
                       total_amount = excluded.total_amount,
                       status = excluded.status,
                       created_at = excluded.created_at,
                       updated_at = excluded.updated_at"#,
            )
            .bind(q.id)
            .bind(&q.client_name)
            .bind(q.total_amount)
            .bind(q.status.as_str())
            .bind(format_datetime(q.created_at))
            .bind(format_datetime(q.updated_at))
            .execute(&mut *tx)
            .await?;
        }

        for l in &batch.leads {
            sqlx::query(
                r#"INSERT INTO leads (id, client_name, company_name, status, estimated_value, created_at, updated_at)
                   VALUES (?, ?, ?, ?, ?, ?, ?)
                   ON CONFLICT(id) DO UPDATE SET
                       client_name = excluded.client_name,
                       company_name = excluded.company_name,
                       status = excluded.status,
                       estimated_value = excluded.estimated_value,
                       created_at = excluded.created_at,
                       updated_at = excluded.updated_at"#,
            )
            .bind(l.id)
            .bind(&l.client_name)
            .bind(&l.company_name)
            .bind(l.status.as_str())
            .bind(l.estimated_value)
            .bind(format_datetime(l.created_at))
            .bind(format_datetime(l.updated_at))
            .execute(&mut *tx)
            .await?;
        }

        for e in &batch.employees {
            let role_titles = serde_json::to_string(&e.role_titles)?;
            sqlx::query(
                r#"INSERT INTO employees (id, name, role_titles, department, is_active)
                   VALUES (?, ?, ?, ?, ?)
                   ON CONFLICT(id) DO UPDATE SET
                       name = excluded.name,
                       role_titles = excluded.role_titles,
                       department = excluded.department,
                       is_active = excluded.is_active"#,
            )
            .bind(e.id)
            .bind(&e.name)
            .bind(role_titles)
            .bind(&e.department)
            .bind(e.is_active)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(ImportSummary {
            quotations: batch.quotations.len(),
            leads: batch.leads.len(),
            employees: batch.employees.len(),
        })
    }
}

fn unavailable(err: sqlx::Error) -> DomainError {
    DomainError::SourceUnavailable(err.to_string())
}

#[async_trait]
impl BusinessRecordSource for SqliteRecordSource {
    async fn list_quotations(&self) -> DomainResult<Vec<Quotation>> {
        let rows: Vec<QuotationRow> = sqlx::query_as(
            "SELECT id, client_name, total_amount, status, created_at, updated_at
             FROM quotations ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        rows.into_iter().map(Quotation::try_from).collect()
    }

    async fn list_leads(&self) -> DomainResult<Vec<Lead>> {
        let rows: Vec<LeadRow> = sqlx::query_as(
            "SELECT id, client_name, company_name, status, estimated_value, created_at, updated_at
             FROM leads ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        rows.into_iter().map(Lead::try_from).collect()
    }

    async fn list_active_employees(&self) -> DomainResult<Vec<EmployeeRosterEntry>> {
        let rows: Vec<EmployeeRow> = sqlx::query_as(
            "SELECT id, name, role_titles, department, is_active
             FROM employees WHERE is_active = 1 ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        rows.into_iter().map(EmployeeRosterEntry::try_from).collect()
    }
}

#[derive(sqlx::FromRow)]
struct QuotationRow {
    id: i64,
    client_name: String,
    total_amount: f64,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<QuotationRow> for Quotation {
    type Error = DomainError;

    fn try_from(row: QuotationRow) -> Result<Self, Self::Error> {
        let status = QuotationStatus::from_str(&row.status).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid quotation status: {}", row.status))
        })?;
        Ok(Quotation::new(
            row.id,
            row.client_name,
            row.total_amount,
            status,
            parse_datetime(&row.created_at)?,
        )
        .with_updated_at(parse_datetime(&row.updated_at)?))
    }
}

#[derive(sqlx::FromRow)]
struct LeadRow {
    id: i64,
    client_name: String,
    company_name: Option<String>,
    status: String,
    estimated_value: Option<f64>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<LeadRow> for Lead {
    type Error = DomainError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        let status = LeadStatus::from_str(&row.status).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid lead status: {}", row.status))
        })?;
        Ok(Lead {
            id: row.id,
            client_name: row.client_name,
            company_name: row.company_name,
            status,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            estimated_value: row.estimated_value,
        })
    }
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: i64,
    name: String,
    role_titles: Option<String>,
    department: Option<String>,
    is_active: i64,
}

impl TryFrom<EmployeeRow> for EmployeeRosterEntry {
    type Error = DomainError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(EmployeeRosterEntry {
            id: row.id,
            name: row.name,
            role_titles: parse_json_or_default(row.role_titles)?,
            department: row.department,
            is_active: row.is_active != 0,
        })
    }
}

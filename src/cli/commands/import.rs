//! Implementation of the `taskgen import` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::adapters::sqlite::{ImportSummary, RecordBatch, SqliteRecordSource};
use crate::cli::commands::open_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file with `quotations`, `leads` and `employees` arrays
    pub file: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct ImportOutput {
    pub source: PathBuf,
    #[serde(flatten)]
    pub summary: ImportSummary,
}

impl CommandOutput for ImportOutput {
    fn to_human(&self) -> String {
        format!(
            "Imported from {}:\n  Quotations: {}\n  Leads: {}\n  Employees: {}",
            self.source.display(),
            self.summary.quotations,
            self.summary.leads,
            self.summary.employees
        )
    }
}

pub async fn execute(args: ImportArgs, config: &Config, json_mode: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let batch: RecordBatch = serde_json::from_str(&content)
        .with_context(|| format!("Invalid record file {}", args.file.display()))?;

    let pool = open_database(config).await?;
    let source = SqliteRecordSource::new(pool);
    let summary = source.import(&batch).await.context("Import failed")?;

    info!(
        file = %args.file.display(),
        quotations = summary.quotations,
        leads = summary.leads,
        employees = summary.employees,
        "Records imported"
    );

    output(&ImportOutput { source: args.file, summary }, json_mode);
    Ok(())
}

//! Implementation of the `taskgen generate` command.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use std::sync::Arc;

use crate::adapters::sqlite::{SqliteRecordSource, SqliteReminderDispatcher, SqliteTaskStore};
use crate::adapters::LoggingDispatcher;
use crate::cli::commands::open_database;
use crate::cli::output::{output, priority_cell, short_id, table, truncate, CommandOutput};
use crate::domain::models::Config;
use crate::services::{format_amount, GenerationOutcome, ReminderPlanner, TaskGenerationEngine};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Create tasks without scheduling reminders
    #[arg(long)]
    pub no_reminders: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct GenerateOutput {
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
    #[serde(skip)]
    pub currency_symbol: String,
}

impl CommandOutput for GenerateOutput {
    fn to_human(&self) -> String {
        let mut text = self.outcome.summary(&self.currency_symbol);
        if self.outcome.tasks.is_empty() {
            return text;
        }

        let mut t = table(["ID", "PRIORITY", "TITLE", "ASSIGNEE", "DUE", "VALUE"]);
        for task in &self.outcome.tasks {
            t.add_row(vec![
                Cell::new(short_id(&task.id)),
                priority_cell(task.priority),
                Cell::new(truncate(&task.title, 48)),
                Cell::new(task.assigned_to.as_deref().unwrap_or("-")),
                Cell::new(task.due_date.format("%Y-%m-%d")),
                Cell::new(format_amount(&self.currency_symbol, task.estimated_value)),
            ]);
        }
        text.push('\n');
        text.push_str(&t.to_string());
        text
    }
}

pub async fn execute(args: GenerateArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = open_database(config).await?;

    let source = Arc::new(SqliteRecordSource::new(pool.clone()));
    let store = Arc::new(SqliteTaskStore::new(pool.clone()));
    let mut engine =
        TaskGenerationEngine::new(source, store, &config.engine).with_dispatcher(Arc::new(LoggingDispatcher));
    if !args.no_reminders {
        let planner = ReminderPlanner::new(config.engine.currency_symbol.clone());
        engine = engine.with_dispatcher(Arc::new(SqliteReminderDispatcher::new(pool, planner)));
    }

    let outcome = engine.generate_now().await.context("Task generation failed")?;

    output(
        &GenerateOutput {
            outcome,
            currency_symbol: config.engine.currency_symbol.clone(),
        },
        json_mode,
    );
    Ok(())
}

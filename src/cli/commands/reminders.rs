//! Reminder CLI commands.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use comfy_table::Cell;

use crate::adapters::sqlite::SqliteReminderDispatcher;
use crate::cli::commands::open_database;
use crate::cli::output::{output, short_id, table, truncate, CommandOutput};
use crate::domain::models::{Config, Reminder};
use crate::services::ReminderPlanner;

#[derive(Args, Debug)]
pub struct RemindersArgs {
    #[command(subcommand)]
    pub command: RemindersCommands,
}

#[derive(Subcommand, Debug)]
pub enum RemindersCommands {
    /// List unsent reminders whose time has come
    Due {
        /// Record the listed reminders as sent
        #[arg(long)]
        mark_sent: bool,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct DueRemindersOutput {
    pub reminders: Vec<Reminder>,
    pub marked_sent: bool,
}

impl CommandOutput for DueRemindersOutput {
    fn to_human(&self) -> String {
        if self.reminders.is_empty() {
            return "No reminders due.".to_string();
        }

        let mut t = table(["TASK", "KIND", "CHANNEL", "RECIPIENT", "SCHEDULED", "MESSAGE"]);
        for r in &self.reminders {
            t.add_row(vec![
                Cell::new(short_id(&r.task_id)),
                Cell::new(r.kind.as_str()),
                Cell::new(r.channel.as_str()),
                Cell::new(r.recipient.as_deref().unwrap_or("-")),
                Cell::new(r.scheduled_at.format("%Y-%m-%d %H:%M")),
                Cell::new(truncate(&r.message, 60)),
            ]);
        }
        let mut text = t.to_string();
        if self.marked_sent {
            text.push_str(&format!("\n\nMarked {} reminder(s) as sent", self.reminders.len()));
        }
        text
    }
}

pub async fn execute(args: RemindersArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = open_database(config).await?;
    let dispatcher =
        SqliteReminderDispatcher::new(pool, ReminderPlanner::new(config.engine.currency_symbol.clone()));

    match args.command {
        RemindersCommands::Due { mark_sent } => {
            let now = Utc::now();
            let reminders = dispatcher
                .due_reminders(now)
                .await
                .context("Failed to load due reminders")?;

            if mark_sent {
                for reminder in &reminders {
                    dispatcher.mark_sent(reminder.id, now).await?;
                }
            }

            output(&DueRemindersOutput { reminders, marked_sent: mark_sent }, json_mode);
        }
    }
    Ok(())
}

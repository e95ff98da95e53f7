//! Task CLI commands.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use comfy_table::Cell;
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::sqlite::{SqliteReminderDispatcher, SqliteTaskStore};
use crate::cli::commands::open_database;
use crate::cli::output::{output, priority_cell, short_id, status_cell, table, truncate, CommandOutput};
use crate::domain::models::{Config, Reminder, Task, TaskStatus};
use crate::domain::ports::{AssigneePerformance, TaskFilter};
use crate::services::{format_amount, ReminderPlanner, TaskService};

#[derive(Args, Debug)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommands,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks, highest priority first
    List {
        /// Filter by status (pending, in_progress, completed, cancelled, overdue)
        #[arg(short, long)]
        status: Option<String>,
        /// Filter by assignee name
        #[arg(short, long)]
        assignee: Option<String>,
        /// Only pending and in-progress tasks
        #[arg(long)]
        open: bool,
        /// Maximum number of tasks to show
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },
    /// Show task details and scheduled reminders
    Show {
        /// Task ID or unique prefix
        id: String,
    },
    /// Change a task's status
    Update {
        /// Task ID or unique prefix
        id: String,
        /// New status
        #[arg(short, long)]
        status: String,
        /// Completion notes (kept when completing)
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Mark open tasks past their due date as overdue
    Overdue,
    /// Per-assignee statistics
    Performance,
}

#[derive(Debug, serde::Serialize)]
pub struct TaskListOutput {
    pub tasks: Vec<Task>,
    pub total: usize,
    #[serde(skip)]
    pub currency_symbol: String,
}

impl CommandOutput for TaskListOutput {
    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return "No tasks found.".to_string();
        }

        let mut t = table(["ID", "PRIORITY", "STATUS", "TITLE", "ASSIGNEE", "DUE", "VALUE"]);
        for task in &self.tasks {
            t.add_row(vec![
                Cell::new(short_id(&task.id)),
                priority_cell(task.priority),
                status_cell(task.status),
                Cell::new(truncate(&task.title, 40)),
                Cell::new(task.assigned_to.as_deref().unwrap_or("-")),
                Cell::new(task.due_date.format("%Y-%m-%d")),
                Cell::new(format_amount(&self.currency_symbol, task.estimated_value)),
            ]);
        }
        format!("{t}\n\nShowing {} task(s)", self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TaskDetailOutput {
    pub task: Task,
    pub reminders: Vec<Reminder>,
    #[serde(skip)]
    pub currency_symbol: String,
}

impl CommandOutput for TaskDetailOutput {
    fn to_human(&self) -> String {
        let task = &self.task;
        let mut lines = vec![
            format!("Task: {}", task.title),
            format!("ID: {}", task.id),
            format!("Rule: {}", task.rule_id),
            format!("Subject: {} #{} ({})", task.subject_type, task.subject_id, task.client_name),
            format!("Priority: {}", task.priority),
            format!("Status: {}", task.status),
            format!("Assigned to: {}", task.assigned_to.as_deref().unwrap_or("unassigned")),
            format!("Value: {}", format_amount(&self.currency_symbol, task.estimated_value)),
            format!("Due: {}", task.due_date.format("%Y-%m-%d %H:%M UTC")),
            format!("Created: {}", task.created_at.format("%Y-%m-%d %H:%M UTC")),
        ];
        if let Some(completed_at) = task.completed_at {
            lines.push(format!("Completed: {}", completed_at.format("%Y-%m-%d %H:%M UTC")));
        }
        if let Some(notes) = &task.completion_notes {
            lines.push(format!("Notes: {notes}"));
        }

        lines.push(format!("\n{}", task.description));
        lines.push(format!("\nReasoning: {}", task.reasoning));
        lines.push(format!("Business impact: {}", task.business_impact));

        if !self.reminders.is_empty() {
            lines.push("\nReminders:".to_string());
            for r in &self.reminders {
                lines.push(format!(
                    "  - {} via {} at {}",
                    r.kind.as_str(),
                    r.channel.as_str(),
                    r.scheduled_at.format("%Y-%m-%d %H:%M UTC")
                ));
            }
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TaskActionOutput {
    pub success: bool,
    pub message: String,
    pub tasks: Vec<Task>,
}

impl CommandOutput for TaskActionOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        for task in &self.tasks {
            lines.push(format!("  - {} {} ({})", short_id(&task.id), truncate(&task.title, 48), task.status));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct PerformanceOutput {
    pub assignees: Vec<AssigneePerformance>,
    #[serde(skip)]
    pub currency_symbol: String,
}

impl CommandOutput for PerformanceOutput {
    fn to_human(&self) -> String {
        if self.assignees.is_empty() {
            return "No assigned tasks yet.".to_string();
        }

        let mut t = table(["ASSIGNEE", "TOTAL", "OPEN", "COMPLETED", "OVERDUE", "RATE", "REVENUE"]);
        for p in &self.assignees {
            t.add_row(vec![
                Cell::new(&p.assigned_to),
                Cell::new(p.total_tasks),
                Cell::new(p.open_tasks),
                Cell::new(p.completed_tasks),
                Cell::new(p.overdue_tasks),
                Cell::new(format!("{:.0}%", p.completion_rate() * 100.0)),
                Cell::new(format_amount(&self.currency_symbol, p.revenue_impact)),
            ]);
        }
        t.to_string()
    }
}

pub async fn execute(args: TaskArgs, config: &Config, json_mode: bool) -> Result<()> {
    let pool = open_database(config).await?;
    let service = TaskService::new(Arc::new(SqliteTaskStore::new(pool.clone())));
    let currency_symbol = config.engine.currency_symbol.clone();

    match args.command {
        TaskCommands::List { status, assignee, open, limit } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let tasks = service
                .list_tasks(TaskFilter {
                    status,
                    assigned_to: assignee,
                    open_only: open,
                    limit: Some(limit),
                    ..TaskFilter::default()
                })
                .await
                .context("Failed to list tasks")?;

            let out = TaskListOutput { total: tasks.len(), tasks, currency_symbol };
            output(&out, json_mode);
        }

        TaskCommands::Show { id } => {
            let task_id = resolve_task_id(&service, &id).await?;
            let task = service
                .get_task(task_id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Task {id} not found. Use 'taskgen task list' to see tasks."))?;

            let dispatcher =
                SqliteReminderDispatcher::new(pool, ReminderPlanner::new(currency_symbol.clone()));
            let reminders = dispatcher.reminders_for(task_id).await?;

            output(&TaskDetailOutput { task, reminders, currency_symbol }, json_mode);
        }

        TaskCommands::Update { id, status, notes } => {
            let status = parse_status(&status)?;
            let task_id = resolve_task_id(&service, &id).await?;
            let task = service
                .update_status(task_id, status, notes, Utc::now())
                .await
                .with_context(|| format!("Failed to update task {id}"))?;

            let out = TaskActionOutput {
                success: true,
                message: format!("Task {} is now {}", task.id, task.status),
                tasks: vec![task],
            };
            output(&out, json_mode);
        }

        TaskCommands::Overdue => {
            let moved = service
                .mark_overdue(Utc::now())
                .await
                .context("Failed to mark overdue tasks")?;

            let out = TaskActionOutput {
                success: true,
                message: format!("Marked {} task(s) overdue", moved.len()),
                tasks: moved,
            };
            output(&out, json_mode);
        }

        TaskCommands::Performance => {
            let assignees = service.performance().await.context("Failed to load performance")?;
            output(&PerformanceOutput { assignees, currency_symbol }, json_mode);
        }
    }

    Ok(())
}

fn parse_status(s: &str) -> Result<TaskStatus> {
    TaskStatus::from_str(s).ok_or_else(|| {
        anyhow::anyhow!("Invalid status '{s}'. Use pending, in_progress, completed, cancelled or overdue.")
    })
}

/// Accept a full UUID or a unique prefix of one.
async fn resolve_task_id(service: &TaskService<SqliteTaskStore>, id: &str) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    let prefix = id.to_lowercase();
    let matches: Vec<Uuid> = service
        .list_tasks(TaskFilter::default())
        .await?
        .into_iter()
        .map(|t| t.id)
        .filter(|uuid| uuid.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [single] => Ok(*single),
        [] => anyhow::bail!("No task matches '{id}'"),
        _ => anyhow::bail!("'{id}' matches {} tasks; use a longer prefix", matches.len()),
    }
}

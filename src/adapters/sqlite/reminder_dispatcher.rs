//! Notification dispatcher that schedules reminders in SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::adapters::sqlite::{format_datetime, parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{NotificationChannel, Reminder, ReminderKind, Task};
use crate::domain::ports::NotificationDispatcher;
use crate::services::reminder_planner::ReminderPlanner;

#[derive(Clone)]
pub struct SqliteReminderDispatcher {
    pool: SqlitePool,
    planner: ReminderPlanner,
}

impl SqliteReminderDispatcher {
    pub fn new(pool: SqlitePool, planner: ReminderPlanner) -> Self {
        Self { pool, planner }
    }

    /// Reminders for a task, in schedule order.
    pub async fn reminders_for(&self, task_id: Uuid) -> DomainResult<Vec<Reminder>> {
        let rows: Vec<ReminderRow> = sqlx::query_as(
            "SELECT id, task_id, kind, channel, scheduled_at, recipient, recipient_employee_id, message
             FROM task_reminders WHERE task_id = ? ORDER BY scheduled_at, kind",
        )
        .bind(task_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Reminder::try_from).collect()
    }

    /// Unsent reminders scheduled at or before `now` whose task is still live.
    ///
    /// Reminders of completed or cancelled tasks are never due.
    pub async fn due_reminders(&self, now: DateTime<Utc>) -> DomainResult<Vec<Reminder>> {
        let rows: Vec<ReminderRow> = sqlx::query_as(
            "SELECT r.id, r.task_id, r.kind, r.channel, r.scheduled_at, r.recipient,
                    r.recipient_employee_id, r.message
             FROM task_reminders r
             JOIN tasks t ON t.id = r.task_id
             WHERE r.sent_at IS NULL AND r.scheduled_at <= ?
               AND t.status IN ('pending', 'in_progress', 'overdue')
             ORDER BY r.scheduled_at",
        )
        .bind(format_datetime(now))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Reminder::try_from).collect()
    }

    pub async fn mark_sent(&self, reminder_id: Uuid, at: DateTime<Utc>) -> DomainResult<()> {
        sqlx::query("UPDATE task_reminders SET sent_at = ? WHERE id = ?")
            .bind(format_datetime(at))
            .bind(reminder_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationDispatcher for SqliteReminderDispatcher {
    async fn notify_assignment(&self, task: &Task) -> DomainResult<()> {
        let reminders = self.planner.plan(task);
        let mut tx = self.pool.begin().await?;

        for reminder in &reminders {
            sqlx::query(
                r#"INSERT INTO task_reminders (id, task_id, kind, channel, scheduled_at,
                   recipient, recipient_employee_id, message)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                   ON CONFLICT(id) DO NOTHING"#,
            )
            .bind(reminder.id.to_string())
            .bind(reminder.task_id.to_string())
            .bind(reminder.kind.as_str())
            .bind(reminder.channel.as_str())
            .bind(format_datetime(reminder.scheduled_at))
            .bind(&reminder.recipient)
            .bind(reminder.recipient_employee_id)
            .bind(&reminder.message)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(task_id = %task.id, reminders = reminders.len(), "Reminders scheduled");
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ReminderRow {
    id: String,
    task_id: String,
    kind: String,
    channel: String,
    scheduled_at: String,
    recipient: Option<String>,
    recipient_employee_id: Option<i64>,
    message: String,
}

impl TryFrom<ReminderRow> for Reminder {
    type Error = DomainError;

    fn try_from(row: ReminderRow) -> Result<Self, Self::Error> {
        Ok(Reminder {
            id: parse_uuid(&row.id)?,
            task_id: parse_uuid(&row.task_id)?,
            kind: ReminderKind::from_str(&row.kind).ok_or_else(|| {
                DomainError::SerializationError(format!("Invalid reminder kind: {}", row.kind))
            })?,
            channel: NotificationChannel::from_str(&row.channel).ok_or_else(|| {
                DomainError::SerializationError(format!("Invalid channel: {}", row.channel))
            })?,
            scheduled_at: parse_datetime(&row.scheduled_at)?,
            recipient: row.recipient,
            recipient_employee_id: row.recipient_employee_id,
            message: row.message,
        })
    }
}

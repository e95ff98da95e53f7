use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::models::{NotificationChannel, Reminder, ReminderKind, Task, TaskPriority};
use crate::services::rule_catalog::format_amount;

/// Plans the reminders that accompany a newly created task.
///
/// Every task gets an in-app assignment notice, an email one day before the
/// due date and an in-app overdue alert at the due date. Urgent tasks also
/// get an immediate SMS escalation. A due-soon reminder that would fire
/// before the task existed is dropped.
#[derive(Debug, Clone)]
pub struct ReminderPlanner {
    currency_symbol: String,
}

impl ReminderPlanner {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn plan(&self, task: &Task) -> Vec<Reminder> {
        let value = format_amount(&self.currency_symbol, task.estimated_value);
        let due = task.due_date.format("%Y-%m-%d");
        let mut reminders = Vec::with_capacity(4);

        reminders.push(self.reminder(
            task,
            ReminderKind::Assignment,
            NotificationChannel::InApp,
            task.created_at,
            format!(
                "New {} priority task assigned: \"{}\" - Due: {due}",
                task.priority.as_str(),
                task.title
            ),
        ));

        let due_soon_at = task.due_date - Duration::days(1);
        if due_soon_at >= task.created_at {
            reminders.push(self.reminder(
                task,
                ReminderKind::DueSoon,
                NotificationChannel::Email,
                due_soon_at,
                format!(
                    "Reminder: task \"{}\" is due in 24 hours. Client value: {value}",
                    task.title
                ),
            ));
        }

        reminders.push(self.reminder(
            task,
            ReminderKind::Overdue,
            NotificationChannel::InApp,
            task.due_date,
            format!(
                "URGENT: task \"{}\" is overdue. Revenue impact: {value}",
                task.title
            ),
        ));

        if task.priority == TaskPriority::Urgent {
            reminders.push(self.reminder(
                task,
                ReminderKind::Escalation,
                NotificationChannel::Sms,
                task.created_at,
                format!(
                    "URGENT TASK: {} for {}. Revenue impact: {value}. Please check your dashboard immediately.",
                    task.title, task.client_name
                ),
            ));
        }

        reminders
    }

    fn reminder(
        &self,
        task: &Task,
        kind: ReminderKind,
        channel: NotificationChannel,
        scheduled_at: DateTime<Utc>,
        message: String,
    ) -> Reminder {
        Reminder {
            id: Uuid::new_v5(&task.id, kind.as_str().as_bytes()),
            task_id: task.id,
            kind,
            channel,
            scheduled_at,
            recipient: task.assigned_to.clone(),
            recipient_employee_id: task.assigned_employee_id,
            message,
        }
    }
}

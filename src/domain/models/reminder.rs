//! Reminders scheduled for generated tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// Sent when the task is created
    Assignment,
    /// One day before the due date
    DueSoon,
    /// At the due date
    Overdue,
    /// Immediate escalation for urgent work
    Escalation,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::DueSoon => "due_soon",
            Self::Overdue => "overdue",
            Self::Escalation => "escalation",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "assignment" => Some(Self::Assignment),
            "due_soon" => Some(Self::DueSoon),
            "overdue" => Some(Self::Overdue),
            "escalation" => Some(Self::Escalation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    InApp,
    Email,
    Sms,
}

impl NotificationChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InApp => "in_app",
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "in_app" => Some(Self::InApp),
            "email" => Some(Self::Email),
            "sms" => Some(Self::Sms),
            _ => None,
        }
    }
}

/// A scheduled notification about a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub task_id: Uuid,
    pub kind: ReminderKind,
    pub channel: NotificationChannel,
    pub scheduled_at: DateTime<Utc>,
    pub recipient: Option<String>,
    pub recipient_employee_id: Option<i64>,
    pub message: String,
}

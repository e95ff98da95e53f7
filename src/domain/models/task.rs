//! Task domain model.
//!
//! Drafts come out of rules; tasks are finalized drafts with a priority,
//! an assignee, a due date and a lifecycle status.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::SubjectType;

/// Status of a generated task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, not yet picked up
    Pending,
    /// Someone is working on it
    InProgress,
    /// Done
    Completed,
    /// Dropped
    Cancelled,
    /// Due date passed without completion
    Overdue,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
        Self::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Overdue => "overdue",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" | "complete" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }

    /// Open tasks block regeneration for their identity key.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Valid transitions from this status.
    pub fn valid_transitions(&self) -> Vec<TaskStatus> {
        match self {
            Self::Pending => vec![Self::InProgress, Self::Completed, Self::Cancelled, Self::Overdue],
            Self::InProgress => vec![Self::Completed, Self::Cancelled, Self::Overdue],
            Self::Overdue => vec![Self::InProgress, Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => vec![],
        }
    }

    pub fn can_transition_to(&self, new_status: Self) -> bool {
        self.valid_transitions().contains(&new_status)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority level for tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl TaskPriority {
    /// Highest first.
    pub const DESCENDING: [TaskPriority; 4] = [Self::Urgent, Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "normal" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" | "critical" => Some(Self::Urgent),
            _ => None,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity used for deduplication: at most one open task per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DedupKey {
    pub subject_type: SubjectType,
    pub subject_id: i64,
    pub rule_id: String,
}

impl DedupKey {
    pub fn new(subject_type: SubjectType, subject_id: i64, rule_id: impl Into<String>) -> Self {
        Self {
            subject_type,
            subject_id,
            rule_id: rule_id.into(),
        }
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}/{}", self.subject_type, self.subject_id, self.rule_id)
    }
}

/// Inputs the priority assigner works from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityInputs {
    pub value: f64,
    pub days_elapsed: i64,
}

/// How a draft's final priority is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriorityPolicy {
    /// Use the priority assigner, never going below `floor`.
    Computed { floor: Option<TaskPriority> },
    /// The rule decided.
    Fixed { priority: TaskPriority },
}

/// Output of a rule generator, not yet finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub rule_id: String,
    pub title: String,
    pub description: String,
    pub subject_type: SubjectType,
    pub subject_id: i64,
    pub client_name: String,
    pub estimated_value: f64,
    pub priority_inputs: PriorityInputs,
    pub priority_policy: PriorityPolicy,
    /// Days from the pass snapshot until the task is due (0 = due immediately).
    pub due_in_days: i64,
    pub reasoning: String,
    pub business_impact: String,
    /// Roles tried in order when resolving an assignee.
    pub preferred_assignee_roles: Vec<String>,
    /// Fixed contact that bypasses role resolution.
    pub assignee_override: Option<String>,
}

impl TaskDraft {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(self.subject_type, self.subject_id, self.rule_id.clone())
    }
}

/// Who a task was handed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub name: String,
    pub employee_id: Option<i64>,
}

impl Assignee {
    pub fn contact(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            employee_id: None,
        }
    }
}

/// A finalized, persisted follow-up task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub rule_id: String,
    pub title: String,
    pub description: String,
    pub subject_type: SubjectType,
    pub subject_id: i64,
    pub client_name: String,
    pub estimated_value: f64,
    pub priority_inputs: PriorityInputs,
    pub reasoning: String,
    pub business_impact: String,
    pub preferred_assignee_roles: Vec<String>,
    pub priority: TaskPriority,
    /// Assignee display name; `None` means unassigned.
    pub assigned_to: Option<String>,
    pub assigned_employee_id: Option<i64>,
    pub due_date: DateTime<Utc>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completion_notes: Option<String>,
}

impl Task {
    /// Finalize a draft against the pass snapshot `now`.
    pub fn from_draft(
        draft: TaskDraft,
        priority: TaskPriority,
        assignee: Option<Assignee>,
        now: DateTime<Utc>,
    ) -> Self {
        let (assigned_to, assigned_employee_id) = match assignee {
            Some(a) => (Some(a.name), a.employee_id),
            None => (None, None),
        };
        Self {
            id: Uuid::new_v4(),
            rule_id: draft.rule_id,
            title: draft.title,
            description: draft.description,
            subject_type: draft.subject_type,
            subject_id: draft.subject_id,
            client_name: draft.client_name,
            estimated_value: draft.estimated_value,
            priority_inputs: draft.priority_inputs,
            reasoning: draft.reasoning,
            business_impact: draft.business_impact,
            preferred_assignee_roles: draft.preferred_assignee_roles,
            priority,
            assigned_to,
            assigned_employee_id,
            due_date: now + Duration::days(draft.due_in_days.max(0)),
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
            completed_at: None,
            completion_notes: None,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(self.subject_type, self.subject_id, self.rule_id.clone())
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }

    /// Check if can transition to given status.
    pub fn can_transition_to(&self, new_status: TaskStatus) -> bool {
        self.status.can_transition_to(new_status)
    }

    /// Transition to a new status at `at`.
    pub fn transition_to(&mut self, new_status: TaskStatus, at: DateTime<Utc>) -> Result<(), String> {
        if !self.can_transition_to(new_status) {
            return Err(format!(
                "Cannot transition from {} to {}",
                self.status.as_str(),
                new_status.as_str()
            ));
        }

        self.status = new_status;
        self.updated_at = at;
        if new_status == TaskStatus::Completed {
            self.completed_at = Some(at);
        }
        Ok(())
    }

    /// Validate task.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Task title cannot be empty".to_string());
        }
        if self.rule_id.trim().is_empty() {
            return Err("Task rule id cannot be empty".to_string());
        }
        if !self.estimated_value.is_finite() || self.estimated_value < 0.0 {
            return Err(format!("Invalid estimated value: {}", self.estimated_value));
        }
        if self.due_date < self.created_at {
            return Err("Task cannot be due before it was created".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TaskDraft {
        TaskDraft {
            rule_id: "quotation_followup_smart".to_string(),
            title: "Follow up with Asha about quotation".to_string(),
            description: "Call Asha".to_string(),
            subject_type: SubjectType::Quotation,
            subject_id: 7,
            client_name: "Asha".to_string(),
            estimated_value: 45_000.0,
            priority_inputs: PriorityInputs {
                value: 45_000.0,
                days_elapsed: 2,
            },
            priority_policy: PriorityPolicy::Fixed {
                priority: TaskPriority::Medium,
            },
            due_in_days: 1,
            reasoning: "Sent 2 days ago".to_string(),
            business_impact: String::new(),
            preferred_assignee_roles: vec!["SALES".to_string()],
            assignee_override: None,
        }
    }

    #[test]
    fn test_from_draft_sets_due_date_and_pending() {
        let now = Utc::now();
        let task = Task::from_draft(draft(), TaskPriority::Medium, None, now);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.due_date, now + Duration::days(1));
        assert!(!task.is_assigned());
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_same_key_and_snapshot_get_distinct_ids() {
        let now = Utc::now();
        let first = Task::from_draft(draft(), TaskPriority::Medium, None, now);
        let second = Task::from_draft(draft(), TaskPriority::Medium, None, now);
        assert_eq!(first.dedup_key(), second.dedup_key());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_open_statuses() {
        assert!(TaskStatus::Pending.is_open());
        assert!(TaskStatus::InProgress.is_open());
        assert!(!TaskStatus::Overdue.is_open());
        assert!(!TaskStatus::Completed.is_open());
        assert!(!TaskStatus::Cancelled.is_open());
    }

    #[test]
    fn test_task_state_transitions() {
        let now = Utc::now();
        let mut task = Task::from_draft(draft(), TaskPriority::Medium, None, now);

        task.transition_to(TaskStatus::InProgress, now).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);

        let later = now + Duration::hours(3);
        task.transition_to(TaskStatus::Completed, later).unwrap();
        assert_eq!(task.completed_at, Some(later));
        assert!(task.status.is_terminal());

        assert!(task.transition_to(TaskStatus::Pending, later).is_err());
    }

    #[test]
    fn test_overdue_can_be_resumed() {
        assert!(TaskStatus::Overdue.can_transition_to(TaskStatus::InProgress));
        assert!(!TaskStatus::Overdue.can_transition_to(TaskStatus::Pending));
    }

    #[test]
    fn test_priority_ordering_and_parsing() {
        assert!(TaskPriority::Urgent > TaskPriority::High);
        assert!(TaskPriority::Medium > TaskPriority::Low);
        assert_eq!(TaskPriority::from_str("critical"), Some(TaskPriority::Urgent));
        assert_eq!(TaskStatus::from_str("in-progress"), Some(TaskStatus::InProgress));
    }
}

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{SubjectType, Task, TaskPriority, TaskStatus};

/// Filters for querying tasks
#[derive(Default, Debug, Clone)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<String>,
    pub subject_type: Option<SubjectType>,
    pub rule_id: Option<String>,
    pub open_only: bool,
    pub limit: Option<i64>,
}

/// Per-assignee task statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssigneePerformance {
    pub assigned_to: String,
    pub employee_id: Option<i64>,
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub overdue_tasks: u64,
    pub open_tasks: u64,
    pub revenue_impact: f64,
}

impl AssigneePerformance {
    pub fn completion_rate(&self) -> f64 {
        if self.total_tasks == 0 {
            0.0
        } else {
            self.completed_tasks as f64 / self.total_tasks as f64
        }
    }
}

/// Repository port for generated tasks.
///
/// Implementations must reject a second open (pending/in_progress) task for the
/// same `(subject_type, subject_id, rule_id)` with
/// [`DomainError::DuplicateOpenTask`](crate::domain::errors::DomainError::DuplicateOpenTask).
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Find the open task for an identity key, if any.
    async fn find_open_task(
        &self,
        subject_type: SubjectType,
        subject_id: i64,
        rule_id: &str,
    ) -> DomainResult<Option<Task>>;

    /// Persist a new task and return it as stored.
    async fn save(&self, task: &Task) -> DomainResult<Task>;

    /// All open tasks.
    async fn list_open(&self) -> DomainResult<Vec<Task>>;

    /// Get a task by id.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Task>>;

    /// List tasks with optional filters, highest priority first.
    async fn list(&self, filter: TaskFilter) -> DomainResult<Vec<Task>>;

    /// Write back status, notes and timestamps of an existing task.
    async fn update(&self, task: &Task) -> DomainResult<()>;

    /// Task statistics grouped by assignee.
    async fn performance_by_assignee(&self) -> DomainResult<Vec<AssigneePerformance>>;
}

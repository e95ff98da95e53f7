//! Task service implementing the lifecycle of generated tasks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Task, TaskStatus};
use crate::domain::ports::{AssigneePerformance, TaskFilter, TaskStore};

pub struct TaskService<T: TaskStore> {
    store: Arc<T>,
}

impl<T: TaskStore> TaskService<T> {
    pub fn new(store: Arc<T>) -> Self {
        Self { store }
    }

    pub async fn get_task(&self, id: Uuid) -> DomainResult<Option<Task>> {
        self.store.get(id).await
    }

    pub async fn list_tasks(&self, filter: TaskFilter) -> DomainResult<Vec<Task>> {
        self.store.list(filter).await
    }

    /// Open tasks handed to one assignee, highest priority first.
    pub async fn tasks_for_assignee(&self, assignee: &str) -> DomainResult<Vec<Task>> {
        self.store
            .list(TaskFilter {
                assigned_to: Some(assignee.to_string()),
                open_only: true,
                ..TaskFilter::default()
            })
            .await
    }

    /// Move a task to `status`. Completion notes are only kept when completing.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: TaskStatus,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> DomainResult<Task> {
        let mut task = self
            .store
            .get(id)
            .await?
            .ok_or(DomainError::TaskNotFound(id))?;

        let from = task.status;
        task.transition_to(status, at)
            .map_err(|_| DomainError::InvalidStateTransition {
                from: from.as_str().to_string(),
                to: status.as_str().to_string(),
            })?;
        if status == TaskStatus::Completed {
            task.completion_notes = notes;
        }

        self.store.update(&task).await?;
        info!(task_id = %id, from = from.as_str(), to = status.as_str(), "Task status updated");
        Ok(task)
    }

    pub async fn start_task(&self, id: Uuid) -> DomainResult<Task> {
        self.update_status(id, TaskStatus::InProgress, None, Utc::now()).await
    }

    pub async fn complete_task(&self, id: Uuid, notes: Option<String>) -> DomainResult<Task> {
        self.update_status(id, TaskStatus::Completed, notes, Utc::now()).await
    }

    pub async fn cancel_task(&self, id: Uuid) -> DomainResult<Task> {
        self.update_status(id, TaskStatus::Cancelled, None, Utc::now()).await
    }

    /// Flag open tasks whose due date has passed. Returns the tasks moved.
    ///
    /// A task that cannot be moved is logged and skipped.
    pub async fn mark_overdue(&self, now: DateTime<Utc>) -> DomainResult<Vec<Task>> {
        let due: Vec<Task> = self
            .store
            .list_open()
            .await?
            .into_iter()
            .filter(|t| t.due_date < now)
            .collect();

        let mut moved = Vec::with_capacity(due.len());
        for task in due {
            match self.update_status(task.id, TaskStatus::Overdue, None, now).await {
                Ok(task) => moved.push(task),
                Err(err) => {
                    warn!(task_id = %task.id, error = %err, "Failed to mark task overdue");
                }
            }
        }
        Ok(moved)
    }

    /// Per-assignee statistics, busiest assignee first.
    pub async fn performance(&self) -> DomainResult<Vec<AssigneePerformance>> {
        self.store.performance_by_assignee().await
    }
}

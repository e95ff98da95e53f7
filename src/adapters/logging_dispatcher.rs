use async_trait::async_trait;
use tracing::info;

use crate::domain::errors::DomainResult;
use crate::domain::models::Task;
use crate::domain::ports::NotificationDispatcher;

/// Dispatcher that only writes a structured log line per task.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDispatcher;

#[async_trait]
impl NotificationDispatcher for LoggingDispatcher {
    async fn notify_assignment(&self, task: &Task) -> DomainResult<()> {
        info!(
            task_id = %task.id,
            rule_id = %task.rule_id,
            priority = task.priority.as_str(),
            assigned_to = task.assigned_to.as_deref().unwrap_or("unassigned"),
            due_date = %task.due_date,
            "Task assigned"
        );
        Ok(())
    }
}

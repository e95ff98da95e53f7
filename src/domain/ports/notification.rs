use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Task;

/// Best-effort delivery of task notifications.
///
/// Errors returned here are logged by the caller and never fail a
/// generation pass.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Tell the assignee about a newly created task.
    async fn notify_assignment(&self, task: &Task) -> DomainResult<()>;
}

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EmployeeRosterEntry, Lead, Quotation};

/// Read-only access to the studio's business records.
///
/// Implementations should report an unreachable store as
/// [`DomainError::SourceUnavailable`](crate::domain::errors::DomainError::SourceUnavailable);
/// the engine aborts the pass on any error from this port.
#[async_trait]
pub trait BusinessRecordSource: Send + Sync {
    /// All quotations, newest first.
    async fn list_quotations(&self) -> DomainResult<Vec<Quotation>>;

    /// All leads, newest first.
    async fn list_leads(&self) -> DomainResult<Vec<Lead>>;

    /// Active employees in stable roster order.
    async fn list_active_employees(&self) -> DomainResult<Vec<EmployeeRosterEntry>>;
}

//! Domain errors for the task generation engine.

use thiserror::Error;
use uuid::Uuid;

use super::models::DedupKey;

/// Domain-level errors that can occur while generating or managing tasks.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A single rule failed on a single record. Recoverable: the pass continues.
    #[error("Rule {rule_id} failed on {subject}: {reason}")]
    RuleEvaluation {
        rule_id: String,
        subject: String,
        reason: String,
    },

    /// A single task could not be saved. Recoverable: the task is dropped from the batch.
    #[error("Failed to persist task {task_id}: {reason}")]
    Persistence { task_id: Uuid, reason: String },

    /// The record source or roster could not be read. Fatal for the current pass.
    #[error("Business record source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("An open task already exists for {key}")]
    DuplicateOpenTask { key: DedupKey },

    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DomainError {
    /// Whether the pass may continue after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SourceUnavailable(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - BusinessRecordSource: quotations, leads and the employee roster
//! - TaskStore: persistence and open-task lookups for generated tasks
//! - NotificationDispatcher: best-effort task notifications
//!
//! These traits keep the engine independent of the SQL store and of any
//! delivery channel.

pub mod notification;
pub mod record_source;
pub mod task_store;

pub use notification::NotificationDispatcher;
pub use record_source::BusinessRecordSource;
pub use task_store::{AssigneePerformance, TaskFilter, TaskStore};

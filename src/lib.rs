//! Studio taskgen - follow-up task generation for a creative studio
//!
//! Scans quotations and leads, evaluates a catalog of business rules against
//! each record, and turns the resulting drafts into prioritized, assigned,
//! deduplicated tasks with scheduled reminders.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): records, tasks, errors and port traits
//! - **Service Layer** (`services`): rule catalog, priority, assignment and the generation pass
//! - **Adapters** (`adapters`): SQLite implementations of the ports
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use studio_taskgen::adapters::sqlite::{initialize_database, SqliteRecordSource, SqliteTaskStore};
//! use studio_taskgen::services::TaskGenerationEngine;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = studio_taskgen::ConfigLoader::load()?;
//!     let pool = initialize_database(&config.database).await?;
//!     let engine = TaskGenerationEngine::new(
//!         Arc::new(SqliteRecordSource::new(pool.clone())),
//!         Arc::new(SqliteTaskStore::new(pool)),
//!         &config.engine,
//!     );
//!     let outcome = engine.generate_now().await?;
//!     println!("{}", outcome.summary(&config.engine.currency_symbol));
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    BusinessRecord, Config, EmployeeRosterEntry, Lead, Quotation, Task, TaskDraft, TaskPriority,
    TaskStatus,
};
pub use domain::ports::{BusinessRecordSource, NotificationDispatcher, TaskStore};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{GenerationOutcome, RuleCatalog, TaskGenerationEngine};

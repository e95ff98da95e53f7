//! CLI command implementations.

pub mod generate;
pub mod import;
pub mod init;
pub mod reminders;
pub mod rules;
pub mod task;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::adapters::sqlite::initialize_database;
use crate::domain::models::Config;

/// Open the configured database, applying any pending migrations.
pub(crate) async fn open_database(config: &Config) -> Result<SqlitePool> {
    initialize_database(&config.database).await.with_context(|| {
        format!(
            "Failed to open database at {}. Run 'taskgen init' first.",
            config.database.path
        )
    })
}

//! Implementation of the `taskgen init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::cli::commands::open_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::{ConfigLoader, PROJECT_DIR};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config.yaml with defaults
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub project_dir: PathBuf,
    pub config_written: bool,
    pub database_path: String,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("\nWrote {}", self.project_dir.join("config.yaml").display()));
        }
        lines.push(format!("Database ready at {}", self.database_path));
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, config: &Config, json_mode: bool) -> Result<()> {
    let project_dir = PathBuf::from(PROJECT_DIR);
    fs::create_dir_all(project_dir.join("logs"))
        .await
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;

    let config_written = write_default_config(&project_dir, args.force).await?;
    open_database(config).await?;

    let out = InitOutput {
        success: true,
        message: if config_written {
            "Project initialized.".to_string()
        } else {
            "Project already initialized; kept existing config. Use --force to reset it.".to_string()
        },
        project_dir,
        config_written,
        database_path: config.database.path.clone(),
    };
    output(&out, json_mode);
    Ok(())
}

/// Returns whether the file was written.
async fn write_default_config(project_dir: &Path, force: bool) -> Result<bool> {
    let path = project_dir.join("config.yaml");
    if path.exists() && !force {
        return Ok(false);
    }
    let yaml = ConfigLoader::default_yaml()?;
    fs::write(&path, yaml)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_default_config_respects_force() {
        let dir = tempfile::tempdir().unwrap();

        assert!(write_default_config(dir.path(), false).await.unwrap());
        fs::write(dir.path().join("config.yaml"), "engine: {}\n").await.unwrap();

        assert!(!write_default_config(dir.path(), false).await.unwrap());
        let kept = fs::read_to_string(dir.path().join("config.yaml")).await.unwrap();
        assert_eq!(kept, "engine: {}\n");

        assert!(write_default_config(dir.path(), true).await.unwrap());
        let reset = fs::read_to_string(dir.path().join("config.yaml")).await.unwrap();
        assert!(reset.contains("escalation_contact"));
    }
}

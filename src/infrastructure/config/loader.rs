use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project directory holding config, database and logs.
pub const PROJECT_DIR: &str = ".taskgen";

/// Prefix for environment overrides, nested with `__`.
pub const ENV_PREFIX: &str = "TASKGEN_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Escalation contact cannot be empty")]
    EmptyEscalationContact,

    #[error("Invalid amount for {field}: {value}. Must be a non-negative number")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("Invalid day threshold for {field}: {value}. Cannot be negative")]
    InvalidDays { field: &'static str, value: i64 },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .taskgen/config.yaml (created by `init`)
    /// 3. .taskgen/local.yaml (optional local overrides)
    /// 4. TASKGEN_* environment variables
    pub fn load() -> Result<Config> {
        let project = Path::new(PROJECT_DIR);
        Self::load_layers(&[project.join("config.yaml"), project.join("local.yaml")])
    }

    /// Load with `path` in place of the project files. Environment
    /// variables still apply on top.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Self::load_layers(&[path.to_path_buf()])
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    fn load_layers(files: &[PathBuf]) -> Result<Config> {
        let figment = files
            .iter()
            .fold(Figment::new().merge(Serialized::defaults(Config::default())), |fig, file| {
                fig.merge(Yaml::file(file))
            })
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Default config rendered as YAML, for `init`.
    pub fn default_yaml() -> Result<String> {
        serde_yaml::to_string(&Config::default()).context("Failed to render default config")
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.database.max_connections));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let engine = &config.engine;
        if engine.escalation_contact.trim().is_empty() {
            return Err(ConfigError::EmptyEscalationContact);
        }

        let thresholds = &engine.priority;
        for (field, value) in [
            ("engine.lead_default_value", engine.lead_default_value),
            ("engine.high_value_threshold", engine.high_value_threshold),
            ("engine.priority.urgent_value", thresholds.urgent_value),
            ("engine.priority.high_value", thresholds.high_value),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidAmount { field, value });
            }
        }
        for (field, value) in [
            ("engine.priority.urgent_days", thresholds.urgent_days),
            ("engine.priority.high_value_days", thresholds.high_value_days),
            ("engine.priority.high_days", thresholds.high_days),
            ("engine.priority.medium_days", thresholds.medium_days),
        ] {
            if value < 0 {
                return Err(ConfigError::InvalidDays { field, value });
            }
        }

        Ok(())
    }
}

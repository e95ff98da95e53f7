use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for taskgen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Rule engine configuration
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".taskgen/taskgen.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// `sqlx` connection URL for the configured path.
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log rotation policy for file output
    #[serde(default)]
    pub rotation: RotationPolicy,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

/// Rule engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Contact that receives high-value escalations regardless of roster
    #[serde(default = "default_escalation_contact")]
    pub escalation_contact: String,

    /// Department tried when no preferred role matches
    #[serde(default = "default_department")]
    pub default_department: String,

    /// Symbol used when rendering amounts in task text
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Value assumed for leads that carry no estimate
    #[serde(default = "default_lead_value")]
    pub lead_default_value: f64,

    /// Quotations at or above this amount count as high value
    #[serde(default = "default_high_value_threshold")]
    pub high_value_threshold: f64,

    /// Rule ids switched off
    #[serde(default)]
    pub disabled_rules: Vec<String>,

    /// Priority assigner thresholds
    #[serde(default)]
    pub priority: PriorityThresholds,
}

fn default_escalation_contact() -> String {
    "Head of Sales".to_string()
}

fn default_department() -> String {
    "Sales".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

const fn default_lead_value() -> f64 {
    30_000.0
}

const fn default_high_value_threshold() -> f64 {
    100_000.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            escalation_contact: default_escalation_contact(),
            default_department: default_department(),
            currency_symbol: default_currency_symbol(),
            lead_default_value: default_lead_value(),
            high_value_threshold: default_high_value_threshold(),
            disabled_rules: Vec::new(),
            priority: PriorityThresholds::default(),
        }
    }
}

/// Thresholds for the value/age priority clauses, evaluated top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PriorityThresholds {
    /// Clause 1: value and age both at least these → urgent
    #[serde(default = "default_urgent_value")]
    pub urgent_value: f64,
    #[serde(default = "default_urgent_days")]
    pub urgent_days: i64,

    /// Clauses 2 and 3: value at or above this → high (clause 2 also needs `high_value_days`)
    #[serde(default = "default_high_value")]
    pub high_value: f64,
    #[serde(default = "default_high_value_days")]
    pub high_value_days: i64,

    /// Clause 3: age at least this → high regardless of value
    #[serde(default = "default_high_days")]
    pub high_days: i64,

    /// Clause 4: age at least this → medium
    #[serde(default = "default_medium_days")]
    pub medium_days: i64,
}

const fn default_urgent_value() -> f64 {
    100_000.0
}

const fn default_urgent_days() -> i64 {
    3
}

const fn default_high_value() -> f64 {
    50_000.0
}

const fn default_high_value_days() -> i64 {
    2
}

const fn default_high_days() -> i64 {
    5
}

const fn default_medium_days() -> i64 {
    2
}

impl Default for PriorityThresholds {
    fn default() -> Self {
        Self {
            urgent_value: default_urgent_value(),
            urgent_days: default_urgent_days(),
            high_value: default_high_value(),
            high_value_days: default_high_value_days(),
            high_days: default_high_days(),
            medium_days: default_medium_days(),
        }
    }
}

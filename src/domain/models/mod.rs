pub mod config;
pub mod employee;
pub mod record;
pub mod reminder;
pub mod task;

pub use config::{
    Config, DatabaseConfig, EngineConfig, LogFormat, LoggingConfig, PriorityThresholds,
    RotationPolicy,
};
pub use employee::EmployeeRosterEntry;
pub use record::{
    days_since, BusinessRecord, Lead, LeadStatus, Quotation, QuotationStatus, SubjectType,
};
pub use reminder::{NotificationChannel, Reminder, ReminderKind};
pub use task::{
    Assignee, DedupKey, PriorityInputs, PriorityPolicy, Task, TaskDraft, TaskPriority, TaskStatus,
};

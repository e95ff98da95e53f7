//! Service layer: rule evaluation, task finalization and the generation pass.

pub mod assignment_resolver;
pub mod deduplicator;
pub mod insights;
pub mod priority_assigner;
pub mod reminder_planner;
pub mod rule_catalog;
pub mod task_generation_engine;
pub mod task_service;

pub use assignment_resolver::AssignmentResolver;
pub use deduplicator::{OpenTaskIndex, TaskDeduplicator};
pub use insights::{GenerationOutcome, GenerationStats, InsightBuilder};
pub use priority_assigner::PriorityAssigner;
pub use reminder_planner::ReminderPlanner;
pub use rule_catalog::{
    format_amount, BuiltinRule, CatalogEvaluation, Rule, RuleCatalog, RuleContext, RuleSummary,
    StandardRule,
};
pub use task_generation_engine::TaskGenerationEngine;
pub use task_service::TaskService;

//! Aggregate statistics and human-readable insights for a generation pass.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::{Lead, LeadStatus, Quotation, QuotationStatus, SubjectType, Task, TaskPriority};
use crate::services::rule_catalog::format_amount;

/// Counters collected while a pass runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationStats {
    pub records_scanned: usize,
    pub drafts_produced: usize,
    pub tasks_generated: usize,
    pub quotation_tasks: usize,
    pub lead_tasks: usize,
    pub critical_tasks: usize,
    pub by_priority: BTreeMap<TaskPriority, usize>,
    pub total_estimated_value: f64,
    pub duplicates_skipped: usize,
    pub rule_failures: usize,
    pub persistence_failures: usize,
    pub notification_failures: usize,
}

impl GenerationStats {
    /// Fold the created tasks into the per-task counters.
    pub fn record_tasks(&mut self, tasks: &[Task]) {
        self.tasks_generated = tasks.len();
        self.quotation_tasks = 0;
        self.lead_tasks = 0;
        self.by_priority.clear();
        self.total_estimated_value = 0.0;

        for task in tasks {
            match task.subject_type {
                SubjectType::Quotation => self.quotation_tasks += 1,
                SubjectType::Lead => self.lead_tasks += 1,
            }
            *self.by_priority.entry(task.priority).or_insert(0) += 1;
            self.total_estimated_value += task.estimated_value;
        }
        self.critical_tasks = self.count(TaskPriority::Urgent);
    }

    pub fn count(&self, priority: TaskPriority) -> usize {
        self.by_priority.get(&priority).copied().unwrap_or(0)
    }
}

/// Result of one generation pass.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub generated_at: DateTime<Utc>,
    /// Created tasks, in creation order.
    pub tasks: Vec<Task>,
    pub insights: Vec<String>,
    pub stats: GenerationStats,
}

impl GenerationOutcome {
    /// Multi-line report of the pass.
    pub fn summary(&self, currency_symbol: &str) -> String {
        let stats = &self.stats;
        let mut out = String::new();
        let _ = writeln!(out, "TASK GENERATION SUMMARY");
        let _ = writeln!(out);
        let _ = writeln!(out, "Tasks Generated: {}", stats.tasks_generated);
        let _ = writeln!(out, "  Quotation Tasks: {}", stats.quotation_tasks);
        let _ = writeln!(out, "  Lead Tasks: {}", stats.lead_tasks);
        let _ = writeln!(out, "  Critical Tasks: {}", stats.critical_tasks);
        for priority in TaskPriority::DESCENDING {
            let _ = writeln!(out, "  {}: {}", priority.as_str(), stats.count(priority));
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Revenue Impact: {}",
            format_amount(currency_symbol, stats.total_estimated_value)
        );
        if stats.duplicates_skipped + stats.rule_failures + stats.persistence_failures > 0 {
            let _ = writeln!(
                out,
                "Skipped: {} duplicate(s), {} rule failure(s), {} persistence failure(s)",
                stats.duplicates_skipped, stats.rule_failures, stats.persistence_failures
            );
        }
        if !self.insights.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Key Insights:");
            for insight in &self.insights {
                let _ = writeln!(out, "  - {insight}");
            }
        }
        out
    }
}

/// Builds insight lines from the pass result and the records it scanned.
#[derive(Debug, Clone)]
pub struct InsightBuilder {
    currency_symbol: String,
    high_value_threshold: f64,
}

impl InsightBuilder {
    pub fn new(currency_symbol: impl Into<String>, high_value_threshold: f64) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
            high_value_threshold,
        }
    }

    pub fn build(&self, stats: &GenerationStats, quotations: &[Quotation], leads: &[Lead]) -> Vec<String> {
        let mut insights = Vec::new();

        if stats.critical_tasks > 0 {
            insights.push(format!(
                "{} CRITICAL tasks require immediate attention - potential revenue loss risk",
                stats.critical_tasks
            ));
        }

        if stats.total_estimated_value > 0.0 {
            insights.push(format!(
                "Total revenue protected by task management: {}",
                format_amount(&self.currency_symbol, stats.total_estimated_value)
            ));
        }

        let pending = quotations
            .iter()
            .filter(|q| q.status == QuotationStatus::Sent)
            .count();
        if pending > 0 {
            insights.push(format!(
                "{pending} quotations pending client response - active follow-up tasks generated"
            ));
        }

        let new_leads = leads.iter().filter(|l| l.status == LeadStatus::New).count();
        if new_leads > 0 {
            insights.push(format!(
                "{new_leads} new leads require qualification - conversion tasks automated"
            ));
        }

        if stats.tasks_generated > 0 {
            insights.push(format!(
                "Replaced manual follow-up tracking with {} automated tasks",
                stats.tasks_generated
            ));
        }

        let high_value = quotations
            .iter()
            .filter(|q| q.total_amount >= self.high_value_threshold)
            .count();
        if high_value > 0 {
            insights.push(format!(
                "{high_value} high-value clients ({}+) under enhanced monitoring",
                format_amount(&self.currency_symbol, self.high_value_threshold)
            ));
        }

        insights
    }
}

use crate::domain::models::{PriorityInputs, PriorityPolicy, PriorityThresholds, TaskPriority};

/// Maps (monetary value, days elapsed) to a priority level.
///
/// Clauses are evaluated top to bottom and the first match wins:
/// 1. value ≥ urgent_value and days ≥ urgent_days → urgent
/// 2. value ≥ high_value and days ≥ high_value_days → high
/// 3. value ≥ high_value or days ≥ high_days → high
/// 4. days ≥ medium_days → medium
/// 5. otherwise → low
#[derive(Debug, Clone, Default)]
pub struct PriorityAssigner {
    thresholds: PriorityThresholds,
}

impl PriorityAssigner {
    /// Create a priority assigner with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a priority assigner with custom thresholds
    pub fn with_thresholds(thresholds: PriorityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &PriorityThresholds {
        &self.thresholds
    }

    /// Priority for a value/age pair.
    #[allow(clippy::if_same_then_else)]
    pub fn priority(&self, value: f64, days_elapsed: i64) -> TaskPriority {
        let t = &self.thresholds;

        if value >= t.urgent_value && days_elapsed >= t.urgent_days {
            TaskPriority::Urgent
        } else if value >= t.high_value && days_elapsed >= t.high_value_days {
            TaskPriority::High
        } else if value >= t.high_value || days_elapsed >= t.high_days {
            TaskPriority::High
        } else if days_elapsed >= t.medium_days {
            TaskPriority::Medium
        } else {
            TaskPriority::Low
        }
    }

    /// Resolve a draft's policy into a final priority.
    pub fn resolve(&self, policy: PriorityPolicy, inputs: PriorityInputs) -> TaskPriority {
        match policy {
            PriorityPolicy::Fixed { priority } => priority,
            PriorityPolicy::Computed { floor } => {
                let computed = self.priority(inputs.value, inputs.days_elapsed);
                floor.map_or(computed, |floor| computed.max(floor))
            }
        }
    }
}

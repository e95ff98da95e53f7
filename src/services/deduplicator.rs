use std::collections::HashSet;

use crate::domain::models::{DedupKey, Task, TaskDraft};

/// Identity keys of tasks that are currently open.
///
/// Seeded from the store's open tasks and extended with each task the
/// current pass persists. Keys of closed tasks never enter the index.
#[derive(Debug, Clone, Default)]
pub struct OpenTaskIndex {
    keys: HashSet<DedupKey>,
}

impl OpenTaskIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored tasks, ignoring any that are not open.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        Self {
            keys: tasks
                .into_iter()
                .filter(|t| t.is_open())
                .map(Task::dedup_key)
                .collect(),
        }
    }

    pub fn contains(&self, key: &DedupKey) -> bool {
        self.keys.contains(key)
    }

    /// Record a newly persisted task. Returns `false` if its key was present.
    pub fn insert(&mut self, task: &Task) -> bool {
        if !task.is_open() {
            return false;
        }
        self.keys.insert(task.dedup_key())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Drops drafts that would duplicate an open task.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskDeduplicator;

impl TaskDeduplicator {
    pub fn is_duplicate(&self, draft: &TaskDraft, index: &OpenTaskIndex) -> bool {
        index.contains(&draft.dedup_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        PriorityInputs, PriorityPolicy, SubjectType, TaskPriority, TaskStatus,
    };
    use chrono::Utc;

    fn draft(subject_id: i64, rule_id: &str) -> TaskDraft {
        TaskDraft {
            rule_id: rule_id.to_string(),
            title: "Follow up".to_string(),
            description: String::new(),
            subject_type: SubjectType::Quotation,
            subject_id,
            client_name: "Asha".to_string(),
            estimated_value: 10_000.0,
            priority_inputs: PriorityInputs {
                value: 10_000.0,
                days_elapsed: 2,
            },
            priority_policy: PriorityPolicy::Fixed {
                priority: TaskPriority::Medium,
            },
            due_in_days: 1,
            reasoning: String::new(),
            business_impact: String::new(),
            preferred_assignee_roles: vec![],
            assignee_override: None,
        }
    }

    fn task(subject_id: i64, rule_id: &str, status: TaskStatus) -> Task {
        let mut task = Task::from_draft(draft(subject_id, rule_id), TaskPriority::Medium, None, Utc::now());
        task.status = status;
        task
    }

    #[test]
    fn test_open_task_blocks_same_key_only() {
        let tasks = vec![task(7, "quotation_followup_smart", TaskStatus::Pending)];
        let index = OpenTaskIndex::from_tasks(&tasks);
        let dedup = TaskDeduplicator;

        assert!(dedup.is_duplicate(&draft(7, "quotation_followup_smart"), &index));
        assert!(!dedup.is_duplicate(&draft(7, "urgent_high_value_escalation"), &index));
        assert!(!dedup.is_duplicate(&draft(8, "quotation_followup_smart"), &index));
    }

    #[test]
    fn test_closed_tasks_do_not_block() {
        let tasks = vec![
            task(1, "payment_follow_up_smart", TaskStatus::Completed),
            task(2, "payment_follow_up_smart", TaskStatus::Cancelled),
            task(3, "payment_follow_up_smart", TaskStatus::Overdue),
            task(4, "payment_follow_up_smart", TaskStatus::InProgress),
        ];
        let index = OpenTaskIndex::from_tasks(&tasks);

        assert_eq!(index.len(), 1);
        assert!(index.contains(&draft(4, "payment_follow_up_smart").dedup_key()));
    }

    #[test]
    fn test_insert_extends_index_within_batch() {
        let mut index = OpenTaskIndex::new();
        let first = task(5, "lead_qualification_smart", TaskStatus::Pending);

        assert!(index.insert(&first));
        assert!(!index.insert(&first));
        assert!(TaskDeduplicator.is_duplicate(&draft(5, "lead_qualification_smart"), &index));
    }
}

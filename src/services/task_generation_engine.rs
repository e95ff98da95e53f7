//! Task generation pass.
//!
//! One pass snapshots `now`, reads records and the roster, evaluates the rule
//! catalog, drops drafts that would duplicate an open task, finalizes and
//! persists the rest, then summarizes and notifies.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{BusinessRecord, EngineConfig, Task};
use crate::domain::ports::{BusinessRecordSource, NotificationDispatcher, TaskStore};
use crate::services::assignment_resolver::AssignmentResolver;
use crate::services::deduplicator::{OpenTaskIndex, TaskDeduplicator};
use crate::services::insights::{GenerationOutcome, GenerationStats, InsightBuilder};
use crate::services::priority_assigner::PriorityAssigner;
use crate::services::rule_catalog::RuleCatalog;

pub struct TaskGenerationEngine<S: BusinessRecordSource, T: TaskStore> {
    source: Arc<S>,
    store: Arc<T>,
    dispatchers: Vec<Arc<dyn NotificationDispatcher>>,
    catalog: RuleCatalog,
    priority: PriorityAssigner,
    resolver: AssignmentResolver,
    deduplicator: TaskDeduplicator,
    insights: InsightBuilder,
    pass_lock: Mutex<()>,
}

impl<S: BusinessRecordSource, T: TaskStore> TaskGenerationEngine<S, T> {
    pub fn new(source: Arc<S>, store: Arc<T>, config: &EngineConfig) -> Self {
        Self {
            source,
            store,
            dispatchers: Vec::new(),
            catalog: RuleCatalog::from_config(config),
            priority: PriorityAssigner::with_thresholds(config.priority),
            resolver: AssignmentResolver::new(config.default_department.clone()),
            deduplicator: TaskDeduplicator,
            insights: InsightBuilder::new(config.currency_symbol.clone(), config.high_value_threshold),
            pass_lock: Mutex::new(()),
        }
    }

    /// Replace the rule catalog.
    pub fn with_catalog(mut self, catalog: RuleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Add a notification dispatcher. Every dispatcher sees every created task.
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        self.dispatchers.push(dispatcher);
        self
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut RuleCatalog {
        &mut self.catalog
    }

    /// Run a pass against the current wall clock.
    pub async fn generate_now(&self) -> DomainResult<GenerationOutcome> {
        self.generate(Utc::now()).await
    }

    /// Run one generation pass with `now` as the snapshot for every age and
    /// due-date computation.
    ///
    /// Only failures reading records, the roster or the open-task index
    /// abort the pass. Rule failures, persistence
    /// failures and notification failures are logged and counted.
    pub async fn generate(&self, now: DateTime<Utc>) -> DomainResult<GenerationOutcome> {
        let _pass = self.pass_lock.lock().await;
        info!(now = %now, rules = self.catalog.len(), "Starting task generation pass");

        let (quotations, leads, roster) = tokio::try_join!(
            self.source.list_quotations(),
            self.source.list_leads(),
            self.source.list_active_employees(),
        )
        .map_err(source_unavailable)?;

        let open_tasks = self.store.list_open().await.map_err(source_unavailable)?;
        let mut index = OpenTaskIndex::from_tasks(&open_tasks);

        let records: Vec<BusinessRecord> = quotations
            .iter()
            .cloned()
            .map(BusinessRecord::Quotation)
            .chain(leads.iter().cloned().map(BusinessRecord::Lead))
            .collect();

        let evaluation = self.catalog.evaluate_all(&records, now);
        let mut stats = GenerationStats {
            records_scanned: records.len(),
            drafts_produced: evaluation.drafts.len(),
            rule_failures: evaluation.failures.len(),
            ..GenerationStats::default()
        };

        let mut created: Vec<Task> = Vec::new();
        for draft in evaluation.drafts {
            if self.deduplicator.is_duplicate(&draft, &index) {
                debug!(key = %draft.dedup_key(), "Open task exists, skipping draft");
                stats.duplicates_skipped += 1;
                continue;
            }

            let priority = self.priority.resolve(draft.priority_policy, draft.priority_inputs);
            let assignee = self.resolver.assignee_for(
                draft.assignee_override.as_deref(),
                &draft.preferred_assignee_roles,
                &roster,
            );
            let task = Task::from_draft(draft, priority, assignee, now);

            if let Err(reason) = task.validate() {
                warn!(
                    rule_id = %task.rule_id,
                    subject_id = task.subject_id,
                    error = %reason,
                    "Finalized task failed validation"
                );
                stats.rule_failures += 1;
                continue;
            }

            match self.store.save(&task).await {
                Ok(saved) => {
                    index.insert(&saved);
                    debug!(task_id = %saved.id, key = %saved.dedup_key(), "Task persisted");
                    created.push(saved);
                }
                Err(DomainError::DuplicateOpenTask { key }) => {
                    let existing = self
                        .store
                        .find_open_task(key.subject_type, key.subject_id, &key.rule_id)
                        .await
                        .ok()
                        .flatten();
                    info!(
                        key = %key,
                        existing_task_id = ?existing.map(|t| t.id),
                        "Store rejected duplicate open task"
                    );
                    stats.duplicates_skipped += 1;
                }
                Err(err) => {
                    let err = DomainError::Persistence {
                        task_id: task.id,
                        reason: err.to_string(),
                    };
                    warn!(
                        task_id = %task.id,
                        rule_id = %task.rule_id,
                        subject_id = task.subject_id,
                        error = %err,
                        "Failed to persist task, excluding it from the pass"
                    );
                    stats.persistence_failures += 1;
                }
            }
        }

        stats.record_tasks(&created);
        let insights = self.insights.build(&stats, &quotations, &leads);
        stats.notification_failures = self.notify(&created).await;

        info!(
            tasks_generated = stats.tasks_generated,
            critical = stats.critical_tasks,
            duplicates = stats.duplicates_skipped,
            rule_failures = stats.rule_failures,
            persistence_failures = stats.persistence_failures,
            "Task generation pass complete"
        );

        Ok(GenerationOutcome {
            generated_at: now,
            tasks: created,
            insights,
            stats,
        })
    }

    /// Notify every dispatcher about every task. Returns the failure count.
    async fn notify(&self, tasks: &[Task]) -> usize {
        if self.dispatchers.is_empty() || tasks.is_empty() {
            return 0;
        }

        let sends = tasks.iter().flat_map(|task| {
            self.dispatchers
                .iter()
                .map(move |dispatcher| async move { (task, dispatcher.notify_assignment(task).await) })
        });

        let mut failures = 0;
        for (task, result) in join_all(sends).await {
            if let Err(err) = result {
                warn!(task_id = %task.id, error = %err, "Notification dispatch failed");
                failures += 1;
            }
        }
        failures
    }
}

fn source_unavailable(err: DomainError) -> DomainError {
    match err {
        DomainError::SourceUnavailable(_) => err,
        other => DomainError::SourceUnavailable(other.to_string()),
    }
}

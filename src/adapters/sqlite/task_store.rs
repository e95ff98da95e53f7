//! SQLite implementation of the TaskStore.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{
    format_datetime, parse_datetime, parse_json_or_default, parse_optional_datetime, parse_uuid,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{SubjectType, Task, TaskPriority, TaskStatus};
use crate::domain::ports::{AssigneePerformance, TaskFilter, TaskStore};

const PRIORITY_RANK: &str = "CASE priority
    WHEN 'urgent' THEN 1
    WHEN 'high' THEN 2
    WHEN 'medium' THEN 3
    ELSE 4 END";

#[derive(Clone)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Map a write failure, turning a hit on the open-identity index into
    /// [`DomainError::DuplicateOpenTask`].
    fn write_error(task: &Task, err: sqlx::Error) -> DomainError {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() && !db.message().contains("tasks.id") {
                return DomainError::DuplicateOpenTask {
                    key: task.dedup_key(),
                };
            }
        }
        DomainError::DatabaseError(err.to_string())
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn find_open_task(
        &self,
        subject_type: SubjectType,
        subject_id: i64,
        rule_id: &str,
    ) -> DomainResult<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT * FROM tasks
             WHERE subject_type = ? AND subject_id = ? AND rule_id = ?
               AND status IN ('pending', 'in_progress')",
        )
        .bind(subject_type.as_str())
        .bind(subject_id)
        .bind(rule_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::try_from).transpose()
    }

    async fn save(&self, task: &Task) -> DomainResult<Task> {
        task.validate().map_err(DomainError::ValidationFailed)?;
        let inputs_json = serde_json::to_string(&task.priority_inputs)?;
        let roles_json = serde_json::to_string(&task.preferred_assignee_roles)?;

        sqlx::query(
            r#"INSERT INTO tasks (id, rule_id, title, description, subject_type, subject_id,
               client_name, estimated_value, priority_inputs, reasoning, business_impact,
               preferred_assignee_roles, priority, assigned_to, assigned_employee_id, due_date,
               status, created_at, updated_at, completed_at, completion_notes)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(task.id.to_string())
        .bind(&task.rule_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.subject_type.as_str())
        .bind(task.subject_id)
        .bind(&task.client_name)
        .bind(task.estimated_value)
        .bind(&inputs_json)
        .bind(&task.reasoning)
        .bind(&task.business_impact)
        .bind(&roles_json)
        .bind(task.priority.as_str())
        .bind(&task.assigned_to)
        .bind(task.assigned_employee_id)
        .bind(format_datetime(task.due_date))
        .bind(task.status.as_str())
        .bind(format_datetime(task.created_at))
        .bind(format_datetime(task.updated_at))
        .bind(task.completed_at.map(format_datetime))
        .bind(&task.completion_notes)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(task, e))?;

        Ok(task.clone())
    }

    async fn list_open(&self) -> DomainResult<Vec<Task>> {
        self.list(TaskFilter {
            open_only: true,
            ..TaskFilter::default()
        })
        .await
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Task::try_from).transpose()
    }

    async fn list(&self, filter: TaskFilter) -> DomainResult<Vec<Task>> {
        let mut query = String::from("SELECT * FROM tasks WHERE 1=1");
        let mut bindings: Vec<String> = Vec::new();

        if filter.open_only {
            query.push_str(" AND status IN ('pending', 'in_progress')");
        }
        if let Some(status) = &filter.status {
            query.push_str(" AND status = ?");
            bindings.push(status.as_str().to_string());
        }
        if let Some(priority) = &filter.priority {
            query.push_str(" AND priority = ?");
            bindings.push(priority.as_str().to_string());
        }
        if let Some(assigned_to) = &filter.assigned_to {
            query.push_str(" AND assigned_to = ?");
            bindings.push(assigned_to.clone());
        }
        if let Some(subject_type) = &filter.subject_type {
            query.push_str(" AND subject_type = ?");
            bindings.push(subject_type.as_str().to_string());
        }
        if let Some(rule_id) = &filter.rule_id {
            query.push_str(" AND rule_id = ?");
            bindings.push(rule_id.clone());
        }

        query.push_str(&format!(" ORDER BY {PRIORITY_RANK}, due_date ASC, created_at ASC"));
        if let Some(limit) = filter.limit {
            query.push_str(&format!(" LIMIT {}", limit.max(0)));
        }

        let mut q = sqlx::query_as::<_, TaskRow>(&query);
        for binding in &bindings {
            q = q.bind(binding);
        }

        let rows: Vec<TaskRow> = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn update(&self, task: &Task) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE tasks SET status = ?, priority = ?, assigned_to = ?, assigned_employee_id = ?,
               due_date = ?, updated_at = ?, completed_at = ?, completion_notes = ?
               WHERE id = ?"#,
        )
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(&task.assigned_to)
        .bind(task.assigned_employee_id)
        .bind(format_datetime(task.due_date))
        .bind(format_datetime(task.updated_at))
        .bind(task.completed_at.map(format_datetime))
        .bind(&task.completion_notes)
        .bind(task.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(task, e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TaskNotFound(task.id));
        }

        Ok(())
    }

    async fn performance_by_assignee(&self) -> DomainResult<Vec<AssigneePerformance>> {
        let rows: Vec<PerformanceRow> = sqlx::query_as(
            r#"SELECT assigned_to,
                      MAX(assigned_employee_id) AS employee_id,
                      COUNT(*) AS total_tasks,
                      SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END) AS completed_tasks,
                      SUM(CASE WHEN status = 'overdue' THEN 1 ELSE 0 END) AS overdue_tasks,
                      SUM(CASE WHEN status IN ('pending', 'in_progress') THEN 1 ELSE 0 END) AS open_tasks,
                      TOTAL(CASE WHEN status = 'completed' THEN estimated_value ELSE 0.0 END) AS revenue_impact
               FROM tasks
               WHERE assigned_to IS NOT NULL
               GROUP BY assigned_to
               ORDER BY total_tasks DESC, assigned_to ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| AssigneePerformance {
                assigned_to: r.assigned_to,
                employee_id: r.employee_id,
                total_tasks: r.total_tasks.max(0) as u64,
                completed_tasks: r.completed_tasks.max(0) as u64,
                overdue_tasks: r.overdue_tasks.max(0) as u64,
                open_tasks: r.open_tasks.max(0) as u64,
                revenue_impact: r.revenue_impact,
            })
            .collect())
    }
}

#[derive(sqlx::FromRow)]
struct PerformanceRow {
    assigned_to: String,
    employee_id: Option<i64>,
    total_tasks: i64,
    completed_tasks: i64,
    overdue_tasks: i64,
    open_tasks: i64,
    revenue_impact: f64,
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    rule_id: String,
    title: String,
    description: String,
    subject_type: String,
    subject_id: i64,
    client_name: String,
    estimated_value: f64,
    priority_inputs: String,
    reasoning: String,
    business_impact: String,
    preferred_assignee_roles: Option<String>,
    priority: String,
    assigned_to: Option<String>,
    assigned_employee_id: Option<i64>,
    due_date: String,
    status: String,
    created_at: String,
    updated_at: String,
    completed_at: Option<String>,
    completion_notes: Option<String>,
}

impl TryFrom<TaskRow> for Task {
    type Error = DomainError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let subject_type = SubjectType::from_str(&row.subject_type).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid subject type: {}", row.subject_type))
        })?;
        let priority = TaskPriority::from_str(&row.priority).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid priority: {}", row.priority))
        })?;
        let status = TaskStatus::from_str(&row.status).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid status: {}", row.status))
        })?;

        Ok(Task {
            id: parse_uuid(&row.id)?,
            rule_id: row.rule_id,
            title: row.title,
            description: row.description,
            subject_type,
            subject_id: row.subject_id,
            client_name: row.client_name,
            estimated_value: row.estimated_value,
            priority_inputs: serde_json::from_str(&row.priority_inputs)?,
            reasoning: row.reasoning,
            business_impact: row.business_impact,
            preferred_assignee_roles: parse_json_or_default(row.preferred_assignee_roles)?,
            priority,
            assigned_to: row.assigned_to,
            assigned_employee_id: row.assigned_employee_id,
            due_date: parse_datetime(&row.due_date)?,
            status,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            completed_at: parse_optional_datetime(row.completed_at)?,
            completion_notes: row.completion_notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use crate::domain::models::{Assignee, PriorityInputs, PriorityPolicy, TaskDraft};
    use chrono::{DateTime, Duration, Utc};

    async fn setup_test_store() -> SqliteTaskStore {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteTaskStore::new(pool)
    }

    fn task(subject_id: i64, rule_id: &str, priority: TaskPriority, now: DateTime<Utc>) -> Task {
        let draft = TaskDraft {
            rule_id: rule_id.to_string(),
            title: format!("Task for {subject_id}"),
            description: "desc".to_string(),
            subject_type: SubjectType::Quotation,
            subject_id,
            client_name: "Asha".to_string(),
            estimated_value: 60_000.0,
            priority_inputs: PriorityInputs {
                value: 60_000.0,
                days_elapsed: 3,
            },
            priority_policy: PriorityPolicy::Fixed { priority },
            due_in_days: 1,
            reasoning: "why".to_string(),
            business_impact: "impact".to_string(),
            preferred_assignee_roles: vec!["SALES".to_string(), "SEO".to_string()],
            assignee_override: None,
        };
        Task::from_draft(
            draft,
            priority,
            Some(Assignee {
                name: "Kiran".to_string(),
                employee_id: Some(3),
            }),
            now,
        )
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let store = setup_test_store().await;
        let original = task(1, "payment_follow_up_smart", TaskPriority::High, Utc::now());
        store.save(&original).await.unwrap();

        let loaded = store.get(original.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, original.id);
        assert_eq!(loaded.preferred_assignee_roles, original.preferred_assignee_roles);
        assert_eq!(loaded.priority_inputs, original.priority_inputs);
        assert_eq!(loaded.assigned_employee_id, Some(3));
        assert_eq!(loaded.due_date, original.due_date);
    }

    #[tokio::test]
    async fn test_second_open_task_for_same_key_is_rejected() {
        let store = setup_test_store().await;
        let now = Utc::now();
        store.save(&task(7, "quotation_followup_smart", TaskPriority::High, now)).await.unwrap();

        let later = task(7, "quotation_followup_smart", TaskPriority::High, now + Duration::hours(1));
        let err = store.save(&later).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateOpenTask { .. }));

        let other_rule = task(7, "urgent_high_value_escalation", TaskPriority::Urgent, now);
        store.save(&other_rule).await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_task_frees_the_key() {
        let store = setup_test_store().await;
        let now = Utc::now();
        let mut first = task(9, "payment_follow_up_smart", TaskPriority::High, now);
        store.save(&first).await.unwrap();

        first.transition_to(TaskStatus::Completed, now).unwrap();
        store.update(&first).await.unwrap();
        assert!(store
            .find_open_task(SubjectType::Quotation, 9, "payment_follow_up_smart")
            .await
            .unwrap()
            .is_none());

        let second = task(9, "payment_follow_up_smart", TaskPriority::High, now + Duration::days(1));
        store.save(&second).await.unwrap();
        let open = store
            .find_open_task(SubjectType::Quotation, 9, "payment_follow_up_smart")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(open.id, second.id);
    }

    #[tokio::test]
    async fn test_list_orders_by_priority_and_filters() {
        let store = setup_test_store().await;
        let now = Utc::now();
        store.save(&task(1, "a", TaskPriority::Low, now)).await.unwrap();
        store.save(&task(2, "b", TaskPriority::Urgent, now)).await.unwrap();
        store.save(&task(3, "c", TaskPriority::Medium, now)).await.unwrap();

        let all = store.list(TaskFilter::default()).await.unwrap();
        let priorities: Vec<_> = all.iter().map(|t| t.priority).collect();
        assert_eq!(
            priorities,
            vec![TaskPriority::Urgent, TaskPriority::Medium, TaskPriority::Low]
        );

        let urgent = store
            .list(TaskFilter {
                priority: Some(TaskPriority::Urgent),
                ..TaskFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(urgent.len(), 1);

        let limited = store
            .list(TaskFilter {
                limit: Some(2),
                ..TaskFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_task() {
        let store = setup_test_store().await;
        let ghost = task(1, "a", TaskPriority::Low, Utc::now());
        let err = store.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::TaskNotFound(_)));
    }

    #[tokio::test]
    async fn test_performance_by_assignee() {
        let store = setup_test_store().await;
        let now = Utc::now();
        let mut done = task(1, "a", TaskPriority::High, now);
        store.save(&done).await.unwrap();
        store.save(&task(2, "b", TaskPriority::High, now)).await.unwrap();
        done.transition_to(TaskStatus::Completed, now).unwrap();
        store.update(&done).await.unwrap();

        let perf = store.performance_by_assignee().await.unwrap();
        assert_eq!(perf.len(), 1);
        assert_eq!(perf[0].assigned_to, "Kiran");
        assert_eq!(perf[0].total_tasks, 2);
        assert_eq!(perf[0].completed_tasks, 1);
        assert_eq!(perf[0].open_tasks, 1);
        assert!((perf[0].completion_rate() - 0.5).abs() < f64::EPSILON);
        assert!((perf[0].revenue_impact - 60_000.0).abs() < f64::EPSILON);
    }
}

//! Employee roster entries used for task assignment.

use serde::{Deserialize, Serialize};

/// A member of the studio staff. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRosterEntry {
    pub id: i64,
    pub name: String,
    /// Job titles held, e.g. `["Sales Head", "SEO"]`.
    #[serde(default)]
    pub role_titles: Vec<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl EmployeeRosterEntry {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            role_titles: Vec::new(),
            department: None,
            is_active: true,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role_titles.push(role.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Case-insensitive substring match of `role` against titles and department.
    pub fn holds_role(&self, role: &str) -> bool {
        let needle = role.to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.role_titles
            .iter()
            .any(|title| title.to_lowercase().contains(&needle))
            || self.in_department(role)
    }

    /// Case-insensitive substring match of `department` against the department.
    pub fn in_department(&self, department: &str) -> bool {
        let needle = department.to_lowercase();
        !needle.is_empty()
            && self
                .department
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

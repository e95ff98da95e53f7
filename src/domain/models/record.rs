//! Business records the engine reads: quotations and leads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whole days elapsed between `reference` and `now`, clamped at zero.
pub fn days_since(reference: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - reference).num_days().max(0)
}

/// Kind of record a task is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    Quotation,
    Lead,
}

impl SubjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quotation => "quotation",
            Self::Lead => "lead",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quotation" => Some(Self::Quotation),
            "lead" => Some(Self::Lead),
            _ => None,
        }
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    Draft,
    Sent,
    Approved,
    Completed,
    Cancelled,
}

impl QuotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Approved => "approved",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "approved" => Some(Self::Approved),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Lifecycle status of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Assigned,
    Converted,
    Closed,
    Rejected,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Assigned => "assigned",
            Self::Converted => "converted",
            Self::Closed => "closed",
            Self::Rejected => "rejected",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "assigned" => Some(Self::Assigned),
            "converted" => Some(Self::Converted),
            "closed" => Some(Self::Closed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// A priced proposal sent to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub id: i64,
    pub client_name: String,
    /// Quoted amount in whole currency units. Never negative.
    pub total_amount: f64,
    pub status: QuotationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quotation {
    pub fn new(
        id: i64,
        client_name: impl Into<String>,
        total_amount: f64,
        status: QuotationStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            client_name: client_name.into(),
            total_amount,
            status,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.total_amount.is_finite() || self.total_amount < 0.0 {
            return Err(format!(
                "Quotation {} has invalid total_amount {}",
                self.id, self.total_amount
            ));
        }
        if self.updated_at < self.created_at {
            return Err(format!("Quotation {} was updated before it was created", self.id));
        }
        Ok(())
    }
}

/// An unqualified prospective client, prior to quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub client_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub estimated_value: Option<f64>,
}

impl Lead {
    pub fn new(
        id: i64,
        client_name: impl Into<String>,
        status: LeadStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            client_name: client_name.into(),
            company_name: None,
            status,
            created_at,
            updated_at: created_at,
            estimated_value: None,
        }
    }

    pub fn with_estimated_value(mut self, value: f64) -> Self {
        self.estimated_value = Some(value);
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company_name = Some(company.into());
        self
    }

    /// Name shown on tasks: client, then company, then a placeholder.
    pub fn display_name(&self) -> String {
        if !self.client_name.trim().is_empty() {
            return self.client_name.clone();
        }
        match &self.company_name {
            Some(company) if !company.trim().is_empty() => company.clone(),
            _ => "Unknown Lead".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(value) = self.estimated_value {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("Lead {} has invalid estimated_value {}", self.id, value));
            }
        }
        if self.updated_at < self.created_at {
            return Err(format!("Lead {} was updated before it was created", self.id));
        }
        Ok(())
    }
}

/// Any record a rule can be evaluated against.
#[derive(Debug, Clone, PartialEq)]
pub enum BusinessRecord {
    Quotation(Quotation),
    Lead(Lead),
}

impl BusinessRecord {
    pub fn subject_type(&self) -> SubjectType {
        match self {
            Self::Quotation(_) => SubjectType::Quotation,
            Self::Lead(_) => SubjectType::Lead,
        }
    }

    pub fn subject_id(&self) -> i64 {
        match self {
            Self::Quotation(q) => q.id,
            Self::Lead(l) => l.id,
        }
    }

    /// Short label for logs, e.g. `quotation#42`.
    pub fn label(&self) -> String {
        format!("{}#{}", self.subject_type(), self.subject_id())
    }
}

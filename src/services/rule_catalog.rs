//! Rule catalog for follow-up task generation.
//!
//! A [`Rule`] pairs a pure condition over one business record with a
//! generator that turns the record into a [`TaskDraft`]. The
//! [`RuleCatalog`] holds rules in evaluation order, each with an enabled
//! flag, and evaluates every enabled rule against every record. All matching
//! rules fire independently; the catalog applies no precedence between them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    days_since, BusinessRecord, EngineConfig, Lead, LeadStatus, PriorityInputs, PriorityPolicy,
    Quotation, QuotationStatus, SubjectType, TaskDraft, TaskPriority,
};

// ---------------------------------------------------------------------------
// Rule trait
// ---------------------------------------------------------------------------

/// A named business rule.
///
/// `matches` must be a pure predicate: no clock reads, no I/O. Every age
/// threshold is measured against the `now` handed in by the caller.
pub trait Rule: Send + Sync {
    /// Unique id within a catalog; part of the task dedup key.
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Static hint used for reporting order only.
    fn priority_hint(&self) -> TaskPriority;

    /// Kind of record this rule inspects.
    fn subject_type(&self) -> SubjectType;

    fn matches(&self, record: &BusinessRecord, now: DateTime<Utc>) -> bool;

    /// Build the draft for a matching record. Deterministic in `(record, now)`.
    fn draft(&self, record: &BusinessRecord, now: DateTime<Utc>) -> DomainResult<TaskDraft>;
}

// ---------------------------------------------------------------------------
// Built-in rules
// ---------------------------------------------------------------------------

/// Rules shipped with the engine, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinRule {
    QuotationApprovalNeeded,
    QuotationFollowupSmart,
    PaymentFollowUpSmart,
    ClientRelationshipMaintenance,
    UrgentHighValueEscalation,
    LeadQualificationSmart,
}

impl BuiltinRule {
    pub const ALL: [BuiltinRule; 6] = [
        Self::QuotationApprovalNeeded,
        Self::QuotationFollowupSmart,
        Self::PaymentFollowUpSmart,
        Self::ClientRelationshipMaintenance,
        Self::UrgentHighValueEscalation,
        Self::LeadQualificationSmart,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::QuotationApprovalNeeded => "quotation_approval_needed",
            Self::QuotationFollowupSmart => "quotation_followup_smart",
            Self::PaymentFollowUpSmart => "payment_follow_up_smart",
            Self::ClientRelationshipMaintenance => "client_relationship_maintenance",
            Self::UrgentHighValueEscalation => "urgent_high_value_escalation",
            Self::LeadQualificationSmart => "lead_qualification_smart",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::QuotationApprovalNeeded => "Quotation Approval Required",
            Self::QuotationFollowupSmart => "Smart Quotation Follow-up",
            Self::PaymentFollowUpSmart => "Smart Payment Follow-up",
            Self::ClientRelationshipMaintenance => "Client Relationship Maintenance",
            Self::UrgentHighValueEscalation => "Urgent High-Value Escalation",
            Self::LeadQualificationSmart => "Smart Lead Qualification",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::QuotationApprovalNeeded => "Draft quotations need review and approval",
            Self::QuotationFollowupSmart => "Follow up on sent quotations, more urgently as they age",
            Self::PaymentFollowUpSmart => "Chase payment on approved quotations",
            Self::ClientRelationshipMaintenance => "Check in with clients a month after completion",
            Self::UrgentHighValueEscalation => "Escalate stalled high-value quotations to management",
            Self::LeadQualificationSmart => "Qualify new and contacted leads",
        }
    }

    pub fn priority_hint(&self) -> TaskPriority {
        match self {
            Self::QuotationApprovalNeeded
            | Self::QuotationFollowupSmart
            | Self::PaymentFollowUpSmart => TaskPriority::High,
            Self::ClientRelationshipMaintenance => TaskPriority::Low,
            Self::UrgentHighValueEscalation => TaskPriority::Urgent,
            Self::LeadQualificationSmart => TaskPriority::Medium,
        }
    }

    pub fn subject_type(&self) -> SubjectType {
        match self {
            Self::LeadQualificationSmart => SubjectType::Lead,
            _ => SubjectType::Quotation,
        }
    }
}

/// Settings the built-in generators need.
#[derive(Debug, Clone)]
pub struct RuleContext {
    pub escalation_contact: String,
    pub currency_symbol: String,
    pub lead_default_value: f64,
    pub high_value_threshold: f64,
}

impl Default for RuleContext {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for RuleContext {
    fn from(config: &EngineConfig) -> Self {
        Self {
            escalation_contact: config.escalation_contact.clone(),
            currency_symbol: config.currency_symbol.clone(),
            lead_default_value: config.lead_default_value,
            high_value_threshold: config.high_value_threshold,
        }
    }
}

impl RuleContext {
    fn money(&self, value: f64) -> String {
        format_amount(&self.currency_symbol, value)
    }
}

/// A built-in rule bound to its context.
#[derive(Debug, Clone)]
pub struct StandardRule {
    kind: BuiltinRule,
    context: RuleContext,
}

impl StandardRule {
    pub fn new(kind: BuiltinRule, context: RuleContext) -> Self {
        Self { kind, context }
    }

    pub fn kind(&self) -> BuiltinRule {
        self.kind
    }

    fn roles(list: &[&str]) -> Vec<String> {
        list.iter().map(|role| (*role).to_string()).collect()
    }

    fn quotation_draft(&self, quotation: &Quotation, now: DateTime<Utc>) -> DomainResult<TaskDraft> {
        quotation.validate().map_err(|reason| self.failure(&quotation_label(quotation), reason))?;

        let client = quotation.client_name.as_str();
        let amount = self.context.money(quotation.total_amount);
        let base = |days: i64| Skeleton {
            rule_id: self.kind.id(),
            subject_type: SubjectType::Quotation,
            subject_id: quotation.id,
            client_name: client.to_string(),
            value: quotation.total_amount,
            days,
        };

        let draft = match self.kind {
            BuiltinRule::QuotationApprovalNeeded => {
                let days = days_since(quotation.created_at, now);
                base(days).finish(
                    format!("Review and approve quotation for {client}"),
                    format!(
                        "Review the quotation for {client} ({amount}) and approve it for sending. \
                         Check pricing, terms, and completeness."
                    ),
                    PriorityPolicy::Computed {
                        floor: Some(TaskPriority::Medium),
                    },
                    2,
                    format!(
                        "Draft quotation needs approval before sending. Value: {amount}. \
                         Created {days} days ago."
                    ),
                    format!("Revenue approval: {amount} • Quality control • Client relationship start"),
                    Self::roles(&["SALES MANAGER", "MANAGER", "CTO", "SALES"]),
                    None,
                )
            }
            BuiltinRule::QuotationFollowupSmart => {
                let days = days_since(quotation.updated_at, now);
                let priority = if days >= 5 {
                    TaskPriority::Urgent
                } else if days >= 3 {
                    TaskPriority::High
                } else {
                    TaskPriority::Medium
                };
                let risk = if days >= 5 {
                    "CRITICAL: risk of losing the client."
                } else {
                    "Standard follow-up required."
                };
                base(days).finish(
                    format!("Follow up with {client} about quotation"),
                    format!(
                        "Contact {client} regarding their quotation ({amount}) sent {days} days ago. \
                         Check their interest, answer questions, and request feedback."
                    ),
                    PriorityPolicy::Fixed { priority },
                    if days >= 5 { 0 } else { 1 },
                    format!(
                        "Quotation sent {days} days ago without response. {risk} Value at risk: {amount}."
                    ),
                    format!(
                        "Revenue recovery: {amount} • Deal closure risk: {} • Client relationship maintenance",
                        if days >= 5 { "HIGH" } else { "MEDIUM" }
                    ),
                    Self::roles(&["SALES", "SEO"]),
                    None,
                )
            }
            BuiltinRule::PaymentFollowUpSmart => {
                let days = days_since(quotation.updated_at, now);
                let critical = days >= 7;
                base(days).finish(
                    format!("Payment follow-up for {client}"),
                    format!(
                        "Follow up on payment for the approved quotation from {client} ({amount}). \
                         Send a payment reminder and confirm the timeline. Approved {days} days ago."
                    ),
                    PriorityPolicy::Fixed {
                        priority: if critical {
                            TaskPriority::Urgent
                        } else {
                            TaskPriority::High
                        },
                    },
                    if critical { 0 } else { 1 },
                    format!(
                        "Payment pending for {days} days on an approved quotation. {} Revenue at risk: {amount}.",
                        if critical {
                            "CRITICAL: extended payment delay."
                        } else {
                            "Standard payment follow-up."
                        }
                    ),
                    format!("Cash flow impact: {amount} • Payment delay risk • Client account management"),
                    Self::roles(&["ACCOUNTS", "SALES"]),
                    None,
                )
            }
            BuiltinRule::ClientRelationshipMaintenance => {
                let days = days_since(quotation.updated_at, now);
                base(days).finish(
                    format!("Relationship check-in with {client}"),
                    format!(
                        "Check in with {client} after project completion. Gather feedback, explore \
                         additional opportunities, and keep the relationship warm. Last contact {days} days ago."
                    ),
                    PriorityPolicy::Fixed {
                        priority: TaskPriority::Low,
                    },
                    7,
                    format!(
                        "Project completed {days} days ago. Time for relationship maintenance and upselling."
                    ),
                    "Client retention • Upselling opportunity • Referral generation".to_string(),
                    Self::roles(&["SALES", "MANAGER"]),
                    None,
                )
            }
            BuiltinRule::UrgentHighValueEscalation => {
                let days = days_since(quotation.updated_at, now);
                base(days).finish(
                    format!("URGENT: High-value client escalation - {client}"),
                    format!(
                        "ESCALATION REQUIRED: high-value quotation ({amount}) for {client} has been pending \
                         for {days} days. Immediate management attention required."
                    ),
                    PriorityPolicy::Fixed {
                        priority: TaskPriority::Urgent,
                    },
                    0,
                    format!(
                        "High-value quotation ({amount}) delayed for {days} days. Risk of losing a major client."
                    ),
                    format!(
                        "CRITICAL REVENUE RISK: {amount} • Executive attention required • Major client retention"
                    ),
                    Self::roles(&["MANAGER"]),
                    Some(self.context.escalation_contact.clone()),
                )
            }
            BuiltinRule::LeadQualificationSmart => {
                return Err(self.failure(
                    &quotation_label(quotation),
                    "lead rule applied to a quotation".to_string(),
                ))
            }
        };

        Ok(draft)
    }

    fn lead_draft(&self, lead: &Lead, now: DateTime<Utc>) -> DomainResult<TaskDraft> {
        if self.kind != BuiltinRule::LeadQualificationSmart {
            return Err(self.failure(
                &lead_label(lead),
                "quotation rule applied to a lead".to_string(),
            ));
        }
        lead.validate().map_err(|reason| self.failure(&lead_label(lead), reason))?;

        let client = lead.display_name();
        let value = lead.estimated_value.unwrap_or(self.context.lead_default_value);
        let amount = self.context.money(value);
        let days = days_since(lead.created_at, now);
        let priority = if days >= 3 {
            TaskPriority::High
        } else {
            TaskPriority::Medium
        };

        Ok(Skeleton {
            rule_id: self.kind.id(),
            subject_type: SubjectType::Lead,
            subject_id: lead.id,
            client_name: client.clone(),
            value,
            days,
        }
        .finish(
            format!("Qualify and convert lead: {client}"),
            format!(
                "Follow up with {client} to qualify their requirements and convert to a quotation. \
                 Lead created {days} days ago. Assess budget, timeline, and specific needs."
            ),
            PriorityPolicy::Fixed { priority },
            if days >= 3 { 1 } else { 2 },
            format!(
                "Lead in {} status for {days} days. Needs qualification to progress the pipeline. \
                 Estimated value: {amount}.",
                lead.status.as_str()
            ),
            format!("Pipeline progression • Lead conversion • Revenue opportunity: {amount}"),
            Self::roles(&["SALES", "SEO"]),
            None,
        ))
    }

    fn failure(&self, subject: &str, reason: String) -> DomainError {
        DomainError::RuleEvaluation {
            rule_id: self.kind.id().to_string(),
            subject: subject.to_string(),
            reason,
        }
    }
}

impl Rule for StandardRule {
    fn id(&self) -> &str {
        self.kind.id()
    }

    fn name(&self) -> &str {
        self.kind.name()
    }

    fn description(&self) -> &str {
        self.kind.description()
    }

    fn priority_hint(&self) -> TaskPriority {
        self.kind.priority_hint()
    }

    fn subject_type(&self) -> SubjectType {
        self.kind.subject_type()
    }

    fn matches(&self, record: &BusinessRecord, now: DateTime<Utc>) -> bool {
        match (self.kind, record) {
            (BuiltinRule::QuotationApprovalNeeded, BusinessRecord::Quotation(q)) => {
                q.status == QuotationStatus::Draft && days_since(q.created_at, now) >= 0
            }
            (BuiltinRule::QuotationFollowupSmart, BusinessRecord::Quotation(q)) => {
                q.status == QuotationStatus::Sent && days_since(q.updated_at, now) >= 1
            }
            (BuiltinRule::PaymentFollowUpSmart, BusinessRecord::Quotation(q)) => {
                q.status == QuotationStatus::Approved && days_since(q.updated_at, now) >= 3
            }
            (BuiltinRule::ClientRelationshipMaintenance, BusinessRecord::Quotation(q)) => {
                q.status == QuotationStatus::Completed && days_since(q.updated_at, now) >= 30
            }
            (BuiltinRule::UrgentHighValueEscalation, BusinessRecord::Quotation(q)) => {
                q.total_amount >= self.context.high_value_threshold
                    && q.status == QuotationStatus::Sent
                    && days_since(q.updated_at, now) >= 3
            }
            (BuiltinRule::LeadQualificationSmart, BusinessRecord::Lead(l)) => {
                matches!(l.status, LeadStatus::New | LeadStatus::Contacted)
                    && days_since(l.created_at, now) >= 1
            }
            _ => false,
        }
    }

    fn draft(&self, record: &BusinessRecord, now: DateTime<Utc>) -> DomainResult<TaskDraft> {
        match record {
            BusinessRecord::Quotation(q) => self.quotation_draft(q, now),
            BusinessRecord::Lead(l) => self.lead_draft(l, now),
        }
    }
}

/// Fields shared by every draft a built-in rule produces.
struct Skeleton<'a> {
    rule_id: &'a str,
    subject_type: SubjectType,
    subject_id: i64,
    client_name: String,
    value: f64,
    days: i64,
}

impl Skeleton<'_> {
    #[allow(clippy::too_many_arguments)]
    fn finish(
        self,
        title: String,
        description: String,
        priority_policy: PriorityPolicy,
        due_in_days: i64,
        reasoning: String,
        business_impact: String,
        preferred_assignee_roles: Vec<String>,
        assignee_override: Option<String>,
    ) -> TaskDraft {
        TaskDraft {
            rule_id: self.rule_id.to_string(),
            title,
            description,
            subject_type: self.subject_type,
            subject_id: self.subject_id,
            client_name: self.client_name,
            estimated_value: self.value,
            priority_inputs: PriorityInputs {
                value: self.value,
                days_elapsed: self.days,
            },
            priority_policy,
            due_in_days,
            reasoning,
            business_impact,
            preferred_assignee_roles,
            assignee_override,
        }
    }
}

fn quotation_label(q: &Quotation) -> String {
    format!("quotation#{}", q.id)
}

fn lead_label(l: &Lead) -> String {
    format!("lead#{}", l.id)
}

/// Render an amount as whole units with thousands separators, e.g. `₹120,000`.
pub fn format_amount(symbol: &str, value: f64) -> String {
    let whole = value.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if whole < 0 { "-" } else { "" };
    format!("{sign}{symbol}{grouped}")
}

// ---------------------------------------------------------------------------
// RuleCatalog
// ---------------------------------------------------------------------------

struct CatalogEntry {
    rule: Box<dyn Rule>,
    enabled: bool,
}

/// Serializable view of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub subject_type: SubjectType,
    pub priority_hint: TaskPriority,
    pub enabled: bool,
}

/// Drafts and per-rule failures from one evaluation pass.
#[derive(Debug, Default)]
pub struct CatalogEvaluation {
    pub drafts: Vec<TaskDraft>,
    /// Always [`DomainError::RuleEvaluation`]; the pass continued past each.
    pub failures: Vec<DomainError>,
}

/// Ordered set of rules with enabled flags.
#[derive(Default)]
pub struct RuleCatalog {
    entries: Vec<CatalogEntry>,
}

impl RuleCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in rules, enabled, in catalog order.
    pub fn builtin(context: RuleContext) -> Self {
        Self {
            entries: BuiltinRule::ALL
                .into_iter()
                .map(|kind| CatalogEntry {
                    rule: Box::new(StandardRule::new(kind, context.clone())),
                    enabled: true,
                })
                .collect(),
        }
    }

    /// Built-in rules with `config.disabled_rules` switched off.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut catalog = Self::builtin(RuleContext::from(config));
        for rule_id in &config.disabled_rules {
            if !catalog.set_enabled(rule_id, false) {
                tracing::warn!(rule_id = %rule_id, "Disabled rule is not in the catalog");
            }
        }
        catalog
    }

    /// Append a rule. Ids must be unique.
    pub fn add_rule(&mut self, rule: impl Rule + 'static) -> DomainResult<()> {
        if self.entries.iter().any(|e| e.rule.id() == rule.id()) {
            return Err(DomainError::ValidationFailed(format!(
                "Duplicate rule id: {}",
                rule.id()
            )));
        }
        self.entries.push(CatalogEntry {
            rule: Box::new(rule),
            enabled: true,
        });
        Ok(())
    }

    /// Enable or disable a rule by id. Returns `false` for unknown ids.
    pub fn set_enabled(&mut self, rule_id: &str, enabled: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.rule.id() == rule_id) {
            Some(entry) => {
                entry.enabled = enabled;
                tracing::info!(rule_id = %rule_id, enabled, "Rule toggled");
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self, rule_id: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|e| e.rule.id() == rule_id)
            .map(|e| e.enabled)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summaries(&self) -> Vec<RuleSummary> {
        self.entries
            .iter()
            .map(|e| RuleSummary {
                id: e.rule.id().to_string(),
                name: e.rule.name().to_string(),
                description: e.rule.description().to_string(),
                subject_type: e.rule.subject_type(),
                priority_hint: e.rule.priority_hint(),
                enabled: e.enabled,
            })
            .collect()
    }

    /// Evaluate one rule on one record: a draft iff the condition holds.
    pub fn evaluate(
        rule: &dyn Rule,
        record: &BusinessRecord,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<TaskDraft>> {
        if rule.subject_type() != record.subject_type() || !rule.matches(record, now) {
            return Ok(None);
        }
        let draft = rule.draft(record, now)?;
        if draft.rule_id != rule.id() {
            return Err(DomainError::RuleEvaluation {
                rule_id: rule.id().to_string(),
                subject: record.label(),
                reason: format!("draft carries foreign rule id {}", draft.rule_id),
            });
        }
        Ok(Some(draft))
    }

    /// Evaluate every enabled rule against one record.
    pub fn evaluate_record(&self, record: &BusinessRecord, now: DateTime<Utc>) -> CatalogEvaluation {
        let mut out = CatalogEvaluation::default();
        self.evaluate_into(record, now, &mut out);
        out
    }

    /// Evaluate every enabled rule against every record.
    pub fn evaluate_all(&self, records: &[BusinessRecord], now: DateTime<Utc>) -> CatalogEvaluation {
        let mut out = CatalogEvaluation::default();
        for record in records {
            self.evaluate_into(record, now, &mut out);
        }
        out
    }

    fn evaluate_into(&self, record: &BusinessRecord, now: DateTime<Utc>, out: &mut CatalogEvaluation) {
        for entry in self.entries.iter().filter(|e| e.enabled) {
            match Self::evaluate(entry.rule.as_ref(), record, now) {
                Ok(Some(draft)) => out.drafts.push(draft),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        rule_id = %entry.rule.id(),
                        subject = %record.label(),
                        error = %err,
                        "Rule evaluation failed, continuing"
                    );
                    out.failures.push(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-10T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn quotation(id: i64, amount: f64, status: QuotationStatus, days_ago: i64) -> BusinessRecord {
        let at = now() - Duration::days(days_ago);
        BusinessRecord::Quotation(Quotation::new(id, "Asha Menon", amount, status, at))
    }

    fn lead(id: i64, status: LeadStatus, days_ago: i64) -> BusinessRecord {
        let at = now() - Duration::days(days_ago);
        BusinessRecord::Lead(Lead::new(id, "Ravi Kumar", status, at))
    }

    fn catalog() -> RuleCatalog {
        RuleCatalog::builtin(RuleContext::default())
    }

    fn rule_ids(eval: &CatalogEvaluation) -> Vec<&str> {
        eval.drafts.iter().map(|d| d.rule_id.as_str()).collect()
    }

    struct FailingRule;

    impl Rule for FailingRule {
        fn id(&self) -> &str {
            "always_fails"
        }
        fn name(&self) -> &str {
            "Always fails"
        }
        fn description(&self) -> &str {
            ""
        }
        fn priority_hint(&self) -> TaskPriority {
            TaskPriority::Low
        }
        fn subject_type(&self) -> SubjectType {
            SubjectType::Quotation
        }
        fn matches(&self, _record: &BusinessRecord, _now: DateTime<Utc>) -> bool {
            true
        }
        fn draft(&self, record: &BusinessRecord, _now: DateTime<Utc>) -> DomainResult<TaskDraft> {
            Err(DomainError::RuleEvaluation {
                rule_id: self.id().to_string(),
                subject: record.label(),
                reason: "template error".to_string(),
            })
        }
    }

    #[test]
    fn test_builtin_order_and_ids() {
        let ids: Vec<String> = catalog().summaries().into_iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                "quotation_approval_needed",
                "quotation_followup_smart",
                "payment_follow_up_smart",
                "client_relationship_maintenance",
                "urgent_high_value_escalation",
                "lead_qualification_smart",
            ]
        );
        assert_eq!(
            BuiltinRule::from_id("payment_follow_up_smart"),
            Some(BuiltinRule::PaymentFollowUpSmart)
        );
    }

    #[test]
    fn test_draft_quotation_needs_approval_same_day() {
        let eval = catalog().evaluate_record(&quotation(1, 20_000.0, QuotationStatus::Draft, 0), now());
        assert_eq!(rule_ids(&eval), vec!["quotation_approval_needed"]);

        let draft = &eval.drafts[0];
        assert_eq!(draft.due_in_days, 2);
        assert_eq!(
            draft.priority_policy,
            PriorityPolicy::Computed {
                floor: Some(TaskPriority::Medium)
            }
        );
        assert!(draft.description.contains("₹20,000"));
    }

    #[test]
    fn test_sent_high_value_fires_followup_and_escalation() {
        let eval = catalog().evaluate_record(&quotation(7, 120_000.0, QuotationStatus::Sent, 4), now());
        assert_eq!(
            rule_ids(&eval),
            vec!["quotation_followup_smart", "urgent_high_value_escalation"]
        );

        let followup = &eval.drafts[0];
        assert_eq!(
            followup.priority_policy,
            PriorityPolicy::Fixed {
                priority: TaskPriority::High
            }
        );
        assert_eq!(followup.due_in_days, 1);

        let escalation = &eval.drafts[1];
        assert_eq!(escalation.assignee_override.as_deref(), Some("Head of Sales"));
        assert_eq!(escalation.due_in_days, 0);
    }

    #[test]
    fn test_followup_priority_bands() {
        let catalog = catalog();
        let expect = |days: i64, priority: TaskPriority, due: i64| {
            let eval = catalog.evaluate_record(&quotation(1, 10_000.0, QuotationStatus::Sent, days), now());
            assert_eq!(eval.drafts.len(), 1, "days={days}");
            assert_eq!(eval.drafts[0].priority_policy, PriorityPolicy::Fixed { priority });
            assert_eq!(eval.drafts[0].due_in_days, due);
        };
        expect(1, TaskPriority::Medium, 1);
        expect(3, TaskPriority::High, 1);
        expect(5, TaskPriority::Urgent, 0);

        let eval = catalog.evaluate_record(&quotation(1, 10_000.0, QuotationStatus::Sent, 0), now());
        assert!(eval.drafts.is_empty());
    }

    #[test]
    fn test_followup_measures_from_updated_at() {
        let created = now() - Duration::days(20);
        let record = BusinessRecord::Quotation(
            Quotation::new(3, "Asha", 10_000.0, QuotationStatus::Sent, created)
                .with_updated_at(now() - Duration::hours(12)),
        );
        assert!(catalog().evaluate_record(&record, now()).drafts.is_empty());
    }

    #[test]
    fn test_payment_and_relationship_thresholds() {
        let catalog = catalog();

        let eval = catalog.evaluate_record(&quotation(2, 10_000.0, QuotationStatus::Approved, 2), now());
        assert!(eval.drafts.is_empty());

        let eval = catalog.evaluate_record(&quotation(2, 10_000.0, QuotationStatus::Approved, 7), now());
        assert_eq!(rule_ids(&eval), vec!["payment_follow_up_smart"]);
        assert_eq!(
            eval.drafts[0].priority_policy,
            PriorityPolicy::Fixed {
                priority: TaskPriority::Urgent
            }
        );

        let eval = catalog.evaluate_record(&quotation(4, 10_000.0, QuotationStatus::Completed, 30), now());
        assert_eq!(rule_ids(&eval), vec!["client_relationship_maintenance"]);
        assert_eq!(eval.drafts[0].due_in_days, 7);

        let eval = catalog.evaluate_record(&quotation(5, 900_000.0, QuotationStatus::Cancelled, 90), now());
        assert!(eval.drafts.is_empty());
    }

    #[test]
    fn test_old_new_lead_still_qualifies() {
        let eval = catalog().evaluate_record(&lead(11, LeadStatus::New, 10), now());
        assert_eq!(rule_ids(&eval), vec!["lead_qualification_smart"]);

        let draft = &eval.drafts[0];
        assert_eq!(
            draft.priority_policy,
            PriorityPolicy::Fixed {
                priority: TaskPriority::High
            }
        );
        assert_eq!(draft.estimated_value, 30_000.0);
        assert_eq!(draft.subject_type, SubjectType::Lead);
    }

    #[test]
    fn test_lead_statuses_outside_pipeline_are_ignored() {
        let catalog = catalog();
        for status in [LeadStatus::Assigned, LeadStatus::Converted, LeadStatus::Closed, LeadStatus::Rejected] {
            assert!(catalog.evaluate_record(&lead(1, status, 10), now()).drafts.is_empty());
        }
        assert!(catalog.evaluate_record(&lead(1, LeadStatus::Contacted, 0), now()).drafts.is_empty());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let catalog = catalog();
        let record = quotation(9, 75_000.0, QuotationStatus::Sent, 3);
        let first = catalog.evaluate_record(&record, now());
        let second = catalog.evaluate_record(&record, now());
        assert_eq!(first.drafts, second.drafts);
    }

    #[test]
    fn test_disabled_rules_do_not_fire() {
        let mut config = EngineConfig::default();
        config.disabled_rules = vec!["quotation_followup_smart".to_string(), "no_such_rule".to_string()];
        let catalog = RuleCatalog::from_config(&config);

        assert_eq!(catalog.is_enabled("quotation_followup_smart"), Some(false));
        assert_eq!(catalog.is_enabled("no_such_rule"), None);

        let eval = catalog.evaluate_record(&quotation(7, 120_000.0, QuotationStatus::Sent, 4), now());
        assert_eq!(rule_ids(&eval), vec!["urgent_high_value_escalation"]);
    }

    #[test]
    fn test_failing_rule_does_not_stop_other_rules() {
        let mut catalog = catalog();
        catalog.add_rule(FailingRule).unwrap();

        let records = vec![
            quotation(1, 10_000.0, QuotationStatus::Draft, 0),
            quotation(2, 10_000.0, QuotationStatus::Approved, 4),
        ];
        let eval = catalog.evaluate_all(&records, now());

        assert_eq!(eval.drafts.len(), 2);
        assert_eq!(eval.failures.len(), 2);
        assert!(matches!(
            &eval.failures[0],
            DomainError::RuleEvaluation { rule_id, .. } if rule_id == "always_fails"
        ));
    }

    #[test]
    fn test_invalid_record_surfaces_as_rule_failure() {
        let eval = catalog().evaluate_record(&quotation(3, f64::NAN, QuotationStatus::Draft, 1), now());
        assert!(eval.drafts.is_empty());
        assert_eq!(eval.failures.len(), 1);
    }

    #[test]
    fn test_duplicate_rule_id_rejected() {
        let mut catalog = RuleCatalog::new();
        catalog.add_rule(FailingRule).unwrap();
        assert!(catalog.add_rule(FailingRule).is_err());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("₹", 120_000.0), "₹120,000");
        assert_eq!(format_amount("₹", 999.4), "₹999");
        assert_eq!(format_amount("$", 1_234_567.0), "$1,234,567");
        assert_eq!(format_amount("₹", 0.0), "₹0");
    }
}

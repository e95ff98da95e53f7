use crate::domain::models::{Assignee, EmployeeRosterEntry};

/// Picks an assignee for a task from the active roster.
///
/// Order of preference:
/// 1. for each preferred role in order, the first active entry holding it
/// 2. the first active entry in the default department
/// 3. the first active entry
///
/// An empty (or fully inactive) roster yields `None`, which callers record as
/// "unassigned".
#[derive(Debug, Clone)]
pub struct AssignmentResolver {
    default_department: String,
}

impl AssignmentResolver {
    pub fn new(default_department: impl Into<String>) -> Self {
        Self {
            default_department: default_department.into(),
        }
    }

    pub fn resolve<'a>(
        &self,
        preferred_roles: &[String],
        roster: &'a [EmployeeRosterEntry],
    ) -> Option<&'a EmployeeRosterEntry> {
        let active = || roster.iter().filter(|e| e.is_active);

        for role in preferred_roles {
            if let Some(employee) = active().find(|e| e.holds_role(role)) {
                return Some(employee);
            }
        }

        active()
            .find(|e| e.in_department(&self.default_department))
            .or_else(|| active().next())
    }

    /// Resolve straight to an [`Assignee`], honoring a rule-level override.
    pub fn assignee_for(
        &self,
        override_contact: Option<&str>,
        preferred_roles: &[String],
        roster: &[EmployeeRosterEntry],
    ) -> Option<Assignee> {
        if let Some(contact) = override_contact {
            return Some(Assignee::contact(contact));
        }
        self.resolve(preferred_roles, roster).map(|e| Assignee {
            name: e.name.clone(),
            employee_id: Some(e.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn roster() -> Vec<EmployeeRosterEntry> {
        vec![
            EmployeeRosterEntry::new(1, "Arjun")
                .with_role("Photographer")
                .with_department("Production"),
            EmployeeRosterEntry::new(2, "Divya")
                .with_role("Accounts Executive")
                .with_department("Finance")
                .inactive(),
            EmployeeRosterEntry::new(3, "Kiran")
                .with_role("Sales Executive")
                .with_department("Sales"),
            EmployeeRosterEntry::new(4, "Neha")
                .with_role("SEO Lead")
                .with_department("Marketing"),
        ]
    }

    #[test]
    fn test_first_role_in_preference_order_wins() {
        let resolver = AssignmentResolver::new("Sales");
        let roster = roster();

        let picked = resolver.resolve(&roles(&["SEO", "SALES"]), &roster).unwrap();
        assert_eq!(picked.id, 4);

        let picked = resolver.resolve(&roles(&["SALES", "SEO"]), &roster).unwrap();
        assert_eq!(picked.id, 3);
    }

    #[test]
    fn test_inactive_entries_are_skipped() {
        let resolver = AssignmentResolver::new("Sales");
        let roster = roster();

        let picked = resolver.resolve(&roles(&["ACCOUNTS"]), &roster).unwrap();
        // Divya is inactive: fall back to the default department.
        assert_eq!(picked.id, 3);
    }

    #[test]
    fn test_falls_back_to_first_active_entry() {
        let resolver = AssignmentResolver::new("Legal");
        let roster = roster();

        let picked = resolver.resolve(&roles(&["CTO"]), &roster).unwrap();
        assert_eq!(picked.id, 1);
    }

    #[test]
    fn test_empty_roster_is_unassigned() {
        let resolver = AssignmentResolver::new("Sales");
        assert!(resolver.resolve(&roles(&["SALES"]), &[]).is_none());
        assert!(resolver.assignee_for(None, &roles(&["SALES"]), &[]).is_none());

        let all_inactive = vec![EmployeeRosterEntry::new(1, "Old").inactive()];
        assert!(resolver.resolve(&roles(&["SALES"]), &all_inactive).is_none());
    }

    #[test]
    fn test_override_ignores_roster() {
        let resolver = AssignmentResolver::new("Sales");
        let roster = roster();

        let assignee = resolver
            .assignee_for(Some("Head of Sales"), &roles(&["SALES"]), &roster)
            .unwrap();
        assert_eq!(assignee, Assignee::contact("Head of Sales"));

        let assignee = resolver.assignee_for(Some("Head of Sales"), &[], &[]).unwrap();
        assert_eq!(assignee.name, "Head of Sales");
        assert_eq!(assignee.employee_id, None);
    }
}

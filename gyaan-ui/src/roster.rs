//! Teacher roster synchronization
//!
//! Produces a teacher's view of "their" students: the full persisted
//! account set filtered on an exact section match against the teacher's
//! own derived section, partitioned by approval state and projected into
//! summary shapes. Pure filter/projection - no pagination, no sorting
//! contract, no conflict resolution.

use chrono::{DateTime, Utc};
use gyaan_common::db::models::TestSubject;
use gyaan_common::db::Account;
use serde::{Deserialize, Serialize};

/// A student awaiting teacher approval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingStudent {
    pub id: String,
    pub name: String,
    pub section: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

/// An approved student on the active roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub section: String,
    pub xp: i64,
    pub level: i64,
    pub class_name: Option<String>,
    pub test_assigned: Option<TestSubject>,
    pub manual_tasks: Vec<String>,
    pub is_late: bool,
    pub has_completed_assessment: bool,
}

/// Both roster partitions for one teacher's section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub pending: Vec<PendingStudent>,
    pub active: Vec<StudentSummary>,
}

impl Roster {
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.active.is_empty()
    }
}

fn pending_of(account: &Account) -> PendingStudent {
    PendingStudent {
        id: account.id.clone(),
        name: account.name.clone(),
        section: account.section.clone(),
        email: account.email.clone(),
        registered_at: account.registered_at,
    }
}

fn summary_of(account: &Account) -> StudentSummary {
    StudentSummary {
        id: account.id.clone(),
        name: account.name.clone(),
        section: account.section.clone(),
        xp: account.xp,
        level: account.level,
        class_name: account.class_name.clone(),
        test_assigned: account.test_assigned,
        manual_tasks: account.manual_tasks.clone(),
        is_late: account.is_late,
        has_completed_assessment: account.has_completed_assessment,
    }
}

/// Partition student accounts into pending/active for one section.
///
/// Accounts in other sections are invisible to the teacher; approved
/// students land in `active`, the rest in `pending`.
pub fn partition_roster(students: &[Account], section: &str) -> Roster {
    let mut roster = Roster::default();
    for account in students.iter().filter(|a| a.section == section) {
        if account.is_approved {
            roster.active.push(summary_of(account));
        } else {
            roster.pending.push(pending_of(account));
        }
    }
    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use gyaan_common::auth::password_digest;
    use gyaan_common::identity::Role;

    fn student(id: &str, section: &str, approved: bool) -> Account {
        Account {
            id: id.to_string(),
            name: format!("Student {}", id),
            email: String::new(),
            role: Role::Student,
            section: section.to_string(),
            password_digest: password_digest(id, "pass1"),
            is_approved: approved,
            class_name: None,
            test_assigned: None,
            manual_tasks: vec![],
            is_late: false,
            xp: 0,
            level: 0,
            has_completed_assessment: false,
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn partitions_by_approval_and_hides_other_sections() {
        let students = vec![
            student("PRC23CA001", "CA", true),
            student("PRC23CA002", "CA", false),
            student("PRC23CB001", "CB", true),
        ];

        let roster = partition_roster(&students, "CA");

        assert_eq!(roster.active.len(), 1);
        assert_eq!(roster.active[0].id, "PRC23CA001");
        assert_eq!(roster.pending.len(), 1);
        assert_eq!(roster.pending[0].id, "PRC23CA002");
        assert!(roster
            .active
            .iter()
            .chain(std::iter::empty())
            .all(|s| s.id != "PRC23CB001"));
    }

    #[test]
    fn empty_input_yields_empty_roster() {
        let roster = partition_roster(&[], "CA");
        assert!(roster.is_empty());
    }

    #[test]
    fn section_match_is_exact() {
        let students = vec![student("PRC23CA001", "CA", true)];
        let roster = partition_roster(&students, "ca");
        assert!(roster.is_empty());
    }
}

//! Process-wide session store
//!
//! The application's only source of truth at runtime: authenticated
//! identity, role-scoped collections, concept states, reward state.
//! Explicitly constructed and injected through AppState - there is no
//! ambient global.
//!
//! Every operation that depends on a pre-existing authenticated identity
//! is a guarded no-op when that identity is absent, never an error.
//! Authorization is the API layer's job; the store only guards.

use chrono::Utc;
use gyaan_common::concepts::{initial_concepts, Concept, ConceptStatus, ENTRY_CONCEPT_IDS};
use gyaan_common::db::models::RewardConfig;
use gyaan_common::db::{accounts, settings};
use gyaan_common::events::{EventBus, PlatformEvent};
use gyaan_common::identity::{section_of, Role};
use gyaan_common::progression::{level_for_xp, RageMeter};
use gyaan_common::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::debug;

use crate::roster::{partition_roster, Roster};

/// The authenticated identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveUser {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub section: String,
}

/// Progression fields for the authenticated student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProgress {
    pub xp: i64,
    pub level: i64,
    pub rage: RageMeter,
    pub is_approved: bool,
    pub has_completed_assessment: bool,
}

/// A point-in-time snapshot of session state, cheap to clone for handlers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<ActiveUser>,
    pub student: Option<StudentProgress>,
    pub roster: Roster,
    pub concepts: Vec<Concept>,
    pub reward_config: RewardConfig,
    /// One-shot reward-available flag; cleared when the user dismisses or
    /// claims the reward
    pub reward_ready: bool,
}

impl Session {
    fn empty(reward_config: RewardConfig) -> Self {
        Self {
            user: None,
            student: None,
            roster: Roster::default(),
            concepts: initial_concepts(),
            reward_config,
            reward_ready: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// The session store: session state plus its persistence and event wiring
pub struct SessionStore {
    db: SqlitePool,
    events: EventBus,
    inner: RwLock<Session>,
}

impl SessionStore {
    pub fn new(db: SqlitePool, events: EventBus, reward_config: RewardConfig) -> Self {
        Self {
            db,
            events,
            inner: RwLock::new(Session::empty(reward_config)),
        }
    }

    /// Snapshot the current session state
    pub async fn snapshot(&self) -> Session {
        self.inner.read().await.clone()
    }

    /// Install an authenticated identity and its role-scoped collections.
    ///
    /// Validation (credentials, approval) is the caller's job. For a
    /// student the persisted progression fields are loaded, defaulting to
    /// level 0 / 0 XP for accounts that predate persistence of those
    /// fields - deliberately not level 1, so "never evaluated" is
    /// distinguishable from "evaluated at the floor". For a teacher the
    /// full student set is partitioned into pending/active for their
    /// section.
    pub async fn login(&self, name: &str, role: Role, id: &str) -> Result<()> {
        let section = section_of(id);
        let user = ActiveUser {
            id: id.to_string(),
            name: name.to_string(),
            role,
            section: section.clone(),
        };

        let mut session = self.inner.write().await;
        let threshold = session.reward_config.rage_threshold;

        match role {
            Role::Student => {
                let account = accounts::fetch_account(&self.db, id).await?;
                let (xp, level, approved, assessed) = match &account {
                    Some(a) => (a.xp, a.level, a.is_approved, a.has_completed_assessment),
                    None => (0, 0, false, false),
                };
                session.student = Some(StudentProgress {
                    xp,
                    level,
                    rage: RageMeter::new(threshold),
                    is_approved: approved,
                    has_completed_assessment: assessed,
                });
                session.roster = Roster::default();
            }
            Role::Teacher => {
                let students = accounts::list_students(&self.db).await?;
                session.roster = partition_roster(&students, &section);
                session.student = None;
            }
        }

        session.concepts = initial_concepts();
        session.reward_ready = false;
        session.user = Some(user);
        Ok(())
    }

    /// Clear identity and all role-scoped collections. Idempotent.
    pub async fn logout(&self) {
        let mut session = self.inner.write().await;
        let reward_config = session.reward_config.clone();
        *session = Session::empty(reward_config);
    }

    /// Grant XP to the authenticated student.
    ///
    /// Recomputes xp, level, and rage progress; raises the reward-ready
    /// flag when the meter fills (wrapping via modulo); persists xp/level
    /// back into the account row. The session is only mutated after the
    /// write succeeds, so a failed persist leaves the snapshot matching
    /// the account row. Silent no-op when no student is authenticated.
    pub async fn add_xp(&self, amount: i64) -> Result<()> {
        let mut session = self.inner.write().await;

        let Some(user) = session.user.clone().filter(|u| u.role == Role::Student) else {
            debug!("add_xp without an authenticated student; ignoring");
            return Ok(());
        };
        let Some(student) = session.student.as_ref() else {
            debug!("add_xp without student progression; ignoring");
            return Ok(());
        };

        let xp = student.xp + amount;
        let level = level_for_xp(xp);
        let mut rage = student.rage;
        let reward_activated = rage.advance(amount);

        accounts::update_progress(&self.db, &user.id, xp, level).await?;

        if let Some(student) = session.student.as_mut() {
            student.xp = xp;
            student.level = level;
            student.rage = rage;
        }

        self.events.emit(PlatformEvent::XpGranted {
            account_id: user.id.clone(),
            amount,
            xp,
            level,
            timestamp: Utc::now(),
        });

        if reward_activated {
            session.reward_ready = true;
            self.events.emit(PlatformEvent::RewardReady {
                account_id: user.id,
                reward_description: session.reward_config.reward_description.clone(),
                timestamp: Utc::now(),
            });
        }

        Ok(())
    }

    /// Dismiss or claim the pending reward. The flag is one-shot per fill
    /// cycle; dismissing twice is harmless.
    pub async fn dismiss_reward(&self) {
        self.inner.write().await.reward_ready = false;
    }

    /// Complete the initial assessment: grant XP, set the completion
    /// flag, and move the entry concepts of the reading and math tracks
    /// from locked to learning. The only concept-status mutation in the
    /// current design. As with add_xp, the session is only mutated after
    /// the write succeeds.
    pub async fn complete_assessment(&self, xp_earned: i64) -> Result<()> {
        let mut session = self.inner.write().await;

        let Some(user) = session.user.clone().filter(|u| u.role == Role::Student) else {
            debug!("complete_assessment without an authenticated student; ignoring");
            return Ok(());
        };
        let Some(student) = session.student.as_ref() else {
            debug!("complete_assessment without student progression; ignoring");
            return Ok(());
        };

        let xp = student.xp + xp_earned;
        let level = level_for_xp(xp);

        accounts::mark_assessment_complete(&self.db, &user.id, xp, level).await?;

        if let Some(student) = session.student.as_mut() {
            student.xp = xp;
            student.level = level;
            student.has_completed_assessment = true;
        }

        for concept in session.concepts.iter_mut() {
            if ENTRY_CONCEPT_IDS.contains(&concept.id.as_str())
                && concept.status == ConceptStatus::Locked
            {
                concept.status = ConceptStatus::Learning;
            }
        }

        self.events.emit(PlatformEvent::AssessmentCompleted {
            account_id: user.id,
            xp_earned,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Approve a pending student: persist the flag and move their summary
    /// from pending to active. No-op without an authenticated teacher.
    pub async fn approve_student(&self, student_id: &str) -> Result<()> {
        let mut session = self.inner.write().await;

        let Some(user) = session.user.clone().filter(|u| u.role == Role::Teacher) else {
            debug!("approve_student without an authenticated teacher; ignoring");
            return Ok(());
        };

        accounts::set_approved(&self.db, student_id, true).await?;

        // Rebuild from the persisted set rather than editing lists in
        // place; picks up any fields another writer changed meanwhile
        let students = accounts::list_students(&self.db).await?;
        session.roster = partition_roster(&students, &user.section);

        self.events.emit(PlatformEvent::StudentApproved {
            account_id: student_id.to_string(),
            section: user.section,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Remove a student from the active roster.
    ///
    /// Despite the name this un-approves rather than deletes: the account
    /// row survives and the student reappears in the pending list on the
    /// next refresh. Hard deletion is a separate management operation.
    pub async fn remove_student(&self, student_id: &str) -> Result<()> {
        let mut session = self.inner.write().await;

        let Some(user) = session.user.clone().filter(|u| u.role == Role::Teacher) else {
            debug!("remove_student without an authenticated teacher; ignoring");
            return Ok(());
        };

        accounts::set_approved(&self.db, student_id, false).await?;
        session.roster.active.retain(|s| s.id != student_id);

        self.events.emit(PlatformEvent::StudentUnapproved {
            account_id: student_id.to_string(),
            section: user.section,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Re-derive the teacher's pending/active lists from the full
    /// persisted account set. Picks up out-of-band changes from other
    /// writers; the only mitigation for concurrent edits.
    pub async fn refresh_students(&self) -> Result<()> {
        let mut session = self.inner.write().await;

        let Some(user) = session.user.clone().filter(|u| u.role == Role::Teacher) else {
            debug!("refresh_students without an authenticated teacher; ignoring");
            return Ok(());
        };

        let students = accounts::list_students(&self.db).await?;
        session.roster = partition_roster(&students, &user.section);

        self.events.emit(PlatformEvent::RosterRefreshed {
            section: user.section,
            pending: session.roster.pending.len(),
            active: session.roster.active.len(),
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Replace the reward configuration (teacher settings page) and
    /// persist it
    pub async fn set_reward_config(&self, config: RewardConfig) -> Result<()> {
        settings::store_reward_config(&self.db, &config).await?;
        let mut session = self.inner.write().await;
        if let Some(student) = session.student.as_mut() {
            student.rage.threshold = config.rage_threshold;
        }
        session.reward_config = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gyaan_common::auth::password_digest;
    use gyaan_common::db::init_database;
    use gyaan_common::db::models::Account;
    use tempfile::TempDir;

    async fn store_with_student(id: &str) -> (TempDir, sqlx::SqlitePool, SessionStore) {
        let dir = TempDir::new().expect("Should create temp dir");
        let pool = init_database(&dir.path().join("gyaan.db"))
            .await
            .expect("Should initialize database");

        let account = Account {
            id: id.to_string(),
            name: "Asha".to_string(),
            email: String::new(),
            role: Role::Student,
            section: section_of(id),
            password_digest: password_digest(id, "pass1234"),
            is_approved: true,
            class_name: None,
            test_assigned: None,
            manual_tasks: vec![],
            is_late: false,
            xp: 0,
            level: 0,
            has_completed_assessment: false,
            registered_at: Utc::now(),
        };
        accounts::insert_account(&pool, &account).await.unwrap();

        let store = SessionStore::new(pool.clone(), EventBus::default(), RewardConfig::default());
        (dir, pool, store)
    }

    #[tokio::test]
    async fn failed_persist_leaves_session_unchanged() {
        let (_dir, pool, store) = store_with_student("PRC23CA001").await;
        store.login("Asha", Role::Student, "PRC23CA001").await.unwrap();

        // With the pool closed the account write fails; the in-memory
        // progression must not run ahead of the account row
        pool.close().await;
        assert!(store.add_xp(50).await.is_err());

        let session = store.snapshot().await;
        let student = session.student.expect("student progression present");
        assert_eq!(student.xp, 0);
        assert_eq!(student.level, 0);
        assert_eq!(student.rage.progress, 0);
        assert!(!session.reward_ready);
    }

    #[tokio::test]
    async fn failed_assessment_persist_keeps_concepts_locked() {
        let (_dir, pool, store) = store_with_student("PRC23CA001").await;
        store.login("Asha", Role::Student, "PRC23CA001").await.unwrap();

        pool.close().await;
        assert!(store.complete_assessment(50).await.is_err());

        let session = store.snapshot().await;
        let student = session.student.expect("student progression present");
        assert!(!student.has_completed_assessment);
        assert!(session
            .concepts
            .iter()
            .all(|c| c.status == ConceptStatus::Locked));
    }

    #[tokio::test]
    async fn successful_grant_updates_session_and_account_row() {
        let (_dir, pool, store) = store_with_student("PRC23CA001").await;
        store.login("Asha", Role::Student, "PRC23CA001").await.unwrap();

        store.add_xp(250).await.unwrap();

        let session = store.snapshot().await;
        let student = session.student.unwrap();
        assert_eq!(student.xp, 250);
        assert_eq!(student.level, 2);

        let row = accounts::fetch_account(&pool, "PRC23CA001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.xp, 250);
        assert_eq!(row.level, 2);
    }
}

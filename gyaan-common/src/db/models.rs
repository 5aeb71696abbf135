//! Database models

use crate::identity::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student or teacher identity record, keyed by the structured
/// human-entered identifier (always stored uppercase).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub section: String,
    /// Salted SHA-256 digest, never the raw password
    pub password_digest: String,
    pub is_approved: bool,
    /// Denormalized class name; no referential check against the classes
    /// catalog
    pub class_name: Option<String>,
    pub test_assigned: Option<TestSubject>,
    pub manual_tasks: Vec<String>,
    pub is_late: bool,
    pub xp: i64,
    pub level: i64,
    pub has_completed_assessment: bool,
    pub registered_at: DateTime<Utc>,
}

impl Account {
    pub fn has_class(&self) -> bool {
        self.class_name.is_some()
    }
}

/// Subject of a test a teacher can assign to a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestSubject {
    English,
    Hindi,
    Malayalam,
    Math,
}

impl TestSubject {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestSubject::English => "english",
            TestSubject::Hindi => "hindi",
            TestSubject::Malayalam => "malayalam",
            TestSubject::Math => "math",
        }
    }

    pub fn parse(s: &str) -> Option<TestSubject> {
        match s {
            "english" => Some(TestSubject::English),
            "hindi" => Some(TestSubject::Hindi),
            "malayalam" => Some(TestSubject::Malayalam),
            "math" => Some(TestSubject::Math),
            _ => None,
        }
    }
}

/// One per-skill score inside an evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub skill: String,
    pub score: i64,
}

/// The most recent scored assessment result for one account.
///
/// Exactly one current evaluation per account; a retake overwrites it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub account_id: String,
    pub overall: i64,
    pub scores: Vec<SkillScore>,
    pub weaknesses: Vec<String>,
    pub recommended_tasks: Vec<String>,
    pub language: String,
    pub recorded_at: DateTime<Utc>,
}

/// Process-wide reward configuration, teacher-editable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    pub rage_threshold: i64,
    pub reward_type: String,
    pub reward_value: String,
    pub reward_description: String,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            rage_threshold: crate::progression::DEFAULT_RAGE_THRESHOLD,
            reward_type: "bonus_marks".to_string(),
            reward_value: "5".to_string(),
            reward_description: "5 Bonus Marks".to_string(),
        }
    }
}

/// Teacher-owned class list entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecord {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub created_at: DateTime<Utc>,
}

/// Teacher-uploaded content entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub subject: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Teacher-created assignment entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub due_date: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Reward-catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

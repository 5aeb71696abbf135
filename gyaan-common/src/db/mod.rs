//! Database layer: initialization, models, repositories
//!
//! All persisted platform state lives in a single SQLite file under the
//! resolved root folder. Four independent groups of records: accounts,
//! evaluations, teacher catalogs (classes/content/assignments/rewards),
//! and key/value settings (reward config among them).

pub mod accounts;
pub mod catalog;
pub mod evaluations;
pub mod init;
pub mod models;
pub mod settings;

pub use init::init_database;
pub use models::{
    Account, Assignment, ClassRecord, ContentItem, Evaluation, RewardConfig, RewardEntry,
    SkillScore, TestSubject,
};

//! Integration tests for database initialization and repositories
//!
//! Covers automatic schema creation, account round-trips, the
//! overwrite-on-retake evaluation contract, and settings-backed reward
//! configuration defaults.

use chrono::Utc;
use gyaan_common::auth::password_digest;
use gyaan_common::db::accounts;
use gyaan_common::db::evaluations::{fetch_evaluation, upsert_evaluation};
use gyaan_common::db::init_database;
use gyaan_common::db::models::{Evaluation, RewardConfig, SkillScore, TestSubject};
use gyaan_common::db::settings::{load_reward_config, store_reward_config};
use gyaan_common::db::Account;
use gyaan_common::identity::Role;
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn setup_test_db() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("Should create temp dir");
    let db_path = dir.path().join("gyaan.db");
    let pool = init_database(&db_path)
        .await
        .expect("Should initialize database");
    (dir, pool)
}

fn student_account(id: &str, section: &str, approved: bool) -> Account {
    Account {
        id: id.to_string(),
        name: format!("Student {}", id),
        email: format!("{}@gmail.com", id.to_lowercase()),
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

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("fresh.db");
    assert!(!db_path.exists());

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("reopen.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    drop(pool1);

    // Second init is idempotent
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_account_round_trip_preserves_every_field() {
    let (_dir, pool) = setup_test_db().await;

    let mut account = student_account("PRC23CA001", "CA", true);
    account.class_name = Some("Class 3B".to_string());
    account.test_assigned = Some(TestSubject::Hindi);
    account.manual_tasks = vec!["Read page 12".to_string(), "Practice carrying".to_string()];
    account.is_late = true;
    account.xp = 320;
    account.level = 2;
    account.has_completed_assessment = true;

    accounts::insert_account(&pool, &account).await.unwrap();
    let loaded = accounts::fetch_account(&pool, "PRC23CA001")
        .await
        .unwrap()
        .expect("Account should exist");

    assert_eq!(loaded.id, account.id);
    assert_eq!(loaded.name, account.name);
    assert_eq!(loaded.email, account.email);
    assert_eq!(loaded.role, Role::Student);
    assert_eq!(loaded.section, "CA");
    assert_eq!(loaded.password_digest, account.password_digest);
    assert_eq!(loaded.is_approved, true);
    assert_eq!(loaded.class_name.as_deref(), Some("Class 3B"));
    assert_eq!(loaded.test_assigned, Some(TestSubject::Hindi));
    assert_eq!(loaded.manual_tasks, account.manual_tasks);
    assert!(loaded.is_late);
    assert_eq!(loaded.xp, 320);
    assert_eq!(loaded.level, 2);
    assert!(loaded.has_completed_assessment);
}

#[tokio::test]
async fn test_duplicate_identifier_rejected() {
    let (_dir, pool) = setup_test_db().await;

    let account = student_account("PRC23CA002", "CA", false);
    accounts::insert_account(&pool, &account).await.unwrap();

    let duplicate = accounts::insert_account(&pool, &account).await;
    assert!(duplicate.is_err());
}

#[tokio::test]
async fn test_section_listing_filters_exactly() {
    let (_dir, pool) = setup_test_db().await;

    accounts::insert_account(&pool, &student_account("PRC23CA001", "CA", true))
        .await
        .unwrap();
    accounts::insert_account(&pool, &student_account("PRC23CA002", "CA", false))
        .await
        .unwrap();
    accounts::insert_account(&pool, &student_account("PRC23CB001", "CB", true))
        .await
        .unwrap();

    let ca = accounts::list_students_in_section(&pool, "CA").await.unwrap();
    assert_eq!(ca.len(), 2);
    assert!(ca.iter().all(|a| a.section == "CA"));

    let cb = accounts::list_students_in_section(&pool, "CB").await.unwrap();
    assert_eq!(cb.len(), 1);
}

#[tokio::test]
async fn test_class_and_test_assignment_lifecycle() {
    let (_dir, pool) = setup_test_db().await;

    accounts::insert_account(&pool, &student_account("PRC23CA003", "CA", true))
        .await
        .unwrap();

    accounts::assign_class(&pool, "PRC23CA003", "Class 4A").await.unwrap();
    accounts::assign_test(&pool, "PRC23CA003", TestSubject::Math)
        .await
        .unwrap();

    let loaded = accounts::fetch_account(&pool, "PRC23CA003").await.unwrap().unwrap();
    assert_eq!(loaded.class_name.as_deref(), Some("Class 4A"));
    assert_eq!(loaded.test_assigned, Some(TestSubject::Math));

    // Removing from class clears the assigned test with it
    accounts::clear_class(&pool, "PRC23CA003").await.unwrap();
    let loaded = accounts::fetch_account(&pool, "PRC23CA003").await.unwrap().unwrap();
    assert_eq!(loaded.class_name, None);
    assert_eq!(loaded.test_assigned, None);
}

#[tokio::test]
async fn test_manual_tasks_append() {
    let (_dir, pool) = setup_test_db().await;

    accounts::insert_account(&pool, &student_account("PRC23CA004", "CA", true))
        .await
        .unwrap();
    accounts::add_manual_task(&pool, "PRC23CA004", "Read aloud daily")
        .await
        .unwrap();
    accounts::add_manual_task(&pool, "PRC23CA004", "Count to 100")
        .await
        .unwrap();

    let loaded = accounts::fetch_account(&pool, "PRC23CA004").await.unwrap().unwrap();
    assert_eq!(
        loaded.manual_tasks,
        vec!["Read aloud daily".to_string(), "Count to 100".to_string()]
    );
}

#[tokio::test]
async fn test_evaluation_overwritten_on_retake() {
    let (_dir, pool) = setup_test_db().await;

    let first = Evaluation {
        account_id: "PRC23CA005".to_string(),
        overall: 55,
        scores: vec![
            SkillScore { skill: "Fluency".to_string(), score: 50 },
            SkillScore { skill: "Accuracy".to_string(), score: 60 },
        ],
        weaknesses: vec!["Fluency".to_string()],
        recommended_tasks: vec!["Practice reading longer passages".to_string()],
        language: "english".to_string(),
        recorded_at: Utc::now(),
    };
    upsert_evaluation(&pool, &first).await.unwrap();

    let retake = Evaluation {
        overall: 78,
        weaknesses: vec![],
        recommended_tasks: vec![],
        ..first.clone()
    };
    upsert_evaluation(&pool, &retake).await.unwrap();

    let loaded = fetch_evaluation(&pool, "PRC23CA005")
        .await
        .unwrap()
        .expect("Evaluation should exist");
    assert_eq!(loaded.overall, 78);
    assert!(loaded.weaknesses.is_empty());
    assert_eq!(loaded.scores, first.scores);
}

#[tokio::test]
async fn test_reward_config_defaults_and_update() {
    let (_dir, pool) = setup_test_db().await;

    // Absent key yields the compiled default
    let config = load_reward_config(&pool).await.unwrap();
    assert_eq!(config.rage_threshold, 500);
    assert_eq!(config.reward_description, "5 Bonus Marks");

    let updated = RewardConfig {
        rage_threshold: 300,
        reward_type: "break_time".to_string(),
        reward_value: "10".to_string(),
        reward_description: "10 minute break".to_string(),
    };
    store_reward_config(&pool, &updated).await.unwrap();

    let loaded = load_reward_config(&pool).await.unwrap();
    assert_eq!(loaded, updated);
}

#[tokio::test]
async fn test_soft_removal_keeps_account() {
    let (_dir, pool) = setup_test_db().await;

    accounts::insert_account(&pool, &student_account("PRC23CA006", "CA", true))
        .await
        .unwrap();
    accounts::set_approved(&pool, "PRC23CA006", false).await.unwrap();

    let loaded = accounts::fetch_account(&pool, "PRC23CA006").await.unwrap();
    assert!(loaded.is_some(), "Un-approval must not delete the account");
    assert!(!loaded.unwrap().is_approved);

    // Hard delete is a separate, explicit operation
    accounts::delete_account(&pool, "PRC23CA006").await.unwrap();
    let loaded = accounts::fetch_account(&pool, "PRC23CA006").await.unwrap();
    assert!(loaded.is_none());
}

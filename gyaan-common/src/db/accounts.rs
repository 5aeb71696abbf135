//! Account repository
//!
//! Read-modify-write helpers over the accounts table. Two logically
//! concurrent writers last-write-wins; the roster refresh operation is the
//! only mitigation.

use crate::db::models::{Account, TestSubject};
use crate::identity::Role;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

type AccountRow = sqlx::sqlite::SqliteRow;

fn account_from_row(row: &AccountRow) -> Result<Account> {
    let role_text: String = row.get("role");
    let role = Role::parse(&role_text)
        .ok_or_else(|| Error::Internal(format!("unknown role in accounts table: {}", role_text)))?;

    let manual_tasks_json: String = row.get("manual_tasks");
    let manual_tasks: Vec<String> = serde_json::from_str(&manual_tasks_json).unwrap_or_default();

    let test_assigned: Option<String> = row.get("test_assigned");
    let registered_at: String = row.get("registered_at");

    Ok(Account {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role,
        section: row.get("section"),
        password_digest: row.get("password_digest"),
        is_approved: row.get::<i64, _>("is_approved") != 0,
        class_name: row.get("class_name"),
        test_assigned: test_assigned.as_deref().and_then(TestSubject::parse),
        manual_tasks,
        is_late: row.get::<i64, _>("is_late") != 0,
        xp: row.get("xp"),
        level: row.get("level"),
        has_completed_assessment: row.get::<i64, _>("has_completed_assessment") != 0,
        registered_at: registered_at
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now()),
    })
}

const SELECT_ACCOUNT: &str = r#"
    SELECT id, name, email, role, section, password_digest, is_approved,
           class_name, test_assigned, manual_tasks, is_late,
           xp, level, has_completed_assessment, registered_at
    FROM accounts
"#;

/// Insert a new account. Fails if the identifier is already registered.
pub async fn insert_account(pool: &SqlitePool, account: &Account) -> Result<()> {
    let manual_tasks = serde_json::to_string(&account.manual_tasks)
        .map_err(|e| Error::Internal(e.to_string()))?;

    sqlx::query(
        r#"
        INSERT INTO accounts
            (id, name, email, role, section, password_digest, is_approved,
             class_name, test_assigned, manual_tasks, is_late,
             xp, level, has_completed_assessment, registered_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&account.id)
    .bind(&account.name)
    .bind(&account.email)
    .bind(account.role.as_str())
    .bind(&account.section)
    .bind(&account.password_digest)
    .bind(account.is_approved as i64)
    .bind(&account.class_name)
    .bind(account.test_assigned.map(|t| t.as_str()))
    .bind(manual_tasks)
    .bind(account.is_late as i64)
    .bind(account.xp)
    .bind(account.level)
    .bind(account.has_completed_assessment as i64)
    .bind(account.registered_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch one account by identifier
pub async fn fetch_account(pool: &SqlitePool, id: &str) -> Result<Option<Account>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_ACCOUNT))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(account_from_row).transpose()
}

/// Whether an identifier is already registered
pub async fn account_exists(pool: &SqlitePool, id: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// All student accounts, section-agnostic (management view)
pub async fn list_students(pool: &SqlitePool) -> Result<Vec<Account>> {
    let rows = sqlx::query(&format!("{} WHERE role = 'student'", SELECT_ACCOUNT))
        .fetch_all(pool)
        .await?;
    rows.iter().map(account_from_row).collect()
}

/// Student accounts whose section exactly matches (roster view)
pub async fn list_students_in_section(pool: &SqlitePool, section: &str) -> Result<Vec<Account>> {
    let rows = sqlx::query(&format!(
        "{} WHERE role = 'student' AND section = ?",
        SELECT_ACCOUNT
    ))
    .bind(section)
    .fetch_all(pool)
    .await?;
    rows.iter().map(account_from_row).collect()
}

/// Flip the approval flag. Used both by approval and by the soft removal
/// operation (which un-approves rather than deleting).
pub async fn set_approved(pool: &SqlitePool, id: &str, approved: bool) -> Result<()> {
    sqlx::query("UPDATE accounts SET is_approved = ? WHERE id = ?")
        .bind(approved as i64)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Persist recomputed progression fields after an XP mutation
pub async fn update_progress(pool: &SqlitePool, id: &str, xp: i64, level: i64) -> Result<()> {
    sqlx::query("UPDATE accounts SET xp = ?, level = ? WHERE id = ?")
        .bind(xp)
        .bind(level)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Persist progression plus the assessment-completed flag
pub async fn mark_assessment_complete(
    pool: &SqlitePool,
    id: &str,
    xp: i64,
    level: i64,
) -> Result<()> {
    sqlx::query(
        "UPDATE accounts SET xp = ?, level = ?, has_completed_assessment = 1 WHERE id = ?",
    )
    .bind(xp)
    .bind(level)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Assign a student to a class (denormalized name, no catalog check)
pub async fn assign_class(pool: &SqlitePool, id: &str, class_name: &str) -> Result<()> {
    sqlx::query("UPDATE accounts SET class_name = ? WHERE id = ?")
        .bind(class_name)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Remove a student from their class; an assigned test goes with it
pub async fn clear_class(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("UPDATE accounts SET class_name = NULL, test_assigned = NULL WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Assign a test subject to a student
pub async fn assign_test(pool: &SqlitePool, id: &str, subject: TestSubject) -> Result<()> {
    sqlx::query("UPDATE accounts SET test_assigned = ? WHERE id = ?")
        .bind(subject.as_str())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Append one manual task to a student's task list
pub async fn add_manual_task(pool: &SqlitePool, id: &str, task: &str) -> Result<()> {
    let account = fetch_account(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("account {}", id)))?;

    let mut tasks = account.manual_tasks;
    tasks.push(task.to_string());
    let json = serde_json::to_string(&tasks).map_err(|e| Error::Internal(e.to_string()))?;

    sqlx::query("UPDATE accounts SET manual_tasks = ? WHERE id = ?")
        .bind(json)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Toggle the late flag; returns the new value
pub async fn toggle_late(pool: &SqlitePool, id: &str) -> Result<bool> {
    let account = fetch_account(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("account {}", id)))?;

    let new_value = !account.is_late;
    sqlx::query("UPDATE accounts SET is_late = ? WHERE id = ?")
        .bind(new_value as i64)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(new_value)
}

/// Hard-delete an account and its evaluation. Only the explicit teacher
/// removal path on the management page reaches this; roster removal
/// merely un-approves.
pub async fn delete_account(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM evaluations WHERE account_id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM accounts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

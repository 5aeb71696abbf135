//! Database initialization
//!
//! Creates the SQLite file and default schema on first run, and adds any
//! columns introduced after a database was created. Adding a field must
//! tolerate its absence in previously stored records, so column addition
//! is idempotent and every added column carries a default.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema creation (idempotent - safe to call multiple times)
    create_accounts_table(&pool).await?;
    create_evaluations_table(&pool).await?;
    create_classes_table(&pool).await?;
    create_content_table(&pool).await?;
    create_assignments_table(&pool).await?;
    create_rewards_table(&pool).await?;
    create_settings_table(&pool).await?;

    // Columns added after initial release; old databases gain them with
    // defaults on next startup
    sync_account_columns(&pool).await?;

    Ok(pool)
}

async fn create_accounts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL DEFAULT '',
            role TEXT NOT NULL,
            section TEXT NOT NULL DEFAULT '',
            password_digest TEXT NOT NULL,
            is_approved INTEGER NOT NULL DEFAULT 0,
            xp INTEGER NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 0,
            has_completed_assessment INTEGER NOT NULL DEFAULT 0,
            registered_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_evaluations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS evaluations (
            account_id TEXT PRIMARY KEY NOT NULL,
            overall INTEGER NOT NULL,
            scores TEXT NOT NULL DEFAULT '[]',
            weaknesses TEXT NOT NULL DEFAULT '[]',
            recommended_tasks TEXT NOT NULL DEFAULT '[]',
            language TEXT NOT NULL DEFAULT 'english',
            recorded_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_classes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS classes (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            subject TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_content_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS content (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            kind TEXT NOT NULL DEFAULT '',
            subject TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_assignments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assignments (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            subject TEXT NOT NULL DEFAULT '',
            due_date TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_rewards_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rewards (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Add account columns introduced after initial release.
///
/// SQLite has no ADD COLUMN IF NOT EXISTS, so existing columns are probed
/// via PRAGMA table_info first.
async fn sync_account_columns(pool: &SqlitePool) -> Result<()> {
    let existing: Vec<(i64, String, String, i64, Option<String>, i64)> =
        sqlx::query_as("PRAGMA table_info(accounts)")
            .fetch_all(pool)
            .await?;
    let names: Vec<&str> = existing.iter().map(|c| c.1.as_str()).collect();

    let added = [
        ("class_name", "ALTER TABLE accounts ADD COLUMN class_name TEXT"),
        ("test_assigned", "ALTER TABLE accounts ADD COLUMN test_assigned TEXT"),
        (
            "manual_tasks",
            "ALTER TABLE accounts ADD COLUMN manual_tasks TEXT NOT NULL DEFAULT '[]'",
        ),
        (
            "is_late",
            "ALTER TABLE accounts ADD COLUMN is_late INTEGER NOT NULL DEFAULT 0",
        ),
    ];

    for (name, ddl) in added {
        if !names.contains(&name) {
            info!("Adding accounts column: {}", name);
            sqlx::query(ddl).execute(pool).await?;
        }
    }

    Ok(())
}

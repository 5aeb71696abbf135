//! Teacher catalog repositories: classes, content, assignments, rewards
//!
//! Independent flat lists with no referential integrity against accounts
//! beyond the denormalized class_name string.

use crate::db::models::{Assignment, ClassRecord, ContentItem, RewardEntry};
use crate::Result;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

fn parse_timestamp(raw: String) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>().unwrap_or_else(|_| Utc::now())
}

// ---- classes ----

pub async fn list_classes(pool: &SqlitePool) -> Result<Vec<ClassRecord>> {
    let rows = sqlx::query("SELECT id, name, subject, created_at FROM classes ORDER BY created_at")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| ClassRecord {
            id: row.get("id"),
            name: row.get("name"),
            subject: row.get("subject"),
            created_at: parse_timestamp(row.get("created_at")),
        })
        .collect())
}

pub async fn insert_class(pool: &SqlitePool, class: &ClassRecord) -> Result<()> {
    sqlx::query("INSERT INTO classes (id, name, subject, created_at) VALUES (?, ?, ?, ?)")
        .bind(&class.id)
        .bind(&class.name)
        .bind(&class.subject)
        .bind(class.created_at.to_rfc3339())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_class(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM classes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// ---- content ----

pub async fn list_content(pool: &SqlitePool) -> Result<Vec<ContentItem>> {
    let rows = sqlx::query(
        "SELECT id, title, kind, subject, status, created_at FROM content ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ContentItem {
            id: row.get("id"),
            title: row.get("title"),
            kind: row.get("kind"),
            subject: row.get("subject"),
            status: row.get("status"),
            created_at: parse_timestamp(row.get("created_at")),
        })
        .collect())
}

pub async fn insert_content(pool: &SqlitePool, item: &ContentItem) -> Result<()> {
    sqlx::query(
        "INSERT INTO content (id, title, kind, subject, status, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&item.id)
    .bind(&item.title)
    .bind(&item.kind)
    .bind(&item.subject)
    .bind(&item.status)
    .bind(item.created_at.to_rfc3339())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_content(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM content WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// ---- assignments ----

pub async fn list_assignments(pool: &SqlitePool) -> Result<Vec<Assignment>> {
    let rows = sqlx::query(
        "SELECT id, title, subject, due_date, created_at FROM assignments ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Assignment {
            id: row.get("id"),
            title: row.get("title"),
            subject: row.get("subject"),
            due_date: row.get("due_date"),
            created_at: parse_timestamp(row.get("created_at")),
        })
        .collect())
}

pub async fn insert_assignment(pool: &SqlitePool, assignment: &Assignment) -> Result<()> {
    sqlx::query(
        "INSERT INTO assignments (id, title, subject, due_date, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&assignment.id)
    .bind(&assignment.title)
    .bind(&assignment.subject)
    .bind(&assignment.due_date)
    .bind(assignment.created_at.to_rfc3339())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_assignment(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM assignments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// ---- rewards ----

pub async fn list_rewards(pool: &SqlitePool) -> Result<Vec<RewardEntry>> {
    let rows = sqlx::query("SELECT id, name, description, created_at FROM rewards ORDER BY created_at")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| RewardEntry {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            created_at: parse_timestamp(row.get("created_at")),
        })
        .collect())
}

pub async fn insert_reward(pool: &SqlitePool, reward: &RewardEntry) -> Result<()> {
    sqlx::query("INSERT INTO rewards (id, name, description, created_at) VALUES (?, ?, ?, ?)")
        .bind(&reward.id)
        .bind(&reward.name)
        .bind(&reward.description)
        .bind(reward.created_at.to_rfc3339())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_reward(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM rewards WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

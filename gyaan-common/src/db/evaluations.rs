//! Evaluation repository
//!
//! One current evaluation per account; a retake overwrites the stored
//! record in place.

use crate::db::models::{Evaluation, SkillScore};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

/// Store or replace the current evaluation for an account
pub async fn upsert_evaluation(pool: &SqlitePool, eval: &Evaluation) -> Result<()> {
    let scores = serde_json::to_string(&eval.scores).map_err(|e| Error::Internal(e.to_string()))?;
    let weaknesses =
        serde_json::to_string(&eval.weaknesses).map_err(|e| Error::Internal(e.to_string()))?;
    let tasks = serde_json::to_string(&eval.recommended_tasks)
        .map_err(|e| Error::Internal(e.to_string()))?;

    sqlx::query(
        r#"
        INSERT INTO evaluations
            (account_id, overall, scores, weaknesses, recommended_tasks, language, recorded_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(account_id) DO UPDATE SET
            overall = excluded.overall,
            scores = excluded.scores,
            weaknesses = excluded.weaknesses,
            recommended_tasks = excluded.recommended_tasks,
            language = excluded.language,
            recorded_at = excluded.recorded_at
        "#,
    )
    .bind(&eval.account_id)
    .bind(eval.overall)
    .bind(scores)
    .bind(weaknesses)
    .bind(tasks)
    .bind(&eval.language)
    .bind(eval.recorded_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch the current evaluation for an account, if any
pub async fn fetch_evaluation(pool: &SqlitePool, account_id: &str) -> Result<Option<Evaluation>> {
    let row = sqlx::query(
        r#"
        SELECT account_id, overall, scores, weaknesses, recommended_tasks, language, recorded_at
        FROM evaluations WHERE account_id = ?
        "#,
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let scores_json: String = row.get("scores");
    let weaknesses_json: String = row.get("weaknesses");
    let tasks_json: String = row.get("recommended_tasks");
    let recorded_at: String = row.get("recorded_at");

    let scores: Vec<SkillScore> = serde_json::from_str(&scores_json).unwrap_or_default();

    Ok(Some(Evaluation {
        account_id: row.get("account_id"),
        overall: row.get("overall"),
        scores,
        weaknesses: serde_json::from_str(&weaknesses_json).unwrap_or_default(),
        recommended_tasks: serde_json::from_str(&tasks_json).unwrap_or_default(),
        language: row.get("language"),
        recorded_at: recorded_at
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now()),
    }))
}

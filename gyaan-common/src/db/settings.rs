//! Key/value settings, including the process-wide reward configuration

use crate::db::models::RewardConfig;
use crate::{Error, Result};
use sqlx::SqlitePool;

const REWARD_CONFIG_KEY: &str = "reward_config";

/// Read one setting value
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<(Option<String>,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;
    Ok(value.and_then(|v| v.0))
}

/// Write one setting value (insert or replace)
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

/// Load the reward configuration, falling back to defaults when absent or
/// unreadable (records written before the key existed keep working)
pub async fn load_reward_config(pool: &SqlitePool) -> Result<RewardConfig> {
    match get_setting(pool, REWARD_CONFIG_KEY).await? {
        Some(json) => Ok(serde_json::from_str(&json).unwrap_or_default()),
        None => Ok(RewardConfig::default()),
    }
}

/// Persist the teacher-edited reward configuration
pub async fn store_reward_config(pool: &SqlitePool, config: &RewardConfig) -> Result<()> {
    let json = serde_json::to_string(config).map_err(|e| Error::Internal(e.to_string()))?;
    set_setting(pool, REWARD_CONFIG_KEY, &json).await
}

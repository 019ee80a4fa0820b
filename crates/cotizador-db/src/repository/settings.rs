//! # Settings Repository
//!
//! String values in the `app_meta` table.
//!
//! ```text
//! app_meta
//! ┌──────────┬───────┬───────────────────────────┐
//! │ key (PK) │ value │ updated_at                │
//! ├──────────┼───────┼───────────────────────────┤
//! │ counter  │ 7     │ 2026-10-16T14:02:11+00:00 │
//! └──────────┴───────┴───────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::store::KeyValueStore;

/// Repository for `app_meta` rows.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Reads a value by key.
    pub async fn get_value(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM app_meta WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Inserts or replaces a value.
    pub async fn set_value(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, value = %value, "Writing setting");

        sqlx::query(
            r#"
            INSERT INTO app_meta (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SettingsRepository {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        self.get_value(key).await
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        self.set_value(key, value).await
    }
}

//! # Preference Repository
//!
//! String values by key, upserted with a timestamp. JSON helpers sit on top
//! for structured values.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for the `preferences` key/value table.
#[derive(Debug, Clone)]
pub struct PreferenceRepository {
    pool: SqlitePool,
}

impl PreferenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PreferenceRepository { pool }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Reads a value. Missing keys are `None`.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM preferences WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Inserts or replaces a value.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, "Writing preference");

        sqlx::query(
            r#"
            INSERT INTO preferences (key, value, updated_at)
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

    /// Deletes a value. Returns whether it existed.
    pub async fn remove(&self, key: &str) -> DbResult<bool> {
        debug!(key = %key, "Removing preference");

        let result = sqlx::query("DELETE FROM preferences WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Reads and decodes a JSON value.
    ///
    /// A value that no longer decodes is a [`DbError::Serialization`].
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| DbError::serialization(key, e)),
            None => Ok(None),
        }
    }

    /// Encodes a value as JSON and stores it.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| DbError::serialization(key, e))?;
        self.set(key, &raw).await
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM preferences ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        count: u32,
        label: String,
    }

    async fn repo() -> super::PreferenceRepository {
        Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .preferences()
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let prefs = repo().await;
        assert_eq!(prefs.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_upserts() {
        let prefs = repo().await;
        prefs.set("ui.theme", "dark").await.unwrap();
        prefs.set("ui.theme", "light").await.unwrap();

        assert_eq!(prefs.get("ui.theme").await.unwrap().as_deref(), Some("light"));
        assert_eq!(prefs.keys().await.unwrap(), vec!["ui.theme".to_string()]);
    }

    #[tokio::test]
    async fn test_remove() {
        let prefs = repo().await;
        prefs.set("a", "1").await.unwrap();

        assert!(prefs.remove("a").await.unwrap());
        assert!(!prefs.remove("a").await.unwrap());
        assert_eq!(prefs.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_json_values() {
        let prefs = repo().await;
        let sample = Sample {
            count: 3,
            label: "x".to_string(),
        };
        prefs.set_json("sample", &sample).await.unwrap();

        let loaded: Option<Sample> = prefs.get_json("sample").await.unwrap();
        assert_eq!(loaded, Some(sample));

        prefs.set("sample", "{not json").await.unwrap();
        let err = prefs.get_json::<Sample>("sample").await.unwrap_err();
        assert!(matches!(err, crate::DbError::Serialization { .. }));
    }

    #[tokio::test]
    async fn test_keys_sorted() {
        let prefs = repo().await;
        for key in ["b", "c", "a"] {
            prefs.set(key, "v").await.unwrap();
        }
        assert_eq!(prefs.keys().await.unwrap(), vec!["a", "b", "c"]);
    }
}

//! SQLite implementation of `PersistenceAdapter`.
//!
//! Values are stored as JSON text in the `kv_store` table and parsed on read.

use chrono::Utc;
use sqlx::Row;

use vyzier_core::storage::persistence::PersistenceAdapter;
use vyzier_types::error::PersistenceError;

use super::pool::DatabasePool;

/// SQLite-backed key-value persistence.
#[derive(Clone)]
pub struct SqlitePersistence {
    pool: DatabasePool,
}

impl SqlitePersistence {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Last write time of `key`, as stored (RFC 3339).
    pub async fn updated_at(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let row = sqlx::query("SELECT updated_at FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| PersistenceError::Query(e.to_string()))?;

        row.map(|row| row.try_get::<String, _>("updated_at"))
            .transpose()
            .map_err(|e| PersistenceError::Query(e.to_string()))
    }
}

impl PersistenceAdapter for SqlitePersistence {
    async fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), PersistenceError> {
        let now = Utc::now().to_rfc3339();
        let value_str = serde_json::to_string(value)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO kv_store (key, value, updated_at)
               VALUES (?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(&value_str)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| PersistenceError::Query(e.to_string()))?;

        tracing::trace!(key, bytes = value_str.len(), "Saved record");
        Ok(())
    }

    async fn load_raw(&self, key: &str) -> Result<Option<serde_json::Value>, PersistenceError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| PersistenceError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value_str: String = row
            .try_get("value")
            .map_err(|e| PersistenceError::Query(e.to_string()))?;
        let value = serde_json::from_str(&value_str)
            .map_err(|e| PersistenceError::Serialization(format!("invalid JSON value: {e}")))?;
        Ok(Some(value))
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| PersistenceError::Query(e.to_string()))?;

        Ok(())
    }
}

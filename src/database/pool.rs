//! PostgreSQL-backed key-value store using sqlx
//!
//! Keys and values live in a single `kv.entries` table so the store keeps
//! the get/set/list-keys shape the repository expects.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;
use tracing::{debug, info};

use crate::database::store::KeyValueStore;
use crate::error::StoreError;

pub struct PgKvStore {
    pool: PgPool,
}

impl PgKvStore {
    pub async fn connect(
        connection_string: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(connection_string)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to connect to PostgreSQL: {}", e)))?;

        info!("Connected to PostgreSQL");

        Ok(Self { pool })
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        info!("Initializing key-value schema...");

        sqlx::query("CREATE SCHEMA IF NOT EXISTS kv")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to create kv schema: {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv.entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to create entries table: {}", e)))?;

        info!("Key-value schema initialized");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for PgKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM kv.entries WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to get key: {}", e)))?;

        Ok(row.map(|row| row.get("value")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO kv.entries (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to set key: {}", e)))?;

        debug!(key = %key, "Key written");
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query("SELECT key FROM kv.entries")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to list keys: {}", e)))?;

        Ok(rows.into_iter().map(|row| row.get("key")).collect())
    }
}

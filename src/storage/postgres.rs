//! Durable key-value backend over a Postgres pool.

use async_trait::async_trait;
use sqlx::PgPool;

use super::KeyValueStore;
use crate::common::error::StoreError;

/// Postgres-backed [`KeyValueStore`].
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Creates the slot table if it does not exist yet.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS _token_wallet_slots (
                slot_key TEXT PRIMARY KEY,
                slot_value TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for PostgresStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT slot_value FROM _token_wallet_slots WHERE slot_key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO _token_wallet_slots (slot_key, slot_value)
             VALUES ($1, $2)
             ON CONFLICT (slot_key) DO UPDATE SET slot_value = EXCLUDED.slot_value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

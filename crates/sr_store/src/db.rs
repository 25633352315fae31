//! Database abstraction over SQLite via sqlx.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};

use crate::error::StoreError;
use crate::models::KeyRecordRow;

const UPSERT_RECORD: &str = "INSERT INTO key_store (name, value, created_at, updated_at) \
     VALUES (?, ?, datetime('now'), datetime('now')) \
     ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// Handle to the durable key store.  Cheap to clone (Arc internally).
#[derive(Clone)]
pub struct KeyStore {
    pool: SqlitePool,
}

impl KeyStore {
    /// Open (or create) the SQLite database at `db_path`.
    /// Runs all pending migrations automatically, so the schema upgrades
    /// on first use.
    ///
    /// WAL journal mode and foreign-key enforcement are connection
    /// options, not migration statements: SQLite refuses to change
    /// `journal_mode` inside a transaction, and sqlx wraps every
    /// migration in one.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(opts).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Insert or replace one record.
    pub async fn put(&self, name: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(UPSERT_RECORD)
            .bind(name)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert or replace several records in one transaction.  Either every
    /// record lands or none do.
    pub async fn put_many(&self, records: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for (name, value) in records {
            sqlx::query(UPSERT_RECORD)
                .bind(name)
                .bind(value)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Fetch one record's value.  An absent record is `None`, not an error.
    pub async fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM key_store WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    /// Delete every record.  Idempotent: clearing an empty store succeeds.
    pub async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM key_store")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Full dump for diagnostics and tests.
    pub async fn records(&self) -> Result<Vec<KeyRecordRow>, StoreError> {
        let rows = sqlx::query_as::<_, KeyRecordRow>(
            "SELECT name, value, created_at, updated_at FROM key_store ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

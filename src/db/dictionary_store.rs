use std::collections::HashMap;
use std::future::Future;

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::warn;

use crate::models::ProcessedRecord;
use crate::processor::{PersistenceError, ResultSink};

/// SQLite-backed store of processed words, keyed by the lowercase word.
///
/// Records are stored as JSON so the schema never needs to chase the
/// enrichment payload.
#[derive(Clone)]
pub struct DictionaryStore {
    pool: SqlitePool,
}

impl DictionaryStore {
    pub async fn init(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS processed_words (
                word TEXT PRIMARY KEY,
                record TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Current contents of the store, used to seed a run's pending queue.
    pub async fn snapshot(&self) -> Result<HashMap<String, ProcessedRecord>, PersistenceError> {
        let rows = sqlx::query("SELECT word, record FROM processed_words")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PersistenceError::Read(e.to_string()))?;

        let mut processed = HashMap::with_capacity(rows.len());
        for row in rows {
            let word: String = row.get("word");
            let payload: String = row.get("record");
            match serde_json::from_str::<ProcessedRecord>(&payload) {
                Ok(record) => {
                    processed.insert(word, record);
                }
                Err(e) => {
                    warn!(word = %word, error = %e, "skipping unreadable stored record");
                }
            }
        }

        Ok(processed)
    }

    pub async fn get(&self, word: &str) -> Result<Option<ProcessedRecord>, PersistenceError> {
        let key = word.trim().to_lowercase();
        let row = sqlx::query("SELECT record FROM processed_words WHERE word = ?1")
            .bind(&key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PersistenceError::Read(e.to_string()))?;

        match row {
            Some(row) => {
                let payload: String = row.get("record");
                let record = serde_json::from_str(&payload)
                    .map_err(|e| PersistenceError::Read(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    pub async fn count(&self) -> Result<i64, PersistenceError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM processed_words")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PersistenceError::Read(e.to_string()))
    }
}

impl ResultSink for DictionaryStore {
    fn store(
        &self,
        word: &str,
        record: &ProcessedRecord,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send {
        let key = word.trim().to_lowercase();
        let payload = serde_json::to_string(record);

        async move {
            let payload = payload.map_err(|e| PersistenceError::Write(e.to_string()))?;
            sqlx::query(
                r#"
                INSERT INTO processed_words (word, record, created_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(word) DO UPDATE SET record = excluded.record
                "#,
            )
            .bind(&key)
            .bind(&payload)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| PersistenceError::Write(e.to_string()))?;
            Ok(())
        }
    }
}

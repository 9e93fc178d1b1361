//! SQLite key-value store (embedded, no external dependencies)

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use travelog_core::{KeyEntry, KvStore, ListOptions, ListPage, TravelogError};

pub struct SqliteStore {
    pool: SqlitePool,
}

fn store_error(e: sqlx::Error) -> TravelogError {
    TravelogError::Store(e.to_string())
}

impl SqliteStore {
    pub async fn open(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::init(pool).await
    }

    /// Private in-memory database, kept on a single connection
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        use std::str::FromStr;
        use std::time::Duration;

        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory SQLite options")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("Failed to create kv table")?;

        tracing::info!("Key-value table ready");

        Ok(Self { pool })
    }
}

#[async_trait]
impl KvStore for SqliteStore {
    async fn get(&self, key: &str) -> travelog_core::Result<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>,)> = sqlx::query_as(
            r#"
            SELECT value FROM kv WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(|(value,)| value))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> travelog_core::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?1, ?2, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> travelog_core::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM kv WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn list(&self, options: ListOptions) -> travelog_core::Result<ListPage> {
        let prefix = options.prefix.unwrap_or_default();
        let cursor = options.cursor.unwrap_or_default();
        // Fetch one extra row to learn whether another page follows
        let fetch = i64::try_from(options.limit)
            .unwrap_or(i64::MAX - 1)
            .saturating_add(1);

        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT key FROM kv
            WHERE substr(key, 1, length(?1)) = ?1 AND key > ?2
            ORDER BY key ASC
            LIMIT ?3
            "#,
        )
        .bind(&prefix)
        .bind(&cursor)
        .bind(fetch)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        let mut names: Vec<String> = rows.into_iter().map(|(key,)| key).collect();
        let more = names.len() > options.limit;
        names.truncate(options.limit);
        let next = if more { names.last().cloned() } else { None };

        Ok(ListPage {
            keys: names.into_iter().map(|name| KeyEntry { name }).collect(),
            cursor: next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = SqliteStore::in_memory().await.unwrap();

        store.put("record_1_a", b"first".to_vec()).await.unwrap();
        store.put("record_1_a", b"second".to_vec()).await.unwrap();
        assert_eq!(
            store.get("record_1_a").await.unwrap(),
            Some(b"second".to_vec())
        );

        store.delete("record_1_a").await.unwrap();
        assert_eq!(store.get("record_1_a").await.unwrap(), None);

        // Deleting an absent key succeeds
        store.delete("record_1_a").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let store = SqliteStore::in_memory().await.unwrap();
        for key in ["record_3", "record_1", "profile", "record_2", "record_%"] {
            store.put(key, b"{}".to_vec()).await.unwrap();
        }

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = store
                .list(ListOptions::with_prefix("record_").limit(2).cursor(cursor))
                .await
                .unwrap();
            seen.extend(page.keys.into_iter().map(|k| k.name));
            match page.cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        assert_eq!(seen, ["record_%", "record_1", "record_2", "record_3"]);
    }

    #[tokio::test]
    async fn test_open_persists_to_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("travelog.db");
        let path = path.to_string_lossy().to_string();

        {
            let store = SqliteStore::open(&path).await.unwrap();
            store.put("record_9_z", b"kept".to_vec()).await.unwrap();
            store.pool.close().await;
        }

        let reopened = SqliteStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("record_9_z").await.unwrap(),
            Some(b"kept".to_vec())
        );
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tokio::sync::RwLock;
use tracing::debug;

/// Fixed keys of the local key-value store.
pub mod keys {
    pub const PROFILE: &str = "profile";
    pub const PROFILE_DRAFT: &str = "profile_draft";
    pub const FOOD_LOG: &str = "food_log";
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[from] sqlx::Error),
    #[error("storage migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("stored value is not valid json: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read a JSON document stored under `key`.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize `value` as JSON and store it under `key`.
pub async fn save_json<T: Serialize + Sync + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw).await
}

/// SQLite-backed store: one `kv` table, no indexing beyond the primary key.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(database_url)
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO kv (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        debug!(key, "kv set");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        debug!(key, "kv remove");
        Ok(())
    }
}

/// In-process store used for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Doc {
        name: String,
        amount: f64,
    }

    async fn sqlite_store() -> SqliteStore {
        // single connection so every query sees the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        SqliteStore::from_pool(pool).await.expect("migrations run")
    }

    #[tokio::test]
    async fn sqlite_set_get_overwrite_remove() {
        let store = sqlite_store().await;
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "one".into()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("one"));

        store.set("k", "two".into()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_missing_key_is_not_an_error() {
        let store = sqlite_store().await;
        store.remove("nothing-here").await.unwrap();
        MemoryStore::new().remove("nothing-here").await.unwrap();
    }

    #[tokio::test]
    async fn json_helpers_roundtrip_through_memory_store() {
        let store = MemoryStore::new();
        let doc = Doc {
            name: "Protein".into(),
            amount: 12.5,
        };
        save_json(&store, keys::PROFILE, &doc).await.unwrap();
        let loaded: Option<Doc> = load_json(&store, keys::PROFILE).await.unwrap();
        assert_eq!(loaded, Some(doc));

        let missing: Option<Doc> = load_json(&store, keys::PROFILE_DRAFT).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn load_json_reports_corrupt_values() {
        let store = MemoryStore::new();
        store.set(keys::PROFILE, "{not json".into()).await.unwrap();
        let err = load_json::<Doc>(&store, keys::PROFILE).await.unwrap_err();
        assert!(matches!(err, StoreError::Serde(_)));
    }
}

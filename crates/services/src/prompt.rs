use std::{
    collections::HashMap,
    time::{SystemTime, UNIX_EPOCH},
};

use {async_trait::async_trait, sqlx::SqlitePool, thiserror::Error, tokio::sync::RwLock};

/// Failure reported by a prompt store backend. The HTTP layer maps any
/// variant to a generic 500 without leaking the detail.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("prompt store backend error: {0}")]
    Backend(#[from] sqlx::Error),
    #[error("prompt store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed store for per-user prompt overrides. Absent means "no override,
/// use the default prompt". Last write wins; the backend is the sole
/// arbiter of durability and ordering.
#[async_trait]
pub trait PromptStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, user_id: &str, prompt: &str) -> Result<(), StoreError>;
    /// Remove the override. Deleting an absent override succeeds.
    async fn delete(&self, user_id: &str) -> Result<(), StoreError>;
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

// ── SQLite-backed store ──────────────────────────────────────────────────────

/// Production store over the shared database pool.
pub struct SqlitePromptStore {
    pool: SqlitePool,
}

impl SqlitePromptStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `prompt_overrides` table if it doesn't exist. Runs once
    /// during startup, after the database connection is established.
    pub async fn init(pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS prompt_overrides (
                user_id    TEXT PRIMARY KEY,
                prompt     TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )"#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PromptStore for SqlitePromptStore {
    async fn get(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let prompt =
            sqlx::query_scalar::<_, String>("SELECT prompt FROM prompt_overrides WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(prompt)
    }

    async fn set(&self, user_id: &str, prompt: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO prompt_overrides (user_id, prompt, updated_at)
               VALUES (?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET
                 prompt = excluded.prompt,
                 updated_at = excluded.updated_at"#,
        )
        .bind(user_id)
        .bind(prompt)
        .bind(now_ms())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM prompt_overrides WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// ── In-memory store ──────────────────────────────────────────────────────────

/// Map-backed store for tests and local development.
#[derive(Default)]
pub struct MemoryPromptStore {
    entries: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl PromptStore for MemoryPromptStore {
    async fn get(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(user_id).cloned())
    }

    async fn set(&self, user_id: &str, prompt: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(user_id.to_string(), prompt.to_string());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(user_id);
        Ok(())
    }
}

use anyhow::Context;
use sqlx::SqlitePool;
use tracing::info;

/// Process-wide database connection. Established exactly once at startup
/// (a failure here is fatal) and closed exactly once at shutdown.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect the pool. The execution manager and the route groups must
    /// not be constructed before this returns.
    pub async fn initialize(url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("failed to connect database at {url}"))?;
        info!("database connection initialized");
        Ok(Self { pool })
    }

    /// Close the pool. Safe to call once per process lifetime; in-flight
    /// acquires drain before the connections drop.
    pub async fn disconnect(&self) {
        self.pool.close().await;
        info!("database connection closed");
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

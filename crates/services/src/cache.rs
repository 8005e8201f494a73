use async_trait::async_trait;
use tracing::debug;

/// Best-effort cache connection. Initialization and close failures are
/// logged and swallowed by the lifecycle; the gateway must stay operable
/// without caching, so call sites always receive an `Option` of this
/// handle rather than a possibly-broken live one.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn initialize(&self) -> anyhow::Result<()>;
    async fn close(&self) -> anyhow::Result<()>;
}

/// Cache seam with no backend. Used when no cache endpoint is configured
/// and as the stand-in until a real backend is plugged in.
pub struct NoopCache;

#[async_trait]
impl Cache for NoopCache {
    async fn initialize(&self) -> anyhow::Result<()> {
        debug!("noop cache initialized");
        Ok(())
    }

    async fn close(&self) -> anyhow::Result<()> {
        debug!("noop cache closed");
        Ok(())
    }
}

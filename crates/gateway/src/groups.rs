use std::sync::Arc;

use {async_trait::async_trait, axum::Router, tracing::debug};

use portico_services::{Database, ExecutionManager};

/// Shared resources handed to each route group when it initializes.
pub struct GroupContext {
    pub execution: Arc<ExecutionManager>,
    pub db: Arc<Database>,
    pub instance_id: String,
}

/// An externally-owned collection of HTTP handlers mounted under the API
/// prefix. The shell initializes it with the shared resources, merges its
/// router, and calls `cleanup` at shutdown; everything inside is opaque.
#[async_trait]
pub trait RouteGroup: Send + Sync {
    fn name(&self) -> &'static str;

    /// Called during startup, after the database and execution manager
    /// exist. A failure here aborts startup.
    async fn initialize(&self, ctx: &GroupContext) -> anyhow::Result<()>;

    /// The group's routes, fully self-contained (own state applied).
    fn router(&self) -> Router;

    /// Called first during shutdown.
    async fn cleanup(&self) {}
}

/// The three subsystems the gateway fronts.
pub struct RouteGroups {
    pub agent: Arc<dyn RouteGroup>,
    pub sandbox: Arc<dyn RouteGroup>,
    pub billing: Arc<dyn RouteGroup>,
}

impl RouteGroups {
    /// Groups with no routes and no-op hooks. The real subsystems plug in
    /// by providing their own [`RouteGroup`] implementations.
    pub fn noop() -> Self {
        Self {
            agent: Arc::new(NoopRouteGroup { name: "agent" }),
            sandbox: Arc::new(NoopRouteGroup { name: "sandbox" }),
            billing: Arc::new(NoopRouteGroup { name: "billing" }),
        }
    }
}

struct NoopRouteGroup {
    name: &'static str,
}

#[async_trait]
impl RouteGroup for NoopRouteGroup {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(&self, ctx: &GroupContext) -> anyhow::Result<()> {
        debug!(group = self.name, instance_id = %ctx.instance_id, "noop route group initialized");
        Ok(())
    }

    fn router(&self) -> Router {
        Router::new()
    }

    async fn cleanup(&self) {
        debug!(group = self.name, "noop route group cleaned up");
    }
}

use std::sync::Arc;

use tokio::sync::Mutex;

use portico_config::GatewayConfig;
use portico_services::{Cache, Database, ExecutionManager, PromptStore};

use crate::rate_limit::IpTracker;

/// Long-lived process resources. Created exactly once by
/// [`crate::lifecycle::startup`], shared by reference with every route
/// group and request handler, and never mutated afterwards — concurrent
/// reads are safe by construction.
pub struct GatewayResources {
    pub config: Arc<GatewayConfig>,
    /// Process instance identifier reported by the health endpoint.
    pub instance_id: String,
    pub db: Arc<Database>,
    /// Absent when no cache is configured or its initialization failed;
    /// the gateway runs degraded without it.
    pub cache: Option<Arc<dyn Cache>>,
    pub execution: Arc<ExecutionManager>,
    pub prompts: Arc<dyn PromptStore>,
}

/// Router state: the immutable resource bundle plus the one piece of
/// request-path mutable state the shell owns, the rate-limiter tracker.
#[derive(Clone)]
pub struct AppState {
    pub resources: Arc<GatewayResources>,
    pub limiter: Arc<Mutex<IpTracker>>,
}

impl AppState {
    pub fn new(resources: Arc<GatewayResources>) -> Self {
        let limits = &resources.config.rate_limit;
        let limiter = Arc::new(Mutex::new(IpTracker::new(
            limits.max_tracked_ips,
            limits.per_minute,
        )));
        Self { resources, limiter }
    }
}

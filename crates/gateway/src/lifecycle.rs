use std::sync::Arc;

use tracing::{error, info};

use portico_config::GatewayConfig;
use portico_services::{Cache, Database, ExecutionManager, PromptStore, SqlitePromptStore};

use crate::{
    groups::{GroupContext, RouteGroups},
    state::GatewayResources,
};

/// Bring up the process resources in dependency order. Any failure is
/// logged and propagated so the host never serves traffic against a
/// half-initialized process; only the cache step is best-effort.
pub async fn startup(
    config: Arc<GatewayConfig>,
    groups: &RouteGroups,
    cache: Option<Arc<dyn Cache>>,
) -> anyhow::Result<Arc<GatewayResources>> {
    info!(
        instance_id = %config.instance_id,
        mode = config.env_mode.as_str(),
        "starting gateway"
    );
    match initialize_resources(config, groups, cache).await {
        Ok(resources) => Ok(resources),
        Err(e) => {
            error!(error = %e, "error during gateway startup");
            Err(e)
        },
    }
}

async fn initialize_resources(
    config: Arc<GatewayConfig>,
    groups: &RouteGroups,
    cache: Option<Arc<dyn Cache>>,
) -> anyhow::Result<Arc<GatewayResources>> {
    // Database first; the execution manager and route groups depend on it.
    let db = Arc::new(Database::initialize(&config.database_url).await?);
    SqlitePromptStore::init(db.pool()).await?;

    let execution = Arc::new(ExecutionManager::new(Arc::clone(&db)));

    let ctx = GroupContext {
        execution: Arc::clone(&execution),
        db: Arc::clone(&db),
        instance_id: config.instance_id.clone(),
    };
    groups.agent.initialize(&ctx).await?;
    groups.sandbox.initialize(&ctx).await?;

    // Cache is best-effort: a failure leaves the gateway running without it.
    let cache = match cache {
        Some(cache) => match cache.initialize().await {
            Ok(()) => {
                info!("cache connection initialized");
                Some(cache)
            },
            Err(e) => {
                error!(error = %e, "failed to initialize cache connection, continuing without cache");
                None
            },
        },
        None => None,
    };

    let prompts: Arc<dyn PromptStore> = Arc::new(SqlitePromptStore::new(db.pool().clone()));

    Ok(Arc::new(GatewayResources {
        instance_id: config.instance_id.clone(),
        config,
        db,
        cache,
        execution,
        prompts,
    }))
}

/// Tear down in reverse-ish order: agent cleanup, cache close
/// (best-effort), database disconnect.
pub async fn shutdown(resources: &GatewayResources, groups: &RouteGroups) {
    info!("cleaning up agent resources");
    groups.agent.cleanup().await;

    if let Some(cache) = &resources.cache {
        info!("closing cache connection");
        match cache.close().await {
            Ok(()) => info!("cache connection closed"),
            Err(e) => error!(error = %e, "error closing cache connection"),
        }
    }

    info!("disconnecting from database");
    resources.db.disconnect().await;
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use {
    async_trait::async_trait,
    axum::{Router, http::StatusCode, routing::get},
};

use common::{FailingCache, TEST_INSTANCE, get as http_get, send, test_config};
use portico_gateway::{
    groups::{GroupContext, RouteGroup, RouteGroups},
    lifecycle,
    server::build_app,
};
use portico_services::Cache;

/// Route group that records the shared resources it was initialized with.
#[derive(Default)]
struct TrackingGroup {
    seen_instance_id: Mutex<Option<String>>,
    cleaned_up: AtomicBool,
}

#[async_trait]
impl RouteGroup for TrackingGroup {
    fn name(&self) -> &'static str {
        "tracking"
    }

    async fn initialize(&self, ctx: &GroupContext) -> anyhow::Result<()> {
        // The execution manager must already be bound to the database.
        assert!(!ctx.execution.database().pool().is_closed());
        *self.seen_instance_id.lock().unwrap() = Some(ctx.instance_id.clone());
        Ok(())
    }

    fn router(&self) -> Router {
        Router::new().route("/agent/ping", get(|| async { "pong" }))
    }

    async fn cleanup(&self) {
        self.cleaned_up.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn startup_hands_shared_resources_to_route_groups() {
    let config = Arc::new(test_config());
    let agent: Arc<TrackingGroup> = Arc::new(TrackingGroup::default());

    let mut groups = RouteGroups::noop();
    groups.agent = Arc::clone(&agent) as Arc<dyn RouteGroup>;

    let resources = lifecycle::startup(Arc::clone(&config), &groups, None)
        .await
        .unwrap();

    assert_eq!(
        agent.seen_instance_id.lock().unwrap().as_deref(),
        Some(TEST_INSTANCE)
    );

    // The group's routes are reachable under the API prefix.
    let app = build_app(Arc::clone(&resources), &groups);
    let response = send(&app, http_get("/api/agent/ping")).await;
    assert_eq!(response.status(), StatusCode::OK);

    lifecycle::shutdown(&resources, &groups).await;
    assert!(agent.cleaned_up.load(Ordering::SeqCst));
    assert!(resources.db.pool().is_closed());
}

#[tokio::test]
async fn startup_fails_when_database_is_unreachable() {
    let mut config = test_config();
    config.database_url = "sqlite:/nonexistent-dir/portico.db?mode=ro".into();

    let result = lifecycle::startup(Arc::new(config), &RouteGroups::noop(), None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn startup_survives_cache_failure() {
    let config = Arc::new(test_config());
    let groups = RouteGroups::noop();
    let cache: Arc<dyn Cache> = Arc::new(FailingCache);

    let resources = lifecycle::startup(Arc::clone(&config), &groups, Some(cache))
        .await
        .unwrap();

    // Degraded mode: no cache handle, but the gateway serves traffic.
    assert!(resources.cache.is_none());
    let app = build_app(Arc::clone(&resources), &groups);
    let response = send(&app, http_get("/api/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn startup_keeps_a_working_cache() {
    let config = Arc::new(test_config());
    let groups = RouteGroups::noop();
    let cache: Arc<dyn Cache> = Arc::new(portico_services::NoopCache);

    let resources = lifecycle::startup(config, &groups, Some(cache)).await.unwrap();
    assert!(resources.cache.is_some());

    // Shutdown closes the cache and database without error.
    lifecycle::shutdown(&resources, &groups).await;
    assert!(resources.db.pool().is_closed());
}

#[tokio::test]
async fn startup_persists_prompts_through_the_real_store() {
    let config = Arc::new(test_config());
    let groups = RouteGroups::noop();

    let resources = lifecycle::startup(config, &groups, None).await.unwrap();
    resources.prompts.set("u1", "from startup").await.unwrap();
    assert_eq!(
        resources.prompts.get("u1").await.unwrap().as_deref(),
        Some("from startup")
    );
}

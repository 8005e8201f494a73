#![allow(dead_code)]

use std::sync::Arc;

use {
    anyhow::anyhow,
    async_trait::async_trait,
    axum::{Router, body::Body, http::Request, response::Response},
    http_body_util::BodyExt,
    jsonwebtoken::{EncodingKey, Header, encode},
    serde::Serialize,
    serde_json::Value,
    tower::ServiceExt,
};

use {
    portico_config::GatewayConfig,
    portico_gateway::{groups::RouteGroups, server::build_app, state::GatewayResources},
    portico_services::{
        Cache, Database, ExecutionManager, MemoryPromptStore, PromptStore, StoreError,
    },
};

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_INSTANCE: &str = "test-instance";

pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        instance_id: TEST_INSTANCE.into(),
        database_url: "sqlite::memory:".into(),
        jwt_secret: TEST_SECRET.into(),
        ..Default::default()
    }
}

/// Resource bundle over an in-memory database with an injected store,
/// bypassing the lifecycle for route-level tests.
pub async fn resources_with(
    config: GatewayConfig,
    store: Arc<dyn PromptStore>,
) -> Arc<GatewayResources> {
    let db = Arc::new(Database::initialize("sqlite::memory:").await.unwrap());
    let execution = Arc::new(ExecutionManager::new(Arc::clone(&db)));
    Arc::new(GatewayResources {
        instance_id: config.instance_id.clone(),
        config: Arc::new(config),
        db,
        cache: None,
        execution,
        prompts: store,
    })
}

pub async fn test_app(store: Arc<dyn PromptStore>) -> Router {
    let resources = resources_with(test_config(), store).await;
    build_app(resources, &RouteGroups::noop())
}

pub async fn memory_app() -> Router {
    test_app(Arc::new(MemoryPromptStore::default())).await
}

// ── Requests ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    exp: u64,
}

pub fn bearer_token(user_id: &str) -> String {
    let claims = TestClaims {
        sub: user_id.into(),
        exp: 4_102_444_800, // 2100-01-01
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_authed(uri: &str, user_id: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {}", bearer_token(user_id)))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_request_authed(method: &str, uri: &str, user_id: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", bearer_token(user_id)))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete_authed(uri: &str, user_id: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {}", bearer_token(user_id)))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ── Failure-injection doubles ────────────────────────────────────────────────

/// Store whose writes (and optionally reads) always fail.
pub struct FailingPromptStore;

#[async_trait]
impl PromptStore for FailingPromptStore {
    async fn get(&self, _user_id: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("backend down".into()))
    }

    async fn set(&self, _user_id: &str, _prompt: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("backend down".into()))
    }

    async fn delete(&self, _user_id: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("backend down".into()))
    }
}

/// Cache whose initialization always fails.
pub struct FailingCache;

#[async_trait]
impl Cache for FailingCache {
    async fn initialize(&self) -> anyhow::Result<()> {
        Err(anyhow!("cache unreachable"))
    }

    async fn close(&self) -> anyhow::Result<()> {
        Err(anyhow!("cache unreachable"))
    }
}

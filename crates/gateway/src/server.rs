use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Router, middleware,
        http::{HeaderValue, Method, header},
        routing::get,
    },
    tower_http::cors::CorsLayer,
    tracing::{error, info},
};

use portico_config::GatewayConfig;

use crate::{
    groups::RouteGroups,
    lifecycle, logging, rate_limit, routes,
    state::{AppState, GatewayResources},
};

// ── Router construction ──────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
/// First-party routes plus the merged route-group routers under `/api`,
/// wrapped in CORS, admission control, and request logging.
pub fn build_app(resources: Arc<GatewayResources>, groups: &RouteGroups) -> Router {
    let state = AppState::new(resources);
    let cors = cors_layer(&state.resources.config);

    let api = Router::new()
        .route("/health", get(routes::health))
        .route(
            "/prompt",
            get(routes::get_prompt)
                .post(routes::save_prompt)
                .delete(routes::reset_prompt),
        )
        .route(
            "/custom-prompt/{user_id}",
            get(routes::get_custom_prompt)
                .post(routes::set_custom_prompt)
                .delete(routes::remove_custom_prompt),
        )
        .with_state(state.clone())
        .merge(groups.agent.router())
        .merge(groups.sandbox.router())
        .merge(groups.billing.router());

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(middleware::from_fn_with_state(state, rate_limit::admission))
        .layer(middleware::from_fn(logging::log_requests))
}

/// Declarative CORS policy: the environment-mode origin table, with
/// credentials and the methods/headers the front-end clients send.
fn cors_layer(config: &GatewayConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// ── Serving ──────────────────────────────────────────────────────────────────

/// Serve until ctrl-c, then run the shutdown sequence.
pub async fn serve(
    bind: &str,
    port: u16,
    resources: Arc<GatewayResources>,
    groups: &RouteGroups,
) -> anyhow::Result<()> {
    let app = build_app(Arc::clone(&resources), groups);

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        instance_id = %resources.instance_id,
        mode = resources.config.env_mode.as_str(),
        "gateway listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    lifecycle::shutdown(&resources, groups).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}

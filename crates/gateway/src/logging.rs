use std::{net::SocketAddr, time::Instant};

use {
    axum::{
        extract::{ConnectInfo, Request},
        middleware::Next,
        response::Response,
    },
    tracing::{debug, error, info},
};

/// Per-request observability: logs start, completion with latency and
/// status, and server-side failures. Never alters the response.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or_default().to_string();
    let client_ip = client_ip(&req);

    info!(%method, path, client_ip, query, "request started");

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;
    if status.is_server_error() {
        error!(%method, path, status = status.as_u16(), elapsed_ms, "request failed");
    } else {
        debug!(%method, path, status = status.as_u16(), elapsed_ms, "request completed");
    }
    response
}

/// Client address: first `x-forwarded-for` hop when present (the gateway
/// normally sits behind a proxy), else the socket peer address.
pub(crate) fn client_ip(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".into())
}

use std::{
    collections::{HashMap, VecDeque},
    time::{Duration, Instant},
};

use {
    axum::{
        Json,
        extract::{Request, State},
        http::StatusCode,
        middleware::Next,
        response::{IntoResponse, Response},
    },
    serde_json::json,
    tracing::warn,
};

use crate::{logging::client_ip, state::AppState};

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Limited,
}

/// Insertion-ordered map from client IP to a sliding window of request
/// timestamps, bounded to keep memory flat under adversarial traffic:
/// once the tracked-IP count would exceed the bound, the oldest-inserted
/// entry is evicted. Callers serialize access behind a single mutex.
pub struct IpTracker {
    hits: HashMap<String, VecDeque<Instant>>,
    order: VecDeque<String>,
    max_tracked_ips: usize,
    per_minute: u32,
}

impl IpTracker {
    pub fn new(max_tracked_ips: usize, per_minute: u32) -> Self {
        Self {
            hits: HashMap::new(),
            order: VecDeque::new(),
            max_tracked_ips,
            per_minute,
        }
    }

    /// Record a request from `ip` at `now` and decide admission: more than
    /// `per_minute` requests inside the window are rejected.
    pub fn check(&mut self, ip: &str, now: Instant) -> Admission {
        if let Some(window) = self.hits.get_mut(ip) {
            while window.front().is_some_and(|t| now.duration_since(*t) >= WINDOW) {
                window.pop_front();
            }
            if window.len() as u32 >= self.per_minute {
                return Admission::Limited;
            }
            window.push_back(now);
            return Admission::Allowed;
        }

        if self.hits.len() >= self.max_tracked_ips {
            if let Some(oldest) = self.order.pop_front() {
                self.hits.remove(&oldest);
            }
        }
        self.order.push_back(ip.to_string());
        self.hits.insert(ip.to_string(), VecDeque::from([now]));
        Admission::Allowed
    }

    pub fn tracked(&self) -> usize {
        self.hits.len()
    }

    pub fn is_tracking(&self, ip: &str) -> bool {
        self.hits.contains_key(ip)
    }
}

/// Admission-control middleware: one tracker shared across all request
/// tasks, serialized by the state mutex.
pub async fn admission(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let ip = client_ip(&req);
    let decision = state.limiter.lock().await.check(&ip, Instant::now());
    match decision {
        Admission::Allowed => next.run(req).await,
        Admission::Limited => {
            warn!(client_ip = %ip, "rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "message": "too many requests" })),
            )
                .into_response()
        },
    }
}

use std::sync::Arc;

use {
    axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    chrono::Utc,
    serde::Deserialize,
    serde_json::{Value, json},
    tracing::{error, info},
};

use portico_services::{PromptStore, StoreError};

use crate::{auth::AuthedUser, state::AppState};

// ── Shared prompt override capability ────────────────────────────────────────

/// The one prompt override capability both endpoint families use, already
/// parameterized by a resolved user id. The families differ only in how
/// they resolve that id (trusted path parameter vs. verified token).
pub(crate) struct PromptOverrides {
    store: Arc<dyn PromptStore>,
}

impl PromptOverrides {
    fn new(store: Arc<dyn PromptStore>) -> Self {
        Self { store }
    }

    async fn get(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        self.store.get(user_id).await
    }

    async fn set(&self, user_id: &str, prompt: &str) -> Result<(), StoreError> {
        self.store.set(user_id, prompt).await
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        self.store.delete(user_id).await
    }
}

impl AppState {
    pub(crate) fn overrides(&self) -> PromptOverrides {
        PromptOverrides::new(Arc::clone(&self.resources.prompts))
    }
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

// ── Health ───────────────────────────────────────────────────────────────────

/// Liveness probe for orchestration and monitoring.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    info!("health check endpoint called");
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "instance_id": state.resources.instance_id,
    }))
}

// ── Request bodies ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CustomPromptBody {
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromptBody {
    prompt: String,
}

// ── Unauthenticated family: /custom-prompt/{user_id} ────────────────────────
//
// The user id is trusted straight from the path with no identity check;
// keep this family off public deployments until access control lands.

pub async fn get_custom_prompt(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    match state.overrides().get(&user_id).await {
        Ok(Some(prompt)) => Json(json!({ "prompt": prompt })).into_response(),
        Ok(None) => message(StatusCode::NOT_FOUND, "no custom prompt found"),
        Err(e) => {
            error!(error = %e, "failed to read custom prompt");
            message(StatusCode::INTERNAL_SERVER_ERROR, "failed to read custom prompt")
        },
    }
}

pub async fn set_custom_prompt(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<CustomPromptBody>,
) -> Response {
    let Some(prompt) = body.prompt.filter(|p| !p.is_empty()) else {
        return message(StatusCode::BAD_REQUEST, "prompt must not be empty");
    };
    match state.overrides().set(&user_id, &prompt).await {
        Ok(()) => message(StatusCode::OK, "custom prompt saved"),
        Err(e) => {
            error!(error = %e, "failed to save custom prompt");
            message(StatusCode::INTERNAL_SERVER_ERROR, "failed to save custom prompt")
        },
    }
}

pub async fn remove_custom_prompt(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    match state.overrides().delete(&user_id).await {
        Ok(()) => message(StatusCode::OK, "custom prompt deleted"),
        Err(e) => {
            error!(error = %e, "failed to delete custom prompt");
            message(StatusCode::INTERNAL_SERVER_ERROR, "failed to delete custom prompt")
        },
    }
}

// ── Authenticated family: /prompt ────────────────────────────────────────────

pub async fn get_prompt(State(state): State<AppState>, AuthedUser(user_id): AuthedUser) -> Response {
    match state.overrides().get(&user_id).await {
        // No 404 here: absent simply reads back as null.
        Ok(prompt) => Json(json!({ "prompt": prompt })).into_response(),
        Err(e) => {
            error!(error = %e, "failed to read prompt");
            message(StatusCode::INTERNAL_SERVER_ERROR, "failed to read prompt")
        },
    }
}

pub async fn save_prompt(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
    Json(body): Json<PromptBody>,
) -> Response {
    match state.overrides().set(&user_id, &body.prompt).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => {
            error!(error = %e, "failed to save prompt");
            message(StatusCode::INTERNAL_SERVER_ERROR, "failed to save prompt")
        },
    }
}

pub async fn reset_prompt(
    State(state): State<AppState>,
    AuthedUser(user_id): AuthedUser,
) -> Response {
    match state.overrides().delete(&user_id).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => {
            error!(error = %e, "failed to reset prompt");
            message(StatusCode::INTERNAL_SERVER_ERROR, "failed to reset prompt")
        },
    }
}

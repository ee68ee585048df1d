//! Axum Handlers for the REST API
//!
//! The one-shot chat endpoint shares the enrich → generate pipeline with the
//! WebSocket gateway but returns a single structured response instead of a
//! framed stream, and never touches the connection registry.

use axum::{
    extract::State,
    response::Json,
};
use std::sync::Arc;
use tracing::info;

use crate::{
    models::{ChatRequest, ChatResponse, HealthResponse},
    state::AppState,
};

/// Process a single chat message and return the AI response.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse)
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    info!(
        patient_id = request.patient_id.as_deref().unwrap_or("-"),
        "Processing one-shot chat request"
    );

    let response = state
        .run_turn(&request.message, request.patient_id.as_deref())
        .await;

    Json(ChatResponse {
        response,
        actions: None,
    })
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

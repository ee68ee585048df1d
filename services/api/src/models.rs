//! REST API Models
//!
//! Request and response bodies for the one-shot chat endpoint and the
//! liveness endpoint, annotated for OpenAPI generation with `utoipa`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A one-shot chat request.
#[derive(Deserialize, ToSchema, Debug)]
pub struct ChatRequest {
    #[schema(example = "When is my next appointment?")]
    pub message: String,
    /// Optional patient the conversation is about; enables context enrichment.
    #[schema(example = "P12345")]
    pub patient_id: Option<String>,
    /// Opaque client-side session label; carried for compatibility, unused.
    pub session_id: Option<String>,
}

/// The reply to a one-shot chat request.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ChatResponse {
    pub response: String,
    /// Reserved for structured follow-up actions; currently always null.
    pub actions: Option<serde_json::Value>,
}

/// The fixed liveness payload.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

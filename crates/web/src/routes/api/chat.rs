//! Return assistant chat endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, ChatApiError};
use crate::state::AppState;

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Chat response body.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
}

/// Forward one message to the assistant.
///
/// POST /api/chat
///
/// Stateless: only `message` is sent to the model, together with the fixed
/// system prompt. Errors are reported as `{"error": ...}`.
#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatApiError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let text = state.chat().reply(&request.message).await?;

    Ok(Json(ChatResponse { text }))
}

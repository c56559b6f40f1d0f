//! Return submission endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

use return_desk_core::ReturnRequestId;

use crate::error::{AppError, Result};
use crate::services::CreateReturnRequest;
use crate::services::returns::SUBMITTED_MESSAGE;
use crate::state::AppState;

/// Body of a successful submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReturnResponse {
    pub message: &'static str,
    pub return_id: ReturnRequestId,
}

/// Submit a return request.
///
/// POST /api/create-return
///
/// Responds `201` with the generated ID, `400` when required fields are
/// missing or the body is not valid JSON, and `500` when the store fails.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateReturnRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateReturnResponse>)> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let stored = state.returns().submit(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateReturnResponse {
            message: SUBMITTED_MESSAGE,
            return_id: stored.id,
        }),
    ))
}

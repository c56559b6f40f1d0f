//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Errors are reported as JSON. The return endpoint and pages use
//! `{"message": ...}`; the chat endpoint wraps the same error in
//! [`ChatApiError`] to report `{"error": ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{ChatError, ChatModelError, ReturnError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed validation; nothing was written or sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required credential or setting is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The return store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// The chat model failed.
    #[error("Upstream error: {0}")]
    Upstream(#[from] ChatModelError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) | Self::Storage(_) | Self::Upstream(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client.
    ///
    /// Storage and upstream failures pass the underlying message through.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Configuration(msg) => msg.clone(),
            Self::Storage(err) => format!("Error: {err}"),
            Self::Upstream(err) => err.to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Capture server errors to Sentry and the log.
    fn report(&self) {
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }
    }
}

impl From<ReturnError> for AppError {
    fn from(err: ReturnError) -> Self {
        match err {
            ReturnError::Validation(msg) => Self::Validation(msg),
            ReturnError::Storage(err) => Self::Storage(err),
        }
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::NotConfigured => Self::Configuration(err.to_string()),
            // An empty prompt fails the way a model rejection does.
            ChatError::EmptyMessage => Self::Upstream(ChatModelError::Other(err.to_string())),
            ChatError::Model(err) => Self::Upstream(err),
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();
        let body = json!({ "message": self.client_message() });
        (self.status(), Json(body)).into_response()
    }
}

/// Error for the chat API, reported under an `error` key.
#[derive(Debug)]
pub struct ChatApiError(pub AppError);

impl From<AppError> for ChatApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ChatError> for ChatApiError {
    fn from(err: ChatError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        self.0.report();
        let body = json!({ "error": self.0.client_message() });
        (self.0.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the current scope.
pub fn set_sentry_user(user_id: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Validation("Explanation and Reason are required.".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: Explanation and Reason are required."
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::Validation("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Configuration("x".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Storage(RepositoryError::Unavailable("down".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Internal("x".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_storage_error_body_carries_underlying_message() {
        let response =
            AppError::Storage(RepositoryError::Unavailable("quota exceeded".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Error: store unavailable: quota exceeded");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let body = body_json(AppError::Internal("pool exhausted".to_string()).into_response()).await;
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_chat_errors_use_error_key() {
        let response = ChatApiError::from(ChatError::NotConfigured).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Gemini API key is not configured");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_upstream_error_passes_raw_message() {
        let response =
            ChatApiError::from(ChatError::Model(ChatModelError::Other(
                "model overloaded".to_string(),
            )))
            .into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], "model overloaded");
    }

    #[tokio::test]
    async fn test_empty_chat_message_uses_the_chat_failure_shape() {
        let response = ChatApiError::from(ChatError::EmptyMessage).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Message is required");
    }
}

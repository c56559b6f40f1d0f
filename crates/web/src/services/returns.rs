//! Return request submission.
//!
//! Shared by the JSON endpoint and the server-rendered form: both validate
//! the same way and write through the same [`ReturnStore`].

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::db::{RepositoryError, ReturnStore};
use crate::models::{IdentitySnapshot, NewReturnRequest, ReturnRequest};

/// Message returned when a required field is missing or blank.
pub const MISSING_FIELDS_MESSAGE: &str = "Explanation and Reason are required.";

/// Message returned after a successful submission.
pub const SUBMITTED_MESSAGE: &str = "Return request submitted successfully";

/// Errors from return submission.
#[derive(Debug, Error)]
pub enum ReturnError {
    /// The payload failed validation; nothing was written.
    #[error("{0}")]
    Validation(String),

    /// The store rejected or failed the write.
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Incoming return payload.
///
/// Later form versions renamed some fields, so the older names are accepted
/// as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReturnRequest {
    #[serde(default, alias = "feedback")]
    pub explanation: Option<String>,
    #[serde(default, alias = "reasonCategory")]
    pub reason: Option<String>,
    #[serde(default, alias = "orderid")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_image: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl CreateReturnRequest {
    /// Check required fields and build the insert payload.
    ///
    /// # Errors
    ///
    /// Returns `ReturnError::Validation` when the explanation or reason is
    /// missing or blank. Any other reason text is accepted as sent.
    pub fn validate(self) -> Result<NewReturnRequest, ReturnError> {
        let explanation = non_blank(self.explanation);
        let reason = non_blank(self.reason);

        let (Some(explanation), Some(reason)) = (explanation, reason) else {
            return Err(ReturnError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        };

        Ok(NewReturnRequest::pending(
            explanation,
            reason,
            non_blank(self.order_id),
            IdentitySnapshot {
                user_email: self.user_email,
                user_name: self.user_name,
                user_image: self.user_image,
                user_id: self.user_id,
            },
        ))
    }
}

/// Keep a value only if it has non-whitespace content. The text is kept as sent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validates and stores return requests.
#[derive(Clone)]
pub struct ReturnService {
    store: Arc<dyn ReturnStore>,
}

impl ReturnService {
    #[must_use]
    pub fn new(store: Arc<dyn ReturnStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn ReturnStore {
        self.store.as_ref()
    }

    /// Validate and persist a return request.
    ///
    /// Each call inserts a new record; identical payloads produce distinct
    /// records.
    ///
    /// # Errors
    ///
    /// Returns `ReturnError::Validation` before touching the store, or
    /// `ReturnError::Storage` if the insert fails.
    #[instrument(skip(self, request))]
    pub async fn submit(&self, request: CreateReturnRequest) -> Result<ReturnRequest, ReturnError> {
        let new_request = request.validate()?;
        let stored = self.store.insert(new_request).await?;

        tracing::info!(
            return_id = %stored.id,
            reason = %stored.reason,
            "Return request created"
        );
        Ok(stored)
    }
}

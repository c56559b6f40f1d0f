//! Automation trigger client.
//!
//! When `RETURNS_TRIGGER_URL` is set the return form hands submissions to an
//! external workflow instead of storing them locally.

use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

/// Errors that can occur when posting to the trigger.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// The request never got a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The trigger answered with a non-success status.
    #[error("trigger rejected submission: {status} - {message}")]
    Rejected { status: u16, message: String },
}

/// JSON body posted to the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerPayload {
    pub feedback: String,
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Client for the automation trigger.
#[derive(Clone)]
pub struct TriggerClient {
    client: reqwest::Client,
}

impl Default for TriggerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Post a submission to `url`.
    ///
    /// # Errors
    ///
    /// Returns `TriggerError::Network` on transport failure or
    /// `TriggerError::Rejected` on a non-success status. Nothing is retried.
    #[instrument(skip(self, payload), fields(host = url.host_str().unwrap_or_default()))]
    pub async fn send(&self, url: &Url, payload: &TriggerPayload) -> Result<(), TriggerError> {
        let response = self.client.post(url.clone()).json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TriggerError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!("Submission forwarded to trigger");
        Ok(())
    }
}

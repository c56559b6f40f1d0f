//! Return assistant chat.
//!
//! Stateless: each call forwards one message with the fixed system prompt
//! and returns the model's text. Transcripts are kept by the chat page, not
//! here.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::instrument;

use crate::config::GeminiConfig;
use crate::gemini::{GeminiClient, GeminiError};

/// Persona and policy sent as the system instruction on every call.
pub const SYSTEM_PROMPT: &str = "You are the Return Management Assistant for a Return Automation System.
Your Role: Help users with their return process, explain return policies, and assist with technical issues related to returns.
Tone: Professional, empathetic, and concise.
Capabilities:
- Guide users through the return form.
- Explain that items must be in original condition and returned within 30 days.
- If a user asks about non-return topics, politely redirect them to the return process or state that you can only assist with returns.
- Do not make up order details; ask the user for their order ID if needed.";

/// Message used when no model credential is configured.
pub const NOT_CONFIGURED_MESSAGE: &str = "Gemini API key is not configured";

/// Message used when the chat message is blank.
pub const EMPTY_MESSAGE: &str = "Message is required";

/// Error from a chat model backend.
#[derive(Debug, Error)]
pub enum ChatModelError {
    #[error(transparent)]
    Gemini(#[from] GeminiError),

    /// Any other backend failure, carried as its message.
    #[error("{0}")]
    Other(String),
}

/// A text generation backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a reply to `message` under `system_instruction`.
    ///
    /// # Errors
    ///
    /// Returns `ChatModelError` if the backend fails or returns no text.
    async fn reply(
        &self,
        system_instruction: &str,
        message: &str,
    ) -> Result<String, ChatModelError>;
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn reply(
        &self,
        system_instruction: &str,
        message: &str,
    ) -> Result<String, ChatModelError> {
        Ok(self
            .generate_content(Some(system_instruction), message)
            .await?)
    }
}

/// Errors from the chat service.
#[derive(Debug, Error)]
pub enum ChatError {
    /// No model credential is configured; nothing was sent.
    #[error("Gemini API key is not configured")]
    NotConfigured,

    /// The message was blank; nothing was sent.
    #[error("Message is required")]
    EmptyMessage,

    /// The model call failed.
    #[error(transparent)]
    Model(#[from] ChatModelError),
}

/// Forwards visitor messages to the configured model.
#[derive(Clone, Default)]
pub struct ChatService {
    model: Option<Arc<dyn ChatModel>>,
}

impl ChatService {
    #[must_use]
    pub fn new(model: Option<Arc<dyn ChatModel>>) -> Self {
        Self { model }
    }

    /// Build the service from configuration, using Gemini when a key is set.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError` if the Gemini client cannot be constructed.
    pub fn from_config(config: Option<&GeminiConfig>) -> Result<Self, GeminiError> {
        let model = match config {
            Some(config) => Some(Arc::new(GeminiClient::new(config)?) as Arc<dyn ChatModel>),
            None => None,
        };
        Ok(Self::new(model))
    }

    /// Whether a model is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Send one message and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::NotConfigured` or `ChatError::EmptyMessage` without
    /// any outbound call, or `ChatError::Model` when the model call fails.
    #[instrument(skip(self, message), fields(chars = message.len()))]
    pub async fn reply(&self, message: &str) -> Result<String, ChatError> {
        let Some(model) = &self.model else {
            return Err(ChatError::NotConfigured);
        };

        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let text = model.reply(SYSTEM_PROMPT, message).await?;
        tracing::debug!(reply_chars = text.len(), "Chat reply generated");
        Ok(text)
    }
}

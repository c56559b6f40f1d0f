//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ReturnsConfig;
use crate::db::ReturnStore;
use crate::gemini::GeminiError;
use crate::identity::{HttpIdentityProvider, IdentityProvider};
use crate::services::{ChatService, ReturnFormFlow, ReturnService, TriggerClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// collaborators built once at startup: the return store, the chat model
/// and the identity provider.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ReturnsConfig,
    returns: ReturnService,
    chat: ChatService,
    identity: Arc<dyn IdentityProvider>,
    form: ReturnFormFlow,
}

impl AppState {
    /// Create the production application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration
    /// * `store` - Return request store (usually `PgReturnStore`)
    ///
    /// # Errors
    ///
    /// Returns an error if the Gemini client cannot be built.
    pub fn new(config: ReturnsConfig, store: Arc<dyn ReturnStore>) -> Result<Self, GeminiError> {
        let chat = ChatService::from_config(config.gemini.as_ref())?;
        let identity = Arc::new(HttpIdentityProvider::new(config.identity.clone()));
        Ok(Self::from_parts(config, store, chat, identity))
    }

    /// Assemble state from explicit collaborators.
    #[must_use]
    pub fn from_parts(
        config: ReturnsConfig,
        store: Arc<dyn ReturnStore>,
        chat: ChatService,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let returns = ReturnService::new(store);
        let form = ReturnFormFlow::new(config.form.clone(), returns.clone(), TriggerClient::new());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                returns,
                chat,
                identity,
                form,
            }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &ReturnsConfig {
        &self.inner.config
    }

    /// Get a reference to the return service.
    #[must_use]
    pub fn returns(&self) -> &ReturnService {
        &self.inner.returns
    }

    /// Get a reference to the chat service.
    #[must_use]
    pub fn chat(&self) -> &ChatService {
        &self.inner.chat
    }

    /// Get a reference to the identity provider.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// Get a reference to the return form flow.
    #[must_use]
    pub fn form(&self) -> &ReturnFormFlow {
        &self.inner.form
    }

    /// Absolute URL of a path on this site.
    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.config.base_url.trim_end_matches('/'))
    }
}

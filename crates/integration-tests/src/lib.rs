//! Integration tests for Return Desk.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p return-desk-integration-tests
//! ```
//!
//! The full router from `return_desk_web::app` is driven in-process with
//! `tower::ServiceExt::oneshot`. Every outside collaborator is replaced:
//!
//! - [`MemoryReturnStore`] or [`FailingStore`] for the database
//! - [`ScriptedModel`] for Gemini
//! - [`StubIdentity`] for the identity provider
//! - `tower_sessions::MemoryStore` for sessions
//!
//! # Test Categories
//!
//! - `api_create_return` - JSON return submission
//! - `api_chat` - JSON chat proxy
//! - `return_form` - Server-rendered return form
//! - `assistant_page` - Server-rendered chat page and its transcript
//! - `health` - Liveness and readiness

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use url::Url;

use return_desk_web::config::{IdentityConfig, ReturnFormConfig, ReturnsConfig};
use return_desk_web::db::{MemoryReturnStore, RepositoryError, ReturnStore};
use return_desk_web::identity::{IdentityError, IdentityProvider};
use return_desk_web::middleware::session_layer;
use return_desk_web::models::{CurrentUser, NewReturnRequest, ReturnRequest};
use return_desk_web::services::{ChatModel, ChatModelError, ChatService};
use return_desk_web::state::AppState;

/// Cookie the stub identity provider reads.
pub const IDENTITY_COOKIE: &str = "__session";

/// Token the stub identity provider accepts.
pub const VALID_TOKEN: &str = "valid-token";

/// Public URL used in tests.
pub const BASE_URL: &str = "http://localhost:3000";

/// Cookie header for a signed-in visitor.
#[must_use]
pub fn signed_in_cookie() -> String {
    format!("{IDENTITY_COOKIE}={VALID_TOKEN}")
}

/// The visitor behind [`VALID_TOKEN`].
#[must_use]
pub fn test_user() -> CurrentUser {
    CurrentUser {
        id: "user_2abc".to_string(),
        full_name: Some("Sam Rivera".to_string()),
        image_url: Some("https://img.example.test/sam.png".to_string()),
        email: Some("sam@example.com".to_string()),
    }
}

/// Configuration with the default form layout and no Gemini key.
#[must_use]
pub fn test_config() -> ReturnsConfig {
    ReturnsConfig {
        database_url: SecretString::from("postgres://unused@localhost/return_desk"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: BASE_URL.to_string(),
        gemini: None,
        identity: IdentityConfig {
            sign_in_url: Url::parse("https://accounts.example.test/sign-in").expect("url"),
            sign_up_url: Url::parse("https://accounts.example.test/sign-up").expect("url"),
            userinfo_url: Url::parse("https://accounts.example.test/userinfo").expect("url"),
            session_cookie: IDENTITY_COOKIE.to_string(),
        },
        form: ReturnFormConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

// =============================================================================
// Stubs
// =============================================================================

/// Identity provider that knows exactly one token.
pub struct StubIdentity {
    config: IdentityConfig,
}

impl StubIdentity {
    #[must_use]
    pub const fn new(config: IdentityConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    fn session_cookie(&self) -> &str {
        &self.config.session_cookie
    }

    async fn current_user(&self, session_token: &str) -> Result<Option<CurrentUser>, IdentityError> {
        Ok((session_token == VALID_TOKEN).then(test_user))
    }

    fn sign_in_url(&self, return_to: &str) -> Url {
        let mut url = self.config.sign_in_url.clone();
        url.query_pairs_mut().append_pair("redirect_url", return_to);
        url
    }

    fn sign_up_url(&self, return_to: &str) -> Url {
        let mut url = self.config.sign_up_url.clone();
        url.query_pairs_mut().append_pair("redirect_url", return_to);
        url
    }
}

/// Chat model that answers with a fixed reply (or fails) and counts calls.
#[derive(Default)]
pub struct ScriptedModel {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    /// A model that always answers `reply`.
    #[must_use]
    pub fn answering(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    /// A model that always fails.
    #[must_use]
    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn reply(&self, _system_instruction: &str, _message: &str) -> Result<String, ChatModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| ChatModelError::Other("model overloaded".to_string()))
    }
}

/// Store whose writes always fail.
pub struct FailingStore;

#[async_trait]
impl ReturnStore for FailingStore {
    async fn insert(&self, _request: NewReturnRequest) -> Result<ReturnRequest, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

// =============================================================================
// Test Application
// =============================================================================

/// Router plus handles on its in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryReturnStore,
}

/// Builder for a [`TestApp`].
pub struct TestAppBuilder {
    config: ReturnsConfig,
    store: Option<Arc<dyn ReturnStore>>,
    model: Option<Arc<dyn ChatModel>>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            config: test_config(),
            store: None,
            model: None,
        }
    }
}

impl TestAppBuilder {
    /// Use this chat model.
    #[must_use]
    pub fn with_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Use this store instead of the in-memory one.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ReturnStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Change the form layout.
    #[must_use]
    pub fn with_form(mut self, form: ReturnFormConfig) -> Self {
        self.config.form = form;
        self
    }

    #[must_use]
    pub fn build(self) -> TestApp {
        let memory = MemoryReturnStore::new();
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(memory.clone()) as Arc<dyn ReturnStore>);
        let identity = Arc::new(StubIdentity::new(self.config.identity.clone()));
        let state = AppState::from_parts(self.config, store, ChatService::new(self.model), identity);

        TestApp {
            router: return_desk_web::app(state, session_layer(MemoryStore::default(), false)),
            store: memory,
        }
    }
}

impl TestApp {
    #[must_use]
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder::default()
    }

    /// Send one request through a fresh clone of the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }
}

// =============================================================================
// Request Helpers
// =============================================================================

/// `POST` a JSON body.
#[must_use]
pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// `POST` a urlencoded form, optionally with a `Cookie` header.
#[must_use]
pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder =
        Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

/// `GET` a page, optionally with a `Cookie` header.
#[must_use]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

/// Read a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("json body")
}

/// `name=value` of the first `Set-Cookie` header named `name`.
#[must_use]
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(String::from)
}

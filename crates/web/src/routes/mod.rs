//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness
//! GET  /health/ready        - Readiness (store probe)
//!
//! # Return form
//! GET  /                    - Return form page
//! POST /returns             - Return form submission
//!
//! # Assistant
//! GET  /ai                  - Chat page
//! POST /ai                  - Send a chat message
//! POST /ai/reset            - Clear the transcript
//!
//! # Identity provider
//! GET  /sign-in             - Redirect to hosted sign-in
//! GET  /sign-up             - Redirect to hosted sign-up
//!
//! # JSON API
//! POST /api/create-return   - Submit a return request
//! POST /api/chat            - Ask the return assistant
//! ```

pub mod api;
pub mod assistant;
pub mod auth;
pub mod health;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the assistant routes router.
pub fn assistant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(assistant::show).post(assistant::send))
        .route("/reset", post(assistant::reset))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Return form
        .route("/", get(home::show))
        .route("/returns", post(home::submit))
        // Assistant
        .nest("/ai", assistant_routes())
        // Identity provider
        .route("/sign-in", get(auth::sign_in))
        .route("/sign-up", get(auth::sign_up))
        // JSON API
        .nest("/api", api::api_routes())
}

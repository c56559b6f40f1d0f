//! JSON API routes.
//!
//! ```text
//! POST /api/create-return - Submit a return request
//! POST /api/chat          - Ask the return assistant
//! ```

pub mod chat;
pub mod returns;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/create-return", post(returns::create))
        .route("/chat", post(chat::chat))
}

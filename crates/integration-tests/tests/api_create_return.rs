//! Integration tests for `POST /api/create-return`.
//!
//! Driven through the full router with an in-memory store, so these cover
//! body parsing, validation, the error envelope and persistence together.

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use return_desk_core::ReturnStatus;
use return_desk_integration_tests::{FailingStore, TestApp, body_json, post_json};

const VALID_BODY: &str = r#"{
    "explanation": "Screen cracked on arrival",
    "reason": "defective",
    "orderId": "ORD-1001",
    "userEmail": "sam@example.com",
    "userName": "Sam Rivera",
    "userId": "user_2abc"
}"#;

// =============================================================================
// Success Path
// =============================================================================

#[tokio::test]
async fn test_create_return_stores_pending_request() {
    let app = TestApp::builder().build();
    let started = Utc::now();

    let response = app.send(post_json("/api/create-return", VALID_BODY)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Return request submitted successfully");

    let stored = app.store.all().await;
    assert_eq!(stored.len(), 1);
    let request = stored.first().expect("one request");
    assert_eq!(body["returnId"], request.id.to_string());
    assert_eq!(request.explanation, "Screen cracked on arrival");
    assert_eq!(request.reason, "defective");
    assert_eq!(request.order_id.as_deref(), Some("ORD-1001"));
    assert_eq!(request.status, ReturnStatus::Pending);
    assert!(request.created_at >= started);
    assert_eq!(request.identity.user_email.as_deref(), Some("sam@example.com"));
    assert_eq!(request.identity.user_image, None);
}

#[tokio::test]
async fn test_identical_submissions_are_stored_twice() {
    let app = TestApp::builder().build();

    let first = body_json(app.send(post_json("/api/create-return", VALID_BODY)).await).await;
    let second = body_json(app.send(post_json("/api/create-return", VALID_BODY)).await).await;

    assert_ne!(first["returnId"], second["returnId"]);
    assert_eq!(app.store.len().await, 2);
}

#[tokio::test]
async fn test_form_field_names_are_accepted() {
    let app = TestApp::builder().build();
    let body = r#"{"feedback": "Too small", "reasonCategory": "wrong-item"}"#;

    let response = app.send(post_json("/api/create-return", body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let stored = app.store.all().await;
    let request = stored.first().expect("one request");
    assert_eq!(request.explanation, "Too small");
    assert_eq!(request.reason, "wrong-item");
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_missing_explanation_is_rejected_without_insert() {
    let app = TestApp::builder().build();

    let response = app
        .send(post_json("/api/create-return", r#"{"reason": "defective"}"#))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Explanation and Reason are required."
    );
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_blank_reason_is_rejected_without_insert() {
    let app = TestApp::builder().build();

    let response = app
        .send(post_json(
            "/api/create-return",
            r#"{"explanation": "Broken", "reason": "   "}"#,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_free_text_reason_is_stored_as_sent() {
    let app = TestApp::builder().build();

    let response = app
        .send(post_json(
            "/api/create-return",
            r#"{"explanation": "cracked screen", "reason": "Better price available"}"#,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let stored = app.store.all().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(
        stored.first().map(|r| r.reason.as_str()),
        Some("Better price available")
    );
}

#[tokio::test]
async fn test_malformed_json_is_a_client_error() {
    let app = TestApp::builder().build();

    let response = app.send(post_json("/api/create-return", "{not json")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"].is_string());
    assert!(app.store.is_empty().await);
}

// =============================================================================
// Store Failure
// =============================================================================

#[tokio::test]
async fn test_store_failure_is_reported_as_server_error() {
    let app = TestApp::builder()
        .with_store(Arc::new(FailingStore))
        .build();

    let response = app.send(post_json("/api/create-return", VALID_BODY)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let message = body_json(response).await["message"]
        .as_str()
        .expect("message")
        .to_string();
    assert!(message.starts_with("Error: "), "got {message}");
    assert!(message.contains("connection refused"));
}

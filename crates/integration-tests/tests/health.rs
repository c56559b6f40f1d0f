//! Integration tests for the health endpoints and shared response headers.

use std::sync::Arc;

use axum::http::StatusCode;
use return_desk_integration_tests::{FailingStore, TestApp, body_text, get};
use return_desk_web::middleware::request_id::REQUEST_ID_HEADER;

#[tokio::test]
async fn test_liveness() {
    let app = TestApp::builder().build();

    let response = app.send(get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_follows_the_store() {
    let healthy = TestApp::builder().build();
    assert_eq!(
        healthy.send(get("/health/ready", None)).await.status(),
        StatusCode::OK
    );

    let broken = TestApp::builder()
        .with_store(Arc::new(FailingStore))
        .build();
    assert_eq!(
        broken.send(get("/health/ready", None)).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_sign_in_link_redirects_to_provider() {
    let app = TestApp::builder().build();

    let response = app.send(get("/sign-in?next=/ai", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()["location"].to_str().expect("ascii");
    assert!(location.contains("redirect_url=http%3A%2F%2Flocalhost%3A3000%2Fai"));
}

//! Integration tests for the chat page and its session transcript.

use axum::http::{StatusCode, header};
use return_desk_integration_tests::{
    ScriptedModel, TestApp, body_text, get, post_form, set_cookie,
};
use return_desk_web::middleware::session::SESSION_COOKIE_NAME;
use return_desk_web::models::chat::{FALLBACK_REPLY, GREETING};

const REPLY: &str = "You can return unworn shoes within 30 days.";

/// Byte offset of `needle` in `haystack`, failing the test if absent.
fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("page is missing {needle:?}"))
}

#[tokio::test]
async fn test_new_visitor_sees_greeting() {
    let app = TestApp::builder().build();

    let response = app.send(get("/ai", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains(GREETING));
    assert!(html.contains("The assistant is not available right now."));
}

#[tokio::test]
async fn test_turns_accumulate_in_order_across_requests() {
    let model = ScriptedModel::answering(REPLY);
    let app = TestApp::builder().with_model(model.clone()).build();

    let response = app
        .send(post_form("/ai", "message=Can+I+return+shoes%3F", None))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/ai");
    let cookie = set_cookie(&response, SESSION_COOKIE_NAME).expect("session cookie");

    app.send(post_form("/ai", "message=What+about+sale+items", Some(&cookie)))
        .await;

    let html = body_text(app.send(get("/ai", Some(&cookie))).await).await;
    let greeting = position(&html, GREETING);
    let first = position(&html, "Can I return shoes?");
    let second = position(&html, "What about sale items");
    assert!(greeting < first && first < second);
    assert_eq!(html.matches(REPLY).count(), 2);
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn test_failed_reply_appends_fallback() {
    let app = TestApp::builder()
        .with_model(ScriptedModel::failing())
        .build();

    let response = app.send(post_form("/ai", "message=Where+is+my+refund", None)).await;
    let cookie = set_cookie(&response, SESSION_COOKIE_NAME).expect("session cookie");

    let html = body_text(app.send(get("/ai", Some(&cookie))).await).await;
    assert!(position(&html, "Where is my refund") < position(&html, FALLBACK_REPLY));
}

#[tokio::test]
async fn test_blank_message_is_ignored() {
    let model = ScriptedModel::answering(REPLY);
    let app = TestApp::builder().with_model(model.clone()).build();

    let response = app.send(post_form("/ai", "message=+++", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_reset_returns_to_greeting() {
    let app = TestApp::builder()
        .with_model(ScriptedModel::answering(REPLY))
        .build();

    let response = app.send(post_form("/ai", "message=Hi+there", None)).await;
    let cookie = set_cookie(&response, SESSION_COOKIE_NAME).expect("session cookie");

    let response = app.send(post_form("/ai/reset", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = body_text(app.send(get("/ai", Some(&cookie))).await).await;
    assert!(html.contains(GREETING));
    assert!(!html.contains("Hi there"));
}

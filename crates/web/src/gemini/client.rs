//! Gemini API client for the return assistant.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse};

/// Public Gemini REST endpoint.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Finish reasons that mean the reply was withheld rather than empty.
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT"];

/// Gemini API client.
///
/// Cheap to clone; clones share the underlying HTTP connection pool. No
/// timeout is configured beyond reqwest's defaults and nothing is retried.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for the public Gemini endpoint.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::InvalidConfig` if the API key cannot be used as a
    /// header value, or `GeminiError::Http` if the HTTP client fails to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        Self::with_base_url(config, GEMINI_API_BASE)
    }

    /// Create a client that talks to a different base URL.
    ///
    /// # Errors
    ///
    /// Same as [`GeminiClient::new`].
    pub fn with_base_url(config: &GeminiConfig, base_url: &str) -> Result<Self, GeminiError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| GeminiError::InvalidConfig(format!("API key is not a valid header: {e}")))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model: config.model.clone(),
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Model this client generates with.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Generate a single reply to `message`.
    ///
    /// # Arguments
    ///
    /// * `system_instruction` - Optional persona/policy prompt sent with the message
    /// * `message` - The user's message
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with an error,
    /// or the reply is blocked or empty.
    #[instrument(skip(self, system_instruction, message), fields(model = %self.inner.model))]
    pub async fn generate_content(
        &self,
        system_instruction: Option<&str>,
        message: &str,
    ) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            system_instruction: system_instruction.map(Content::system_text),
            contents: vec![Content::user_text(message)],
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.inner.base_url, self.inner.model
        );

        tracing::debug!("Calling Gemini API");
        let response = self.inner.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))?;

        let text = extract_text(parsed)?;
        tracing::debug!(chars = text.len(), "Gemini response received");
        Ok(text)
    }

    /// Handle an error status code.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return GeminiError::Http(e),
        };

        let parsed = serde_json::from_str::<ApiErrorResponse>(&body).ok();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let message = parsed.map_or(body, |e| e.error.message);
            return GeminiError::RateLimited(message);
        }

        match parsed {
            Some(api_error) => GeminiError::Api {
                status: if api_error.error.status.is_empty() {
                    status.as_u16().to_string()
                } else {
                    api_error.error.status
                },
                message: api_error.error.message,
            },
            None => GeminiError::Api {
                status: status.as_u16().to_string(),
                message: body,
            },
        }
    }
}

/// Pull the reply text out of a successful response.
fn extract_text(response: GenerateContentResponse) -> Result<String, GeminiError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response.prompt_feedback.and_then(|f| f.block_reason);
        return Err(reason.map_or(GeminiError::EmptyResponse, GeminiError::Blocked));
    };

    let text = candidate
        .content
        .map(|content| content.text())
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Ok(text);
    }

    match candidate.finish_reason {
        Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason.as_str()) => {
            Err(GeminiError::Blocked(reason))
        }
        _ => Err(GeminiError::EmptyResponse),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap as AxumHeaderMap, StatusCode};
    use axum::{Json, Router, extract::Path, routing::post};
    use secrecy::SecretString;
    use serde_json::{Value, json};

    use super::*;

    fn config(model: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: SecretString::from("AIzaTestKey9f8e7d6c5b4a"),
            model: model.to_string(),
        }
    }

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub server");
        });
        format!("http://{addr}")
    }

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).expect("fixture")
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"a"},{"text":"b"}]}}]}"#,
        );
        assert_eq!(extract_text(response).expect("text"), "ab");
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let response = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        assert!(matches!(extract_text(response), Err(GeminiError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn test_extract_text_blocked_candidate() {
        let response = parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#);
        assert!(matches!(extract_text(response), Err(GeminiError::Blocked(_))));
    }

    #[test]
    fn test_extract_text_empty() {
        assert!(matches!(extract_text(parse("{}")), Err(GeminiError::EmptyResponse)));
        let response = parse(r#"{"candidates":[{"content":{"parts":[]},"finishReason":"STOP"}]}"#);
        assert!(matches!(extract_text(response), Err(GeminiError::EmptyResponse)));
    }

    #[test]
    fn test_client_reports_configured_model() {
        let client = GeminiClient::new(&config("gemini-1.5-flash")).expect("client");
        assert_eq!(client.model(), "gemini-1.5-flash");
    }

    #[test]
    fn test_gemini_client_is_clone_send_sync() {
        fn assert_traits<T: Clone + Send + Sync>() {}
        assert_traits::<GeminiClient>();
    }

    #[tokio::test]
    async fn test_generate_content_sends_key_instruction_and_message() {
        let router = Router::new().route(
            "/models/{call}",
            post(
                |Path(call): Path<String>, headers: AxumHeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(call, "gemini-2.5-flash:generateContent");
                    assert_eq!(
                        headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()),
                        Some("AIzaTestKey9f8e7d6c5b4a")
                    );
                    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be kind.");
                    assert_eq!(body["contents"][0]["parts"][0]["text"], "What is your return policy?");
                    Json(json!({
                        "candidates": [{
                            "content": {"role": "model", "parts": [{"text": "30 days, original condition."}]},
                            "finishReason": "STOP"
                        }]
                    }))
                },
            ),
        );
        let base = spawn_stub(router).await;

        let client =
            GeminiClient::with_base_url(&config("gemini-2.5-flash"), &base).expect("client");
        let text = client
            .generate_content(Some("Be kind."), "What is your return policy?")
            .await
            .expect("reply");

        assert_eq!(text, "30 days, original condition.");
    }

    #[tokio::test]
    async fn test_generate_content_surfaces_api_error_message() {
        let router = Router::new().route(
            "/models/{call}",
            post(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": {
                            "code": 404,
                            "message": "models/gemini-pro is not found for API version v1beta",
                            "status": "NOT_FOUND"
                        }
                    })),
                )
            }),
        );
        let base = spawn_stub(router).await;

        let client = GeminiClient::with_base_url(&config("gemini-pro"), &base).expect("client");
        let err = client
            .generate_content(None, "Test")
            .await
            .expect_err("should fail");

        match err {
            GeminiError::Api { status, message } => {
                assert_eq!(status, "NOT_FOUND");
                assert!(message.contains("gemini-pro is not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_content_rate_limited() {
        let router = Router::new().route(
            "/models/{call}",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}})),
                )
            }),
        );
        let base = spawn_stub(router).await;

        let client =
            GeminiClient::with_base_url(&config("gemini-2.5-flash"), &base).expect("client");
        let err = client.generate_content(None, "Test").await.expect_err("should fail");
        assert!(matches!(err, GeminiError::RateLimited(m) if m == "Quota exceeded"));
    }
}

//! Current-user extractor.
//!
//! Reads the identity provider's session cookie and asks the provider who it
//! belongs to. Nothing about the user is stored in our own session.

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
};
use tower_sessions::cookie::Cookie;

use crate::error::set_sentry_user;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Extractor that optionally gets the signed-in user.
///
/// Never rejects: a missing cookie, an unknown token and a provider failure
/// all yield `None`. Provider failures are logged.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(OptionalUser(user): OptionalUser) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.display_name()),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = state.identity();
        let Some(token) = session_token(parts, identity.session_cookie()) else {
            return Ok(Self(None));
        };

        let user = match identity.current_user(&token).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to resolve identity session");
                None
            }
        };

        if let Some(user) = &user {
            tracing::Span::current().record("user_id", user.id.as_str());
            set_sentry_user(&user.id, user.email.as_deref());
        }

        Ok(Self(user))
    }
}

/// Find the value of cookie `name` across all `Cookie` headers.
fn session_token(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

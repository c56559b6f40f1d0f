//! Identity provider integration.
//!
//! Sign-in and sign-up happen on the provider's hosted pages. This module
//! only builds links to those pages and resolves the provider's session
//! cookie into a [`CurrentUser`].

mod userinfo;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::models::CurrentUser;

pub use userinfo::HttpIdentityProvider;

/// Query parameter the hosted pages read to send the visitor back.
pub const REDIRECT_PARAM: &str = "redirect_url";

/// Errors that can occur when resolving the current user.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The userinfo endpoint answered with an unexpected status.
    #[error("userinfo error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the userinfo response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// External identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Name of the cookie carrying the provider's session token.
    fn session_cookie(&self) -> &str;

    /// Resolve a session token to the signed-in user.
    ///
    /// Returns `Ok(None)` when the provider does not recognise the token.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the provider could not be asked.
    async fn current_user(&self, session_token: &str) -> Result<Option<CurrentUser>, IdentityError>;

    /// Hosted sign-in page that returns to `return_to` afterwards.
    fn sign_in_url(&self, return_to: &str) -> Url;

    /// Hosted sign-up page that returns to `return_to` afterwards.
    fn sign_up_url(&self, return_to: &str) -> Url;
}

/// Append the return address to a hosted page URL.
pub(crate) fn with_redirect(page: &Url, return_to: &str) -> Url {
    let mut url = page.clone();
    url.query_pairs_mut().append_pair(REDIRECT_PARAM, return_to);
    url
}

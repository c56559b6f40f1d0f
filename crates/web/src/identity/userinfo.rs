//! `OpenID` Connect userinfo client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use super::{IdentityError, IdentityProvider, with_redirect};
use crate::config::IdentityConfig;
use crate::models::CurrentUser;

/// Standard userinfo claims used by the app.
#[derive(Debug, Deserialize)]
struct UserInfoClaims {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserInfoClaims> for CurrentUser {
    fn from(claims: UserInfoClaims) -> Self {
        let full_name = claims.name.or_else(|| {
            let parts: Vec<String> = [claims.given_name, claims.family_name]
                .into_iter()
                .flatten()
                .collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        });

        Self {
            id: claims.sub,
            full_name,
            image_url: claims.picture,
            email: claims.email,
        }
    }
}

/// Identity provider reached over HTTP.
///
/// The session token from the provider's cookie is presented as a bearer
/// token to the userinfo endpoint.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    config: IdentityConfig,
}

impl HttpIdentityProvider {
    #[must_use]
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    fn session_cookie(&self) -> &str {
        &self.config.session_cookie
    }

    #[instrument(skip(self, session_token))]
    async fn current_user(&self, session_token: &str) -> Result<Option<CurrentUser>, IdentityError> {
        let response = self
            .client
            .get(self.config.userinfo_url.clone())
            .bearer_auth(session_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::debug!(status = status.as_u16(), "Session token not recognised");
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let claims: UserInfoClaims = response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))?;

        Ok(Some(claims.into()))
    }

    fn sign_in_url(&self, return_to: &str) -> Url {
        with_redirect(&self.config.sign_in_url, return_to)
    }

    fn sign_up_url(&self, return_to: &str) -> Url {
        with_redirect(&self.config.sign_up_url, return_to)
    }
}

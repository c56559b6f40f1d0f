//! Sign-in and sign-up links.
//!
//! Both pages are hosted by the identity provider; these routes only
//! redirect there with a return address on this site.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use crate::state::AppState;

/// Query parameters for the auth redirects.
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    /// Local path to come back to after signing in.
    #[serde(default)]
    pub next: Option<String>,
}

impl AuthQuery {
    /// The requested local path, or `/` if it is missing or points off-site.
    fn local_path(&self) -> &str {
        match self.next.as_deref() {
            Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
            _ => "/",
        }
    }
}

/// Redirect to the hosted sign-in page.
#[instrument(skip(state))]
pub async fn sign_in(State(state): State<AppState>, Query(query): Query<AuthQuery>) -> Redirect {
    let return_to = state.absolute_url(query.local_path());
    Redirect::to(state.identity().sign_in_url(&return_to).as_str())
}

/// Redirect to the hosted sign-up page.
#[instrument(skip(state))]
pub async fn sign_up(State(state): State<AppState>, Query(query): Query<AuthQuery>) -> Redirect {
    let return_to = state.absolute_url(query.local_path());
    Redirect::to(state.identity().sign_up_url(&return_to).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(next: Option<&str>) -> AuthQuery {
        AuthQuery {
            next: next.map(String::from),
        }
    }

    #[test]
    fn test_local_path_keeps_site_paths() {
        assert_eq!(query(Some("/ai")).local_path(), "/ai");
        assert_eq!(query(None).local_path(), "/");
    }

    #[test]
    fn test_local_path_rejects_off_site_targets() {
        assert_eq!(query(Some("https://evil.test/")).local_path(), "/");
        assert_eq!(query(Some("//evil.test/")).local_path(), "/");
    }
}

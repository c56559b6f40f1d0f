//! Session-related types.

use serde::{Deserialize, Serialize};

use super::return_request::IdentitySnapshot;

/// The signed-in visitor as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Provider-assigned user ID.
    pub id: String,
    /// Display name.
    pub full_name: Option<String>,
    /// Avatar URL.
    pub image_url: Option<String>,
    /// Primary email address.
    pub email: Option<String>,
}

impl CurrentUser {
    /// Name to show in the header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }

    /// Snapshot of this user for a return request.
    #[must_use]
    pub fn snapshot(&self) -> IdentitySnapshot {
        IdentitySnapshot {
            user_email: self.email.clone(),
            user_name: self.full_name.clone(),
            user_image: self.image_url.clone(),
            user_id: Some(self.id.clone()),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for the chat page transcript.
    pub const CHAT_TRANSCRIPT: &str = "chat_transcript";
}

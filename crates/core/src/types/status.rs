//! Status and role enums.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a return request.
///
/// Every request is created as [`ReturnStatus::Pending`] and stays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    #[default]
    Pending,
}

impl ReturnStatus {
    /// Stable string form used in storage and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
        }
    }
}

impl std::fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_status_defaults_to_pending() {
        assert_eq!(ReturnStatus::default(), ReturnStatus::Pending);
        assert_eq!(ReturnStatus::default().to_string(), "pending");
    }

    #[test]
    fn test_return_status_serde() {
        let json = serde_json::to_string(&ReturnStatus::Pending).expect("serialize");
        assert_eq!(json, "\"pending\"");
    }

    #[test]
    fn test_chat_role_serde() {
        let json = serde_json::to_string(&ChatRole::Assistant).expect("serialize");
        assert_eq!(json, "\"assistant\"");
        let role: ChatRole = serde_json::from_str("\"user\"").expect("deserialize");
        assert_eq!(role, ChatRole::User);
    }
}

//! Chat transcript types.
//!
//! A transcript lives in the visitor's session only. The chat API never sees
//! it; each API call carries just the latest message.

use serde::{Deserialize, Serialize};

use return_desk_core::ChatRole;

/// Greeting shown at the top of every new transcript.
pub const GREETING: &str =
    "Hello! I am your Return Management Assistant. How can I help you today?";

/// Reply appended when the assistant could not answer.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again later.";

/// Most turns a transcript keeps; older turns are dropped first.
pub const MAX_TURNS: usize = 50;

/// One message in a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Whether this turn was written by the visitor.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

/// Ordered, append-only list of chat turns, capped at [`MAX_TURNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(Vec<ChatTurn>);

impl Default for Transcript {
    fn default() -> Self {
        Self(vec![ChatTurn::assistant(GREETING)])
    }
}

impl Transcript {
    /// Append a turn at the end, dropping the oldest turns past [`MAX_TURNS`].
    pub fn push(&mut self, turn: ChatTurn) {
        self.0.push(turn);
        let excess = self.0.len().saturating_sub(MAX_TURNS);
        if excess > 0 {
            self.0.drain(..excess);
        }
    }

    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

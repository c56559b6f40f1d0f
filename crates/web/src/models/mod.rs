//! Domain models for Return Desk.
//!
//! - [`return_request`] - The persisted return request and its insert payload
//! - [`chat`] - Chat turns and the session-scoped transcript
//! - [`session`] - Identity snapshot and session keys

pub mod chat;
pub mod return_request;
pub mod session;

pub use chat::{ChatTurn, Transcript};
pub use return_request::{IdentitySnapshot, NewReturnRequest, ReturnRequest};
pub use session::{CurrentUser, keys as session_keys};

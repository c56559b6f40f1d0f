//! Google Gemini API integration for the return assistant.
//!
//! Only the non-streaming `generateContent` call is used: one user message
//! in, one text reply out. The system instruction travels with every call
//! because the API keeps no conversation state.

pub mod client;
pub mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;

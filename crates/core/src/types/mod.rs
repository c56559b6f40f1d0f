//! Core types for Return Desk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod reason;
pub mod status;

pub use id::*;
pub use reason::{ReturnReason, UnknownReason};
pub use status::*;

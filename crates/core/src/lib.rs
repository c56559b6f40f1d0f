//! Return Desk Core - Shared types library.
//!
//! This crate provides the domain types used across all Return Desk components:
//! - `web` - Customer-facing return form, chat assistant and JSON API
//! - `cli` - Command-line tools for migrations and model probing
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe return request IDs, reasons, statuses and chat roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

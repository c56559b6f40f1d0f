//! Persistence for return requests.
//!
//! # Database: `return_desk`
//!
//! ## Tables
//!
//! - `return_requests` - Submitted return requests (write-once)
//! - `tower_sessions.session` - Tower-sessions storage (chat transcripts)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p return-desk-cli -- migrate
//! ```
//!
//! Handlers never touch the pool directly; they go through the
//! [`ReturnStore`] handed to `AppState` at startup.

pub mod memory;
pub mod returns;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::models::{NewReturnRequest, ReturnRequest};

pub use memory::MemoryReturnStore;
pub use returns::PgReturnStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store could not be reached or refused the write.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Write-only access to the return request collection.
///
/// There is deliberately no update, delete, list or search operation.
#[async_trait]
pub trait ReturnStore: Send + Sync {
    /// Insert a new return request and return it with its generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write fails. Callers do not retry.
    async fn insert(&self, request: NewReturnRequest) -> Result<ReturnRequest, RepositoryError>;

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be reached.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

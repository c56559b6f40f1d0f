//! `PostgreSQL`-backed return request store.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use return_desk_core::ReturnRequestId;

use super::{RepositoryError, ReturnStore};
use crate::models::{NewReturnRequest, ReturnRequest};

/// Return request store over a shared connection pool.
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone)]
pub struct PgReturnStore {
    pool: PgPool,
}

impl PgReturnStore {
    /// Create a new store on an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReturnStore for PgReturnStore {
    #[instrument(skip(self, request), fields(reason = %request.reason))]
    async fn insert(&self, request: NewReturnRequest) -> Result<ReturnRequest, RepositoryError> {
        let id: uuid::Uuid = sqlx::query_scalar(
            r"
            INSERT INTO return_requests
                (explanation, reason, order_id, user_email, user_name, user_image, user_id,
                 status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            ",
        )
        .bind(&request.explanation)
        .bind(&request.reason)
        .bind(request.order_id.as_deref())
        .bind(request.identity.user_email.as_deref())
        .bind(request.identity.user_name.as_deref())
        .bind(request.identity.user_image.as_deref())
        .bind(request.identity.user_id.as_deref())
        .bind(request.status.as_str())
        .bind(request.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(request.into_stored(ReturnRequestId::new(id)))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

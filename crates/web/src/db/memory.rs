//! In-process return request store.
//!
//! Used by the test suites in place of `PostgreSQL`. IDs are random UUIDs, the
//! same shape the database generates.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use return_desk_core::ReturnRequestId;

use super::{RepositoryError, ReturnStore};
use crate::models::{NewReturnRequest, ReturnRequest};

/// Return request store kept in memory.
#[derive(Clone, Default)]
pub struct MemoryReturnStore {
    inner: Arc<RwLock<Vec<ReturnRequest>>>,
}

impl MemoryReturnStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored request, in insertion order.
    pub async fn all(&self) -> Vec<ReturnRequest> {
        self.inner.read().await.clone()
    }

    /// Number of stored requests.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl ReturnStore for MemoryReturnStore {
    async fn insert(&self, request: NewReturnRequest) -> Result<ReturnRequest, RepositoryError> {
        let stored = request.into_stored(ReturnRequestId::new(Uuid::new_v4()));
        self.inner.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IdentitySnapshot;

    fn sample() -> NewReturnRequest {
        NewReturnRequest::pending(
            "cracked screen".to_string(),
            "defective".to_string(),
            None,
            IdentitySnapshot::default(),
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids() {
        let store = MemoryReturnStore::new();
        let first = store.insert(sample()).await.expect("insert");
        let second = store.insert(sample()).await.expect("insert");

        assert_ne!(first.id, second.id);
        assert_eq!(store.len().await, 2);
        assert_eq!(store.all().await[0], first);
    }

    #[tokio::test]
    async fn test_ping_is_always_ok() {
        assert!(MemoryReturnStore::new().ping().await.is_ok());
    }
}

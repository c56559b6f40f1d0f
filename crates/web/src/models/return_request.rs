//! Return request domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use return_desk_core::{ReturnRequestId, ReturnStatus};

/// Who submitted a return request, as reported at submission time.
///
/// Copied verbatim from the request or the identity provider and never
/// re-validated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySnapshot {
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub user_image: Option<String>,
    pub user_id: Option<String>,
}

/// A return request that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReturnRequest {
    /// Free-text explanation from the customer.
    pub explanation: String,
    /// Reason as submitted: a category identifier from the form, or free text.
    pub reason: String,
    /// Originating order, when the customer supplied one.
    pub order_id: Option<String>,
    /// Submitter identity snapshot.
    pub identity: IdentitySnapshot,
    /// Always [`ReturnStatus::Pending`] for new requests.
    pub status: ReturnStatus,
    /// Set by the application just before insertion.
    pub created_at: DateTime<Utc>,
}

impl NewReturnRequest {
    /// Build a pending request stamped with the current time.
    #[must_use]
    pub fn pending(
        explanation: String,
        reason: String,
        order_id: Option<String>,
        identity: IdentitySnapshot,
    ) -> Self {
        Self {
            explanation,
            reason,
            order_id,
            identity,
            status: ReturnStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Attach the store-generated ID.
    #[must_use]
    pub fn into_stored(self, id: ReturnRequestId) -> ReturnRequest {
        ReturnRequest {
            id,
            explanation: self.explanation,
            reason: self.reason,
            order_id: self.order_id,
            identity: self.identity,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// A stored return request (domain type).
///
/// Write-once: the store owns the record after insertion and nothing in the
/// application updates or deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub id: ReturnRequestId,
    pub explanation: String,
    pub reason: String,
    pub order_id: Option<String>,
    #[serde(flatten)]
    pub identity: IdentitySnapshot,
    pub status: ReturnStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_request_is_stamped_now() {
        let before = Utc::now();
        let request = NewReturnRequest::pending(
            "cracked screen".to_string(),
            "defective".to_string(),
            None,
            IdentitySnapshot::default(),
        );
        assert_eq!(request.status, ReturnStatus::Pending);
        assert!(request.created_at >= before);
    }

    #[test]
    fn test_stored_request_serializes_flat_camel_case() {
        let stored = NewReturnRequest::pending(
            "wrong colour".to_string(),
            "wrong_item".to_string(),
            Some("ORD-1001".to_string()),
            IdentitySnapshot {
                user_email: Some("sam@example.com".to_string()),
                ..IdentitySnapshot::default()
            },
        )
        .into_stored(ReturnRequestId::new(uuid::Uuid::nil()));

        let json = serde_json::to_value(&stored).expect("serialize");
        assert_eq!(json["reason"], "wrong_item");
        assert_eq!(json["orderId"], "ORD-1001");
        assert_eq!(json["userEmail"], "sam@example.com");
        assert_eq!(json["status"], "pending");
        assert!(json.get("identity").is_none());
    }
}

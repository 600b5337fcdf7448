//! Error Types
//!
//! Two taxonomies, one per boundary:
//!
//! - [`StoreError`] is produced by [`RelationshipStore`](crate::store::RelationshipStore)
//!   implementations. Every failure is a distinct variant so the toggle
//!   protocol can absorb races by exhaustive matching instead of
//!   inspecting error-message text.
//! - [`InteractionError`] is what the engine surfaces to callers after
//!   classification. Raw store errors never cross this boundary.
//!
//! "Already satisfied" is deliberately not an error in either taxonomy: a
//! conflicting insert or a missing delete means the desired end state was
//! reached by a concurrent actor, and the protocol reports it as success.

use thiserror::Error;

/// Errors produced at the relationship-store boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An insert hit an existing row for the same key.
    #[error("relationship row already exists")]
    Conflict,

    /// A delete found no row for the key.
    #[error("relationship row not found")]
    NotFound,

    /// The store's access policy rejected the operation.
    #[error("permission denied by the relationship store")]
    PermissionDenied,

    /// The store could not be reached or timed out.
    #[error("relationship store unavailable: {message}")]
    Unavailable {
        /// Human-readable failure detail.
        message: String,
    },

    /// The store answered with something undecodable.
    #[error("malformed store response: {message}")]
    Malformed {
        /// Human-readable failure detail.
        message: String,
    },
}

impl StoreError {
    /// Create a new unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the engine to its callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// No authenticated user; rejected before any remote call.
    #[error("no authenticated user")]
    Unauthenticated,

    /// The store's access policy rejected the write. The optimistic flag
    /// was rolled back.
    #[error("permission denied by the relationship store")]
    PermissionDenied,

    /// A network-level failure. The optimistic flag was rolled back and a
    /// manual retry starts from a known-good state.
    #[error("transient store failure: {message}")]
    Transient {
        /// Human-readable failure detail.
        message: String,
    },

    /// A non-transient store failure outside the permission taxonomy.
    #[error("relationship store failure: {message}")]
    Store {
        /// Human-readable failure detail.
        message: String,
    },

    /// A toggle for this key is already in flight; rejected without
    /// touching the store.
    #[error("a toggle for this relationship is already in flight")]
    Busy,
}

impl InteractionError {
    /// Whether the caller may reasonably retry the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, InteractionError::Transient { .. })
    }

    /// Classify a store error that the protocol did not absorb.
    pub(crate) fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::PermissionDenied => InteractionError::PermissionDenied,
            StoreError::Unavailable { message } => InteractionError::Transient { message },
            other => InteractionError::Store {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_is_retryable() {
        let err = InteractionError::from_store(StoreError::unavailable("connection reset"));
        assert!(err.is_retryable());
        assert!(matches!(err, InteractionError::Transient { .. }));
    }

    #[test]
    fn test_permission_denied_is_not_retryable() {
        let err = InteractionError::from_store(StoreError::PermissionDenied);
        assert!(!err.is_retryable());
        assert_eq!(err, InteractionError::PermissionDenied);
    }

    #[test]
    fn test_malformed_maps_to_store_failure() {
        let err = InteractionError::from_store(StoreError::malformed("not json"));
        match err {
            InteractionError::Store { message } => assert!(message.contains("not json")),
            other => panic!("expected Store, got {other:?}"),
        }
    }

    #[test]
    fn test_busy_is_not_retryable_automatically() {
        assert!(!InteractionError::Busy.is_retryable());
    }
}

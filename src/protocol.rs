//! # Toggle Protocol
//!
//! Converts "toggle relationship R" into a safe insert/delete sequence
//! against a store that offers no atomic upsert-toggle. Every sequence is
//! a check-then-act race; the protocol absorbs the races by treating
//! "desired state already true" as success rather than as a conflict.
//!
//! ## Contract
//!
//! The caller passes the flag value it observed *before* flipping
//! optimistically; the protocol selects the operation from that prior, not
//! from a re-read at call time. The outcome always reports the boolean
//! state actually achieved, which equals the caller's desired state even
//! when a concurrent actor got there first.
//!
//! Race absorption, by prior:
//!
//! - prior `true` (remove): a row already gone, or deleted by a racing
//!   actor between the probe and the delete, is success
//! - prior `false` (create): a row already present, or inserted by a
//!   racing actor between the probe and the insert, is success
//!
//! Only genuine failures (permission policy, transport, undecodable
//! responses) propagate, already classified into [`InteractionError`].

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{InteractionError, StoreError};
use crate::store::RelationshipStore;
use crate::types::RelationshipKey;

/// Result of a settled toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// The boolean state actually achieved in the store.
    pub final_state: bool,
}

/// The insert/delete sequencing layer over the relationship store.
pub struct ToggleProtocol {
    store: Arc<dyn RelationshipStore>,
}

impl ToggleProtocol {
    /// Create a protocol over the given store.
    pub fn new(store: Arc<dyn RelationshipStore>) -> Self {
        Self { store }
    }

    /// Drive the relationship to the opposite of `prior`.
    pub async fn toggle(
        &self,
        key: &RelationshipKey,
        prior: bool,
    ) -> Result<ToggleOutcome, InteractionError> {
        if prior {
            self.remove(key).await
        } else {
            self.create(key).await
        }
    }

    /// Caller believes the row exists and wants it gone.
    async fn remove(&self, key: &RelationshipKey) -> Result<ToggleOutcome, InteractionError> {
        let present = self
            .store
            .exists(key)
            .await
            .map_err(InteractionError::from_store)?;

        if !present {
            // Removing something already removed is not an error.
            debug!("edge already absent, nothing to delete: {:?}", key.kind);
            return Ok(ToggleOutcome { final_state: false });
        }

        match self.store.delete_edge(key).await {
            Ok(()) => Ok(ToggleOutcome { final_state: false }),
            Err(StoreError::NotFound) => {
                // A concurrent deleter won the race between probe and delete.
                warn!("delete raced with another deleter, treating as removed");
                Ok(ToggleOutcome { final_state: false })
            }
            Err(other) => Err(InteractionError::from_store(other)),
        }
    }

    /// Caller believes the row is absent and wants it created.
    async fn create(&self, key: &RelationshipKey) -> Result<ToggleOutcome, InteractionError> {
        let present = self
            .store
            .exists(key)
            .await
            .map_err(InteractionError::from_store)?;

        if present {
            // The true state was already "liked"/"following". Reporting it
            // as the final state lets the controller correct local drift.
            debug!("edge already present, skipping insert: {:?}", key.kind);
            return Ok(ToggleOutcome { final_state: true });
        }

        match self.store.insert_edge(key).await {
            Ok(()) => Ok(ToggleOutcome { final_state: true }),
            Err(StoreError::Conflict) => {
                // A concurrent inserter won the race between probe and
                // insert; the desired end state was achieved either way.
                warn!("insert raced with another writer, treating as present");
                Ok(ToggleOutcome { final_state: true })
            }
            Err(other) => Err(InteractionError::from_store(other)),
        }
    }
}

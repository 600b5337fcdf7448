//! # Optimistic Reconciliation Controller
//!
//! The state machine around each toggle: flip the cached flag immediately,
//! run the toggle protocol, then confirm or roll back when the remote call
//! settles. The flip is the only effect visible to the UI before the
//! network round trip completes.
//!
//! Per toggle invocation the flag moves
//! `Idle -> OptimisticallyApplied -> Confirmed | RolledBack`:
//!
//! - success with the expected final state confirms silently
//! - success with the *opposite* final state means a race resolved to the
//!   caller's desired outcome by another path; the cache is corrected to
//!   the true state and no error is surfaced
//! - failure rolls the flag back to its pre-toggle value with status
//!   `Error`, and the classified error propagates to the caller
//!
//! Toggles are serialized per key: while one is in flight, a second toggle
//! on the same key is rejected with [`InteractionError::Busy`] before any
//! cache or store access. Toggles on different keys run concurrently.

use dashmap::DashSet;
use std::sync::Arc;
use tracing::{debug, error};

use crate::cache::InteractionCache;
use crate::error::InteractionError;
use crate::identity::IdentityProvider;
use crate::protocol::{ToggleOutcome, ToggleProtocol};
use crate::store::RelationshipStore;
use crate::types::{FlagStatus, RelationshipKey};

/// Drives optimistic toggles against the cache and the store.
pub struct ToggleController {
    cache: Arc<InteractionCache>,
    protocol: ToggleProtocol,
    identity: Arc<dyn IdentityProvider>,
    in_flight: DashSet<RelationshipKey>,
}

impl ToggleController {
    /// Create a controller over the given cache, store, and identity
    /// source.
    pub fn new(
        cache: Arc<InteractionCache>,
        store: Arc<dyn RelationshipStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            cache,
            protocol: ToggleProtocol::new(store),
            identity,
            in_flight: DashSet::new(),
        }
    }

    /// Toggle one relationship, optimistically.
    ///
    /// Anonymous callers are rejected with `Unauthenticated` before the
    /// cache or the store is touched. A toggle already in flight for the
    /// same key rejects with `Busy`.
    pub async fn toggle(
        &self,
        key: RelationshipKey,
    ) -> Result<ToggleOutcome, InteractionError> {
        if self.identity.current_user().is_none() {
            return Err(InteractionError::Unauthenticated);
        }

        // Test-and-set on the per-key guard; holds until settlement.
        if !self.in_flight.insert(key) {
            return Err(InteractionError::Busy);
        }

        let prior = self.cache.get(&key).value;
        self.cache.set(key, !prior, FlagStatus::Pending);

        let result = self.protocol.toggle(&key, prior).await;
        match &result {
            Ok(outcome) => {
                if outcome.final_state != !prior {
                    debug!(
                        "race resolved to the desired state, correcting local flag to {}",
                        outcome.final_state
                    );
                }
                self.cache.set(key, outcome.final_state, FlagStatus::Idle);
            }
            Err(err) => {
                error!("toggle failed, rolling back optimistic flip: {}", err);
                self.cache.set(key, prior, FlagStatus::Error);
            }
        }

        self.in_flight.remove(&key);
        result
    }

    /// Whether a toggle is currently in flight for the key.
    pub fn is_in_flight(&self, key: &RelationshipKey) -> bool {
        self.in_flight.contains(key)
    }
}

//! # Local Interaction Cache
//!
//! The single source of truth for what the UI currently believes about
//! the acting user's own relationships. Flags are flipped optimistically
//! by the reconciliation controller before the remote write settles, then
//! confirmed or rolled back when it does.
//!
//! ## Features
//!
//! - **Synchronous reads**: `get` never blocks on the network and never
//!   suspends; unknown keys read as absent and settled
//! - **Single writer**: only the controller mutates flags; any number of
//!   UI observers read concurrently
//! - **Bulk hydration**: replace every flag of one kind at once from a
//!   full scan of the user's edges, self-healing any prior drift
//! - **Session lifetime**: constructed at session start, cleared on logout
//!
//! Only the acting user's own edges live here; other users' relationships
//! are never cached.

use dashmap::DashMap;
use std::collections::HashSet;

use crate::types::{FlagStatus, LocalFlag, ObjectId, RelationshipKey, RelationshipKind, UserId};

/// Map of the acting user's relationship flags.
#[derive(Debug, Default)]
pub struct InteractionCache {
    flags: DashMap<RelationshipKey, LocalFlag>,
}

impl InteractionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the flag for a key. Keys never seen read as
    /// `{value: false, status: Idle}`.
    pub fn get(&self, key: &RelationshipKey) -> LocalFlag {
        self.flags.get(key).map(|f| *f).unwrap_or_default()
    }

    /// Write a flag. The reconciliation controller is the only caller.
    pub(crate) fn set(&self, key: RelationshipKey, value: bool, status: FlagStatus) {
        self.flags.insert(key, LocalFlag { value, status });
    }

    /// Replace every flag of `kind` with the given set of edges, all
    /// marked present and settled. A full overwrite, not a merge: objects
    /// absent from `objects` fall back to reading as absent.
    pub(crate) fn bulk_load(
        &self,
        subject: UserId,
        kind: RelationshipKind,
        objects: HashSet<ObjectId>,
    ) {
        self.flags.retain(|k, _| k.kind != kind);
        for object in objects {
            self.flags.insert(
                RelationshipKey {
                    subject,
                    object,
                    kind,
                },
                LocalFlag::settled(true),
            );
        }
    }

    /// Drop every flag. Logout path.
    pub fn clear(&self) {
        self.flags.clear();
    }

    /// Number of cached flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the cache holds no flags.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

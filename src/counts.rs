//! # Count Recomputation
//!
//! Derived counters (post like counts, follower counts) stay honest by
//! being recomputed from the store's row counts, never by applying
//! increments locally. Local deltas drift under concurrent writers the
//! cache never observes, and under rollback; a recount cannot.
//!
//! Counts are point-in-time snapshots. They are refreshed after a
//! successful toggle on the object, on bulk content reloads, and on
//! explicit request; between refreshes they may be stale but are never
//! wrong relative to their own refresh instant.

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

use crate::error::InteractionError;
use crate::store::RelationshipStore;
use crate::types::{DerivedCount, ObjectId, RelationshipKind, UserId};

/// Follower and following totals for one user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileCounts {
    /// Users following this user.
    pub followers: u64,
    /// Users this user follows.
    pub following: u64,
}

/// Addresses one cached counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CountKey {
    /// Rows whose object side matches: like counts, follower counts.
    Object {
        object: ObjectId,
        kind: RelationshipKind,
    },
    /// Rows whose subject side matches: following counts.
    Subject {
        subject: UserId,
        kind: RelationshipKind,
    },
}

/// Refreshes and caches derived counters.
pub struct CountTracker {
    store: Arc<dyn RelationshipStore>,
    counts: DashMap<CountKey, DerivedCount>,
}

impl CountTracker {
    /// Create a tracker over the given store.
    pub fn new(store: Arc<dyn RelationshipStore>) -> Self {
        Self {
            store,
            counts: DashMap::new(),
        }
    }

    /// Recount rows for `(object, kind)` against the store and cache the
    /// snapshot.
    pub async fn refresh(
        &self,
        object: ObjectId,
        kind: RelationshipKind,
    ) -> Result<u64, InteractionError> {
        let count = self
            .store
            .count_by_object(object, kind)
            .await
            .map_err(InteractionError::from_store)?;
        self.counts.insert(
            CountKey::Object { object, kind },
            DerivedCount {
                count,
                last_refreshed: Utc::now(),
            },
        );
        Ok(count)
    }

    /// Last snapshot for `(object, kind)`, if one was ever taken.
    pub fn get(&self, object: ObjectId, kind: RelationshipKind) -> Option<DerivedCount> {
        self.counts
            .get(&CountKey::Object { object, kind })
            .map(|c| *c)
    }

    /// Recount how many users `subject` follows.
    pub async fn refresh_following(&self, subject: UserId) -> Result<u64, InteractionError> {
        let count = self
            .store
            .count_by_subject(subject, RelationshipKind::Follow)
            .await
            .map_err(InteractionError::from_store)?;
        self.counts.insert(
            CountKey::Subject {
                subject,
                kind: RelationshipKind::Follow,
            },
            DerivedCount {
                count,
                last_refreshed: Utc::now(),
            },
        );
        Ok(count)
    }

    /// Last following-count snapshot for `subject`, if any.
    pub fn following(&self, subject: UserId) -> Option<DerivedCount> {
        self.counts
            .get(&CountKey::Subject {
                subject,
                kind: RelationshipKind::Follow,
            })
            .map(|c| *c)
    }

    /// Recount both sides of a user profile concurrently.
    pub async fn refresh_profile(&self, user: UserId) -> Result<ProfileCounts, InteractionError> {
        let (followers, following) = tokio::join!(
            self.refresh(ObjectId::from(user), RelationshipKind::Follow),
            self.refresh_following(user),
        );
        Ok(ProfileCounts {
            followers: followers?,
            following: following?,
        })
    }

    /// Drop every cached snapshot. Logout path.
    pub fn clear(&self) {
        self.counts.clear();
    }
}

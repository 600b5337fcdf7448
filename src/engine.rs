//! # Interaction Engine
//!
//! The facade the UI layer talks to. Owns the cache, the reconciliation
//! controller, and the count tracker around an injected store and identity
//! source, with an explicit session lifetime: construct at session start,
//! hydrate, then clear on sign-out.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use uuid::Uuid;
//! use pawfeed::engine::InteractionEngine;
//! use pawfeed::identity::SessionIdentity;
//! use pawfeed::store::MemoryStore;
//! use pawfeed::types::{ObjectId, RelationshipKey, RelationshipKind, UserId};
//!
//! # async fn example() -> Result<(), pawfeed::error::InteractionError> {
//! let user = UserId(Uuid::new_v4());
//! let engine = InteractionEngine::with_defaults(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(SessionIdentity::signed_in(user)),
//! );
//! engine.hydrate().await?;
//!
//! let post = ObjectId(Uuid::new_v4());
//! let key = RelationshipKey::post_like(user, post);
//! let outcome = engine.toggle(key).await?;
//! assert!(outcome.final_state);
//!
//! let likes = engine.count(post, RelationshipKind::PostLike);
//! # let _ = likes;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use tracing::warn;

use crate::cache::InteractionCache;
use crate::config::EngineConfig;
use crate::controller::ToggleController;
use crate::counts::{CountTracker, ProfileCounts};
use crate::error::InteractionError;
use crate::identity::IdentityProvider;
use crate::protocol::ToggleOutcome;
use crate::store::RelationshipStore;
use crate::types::{DerivedCount, LocalFlag, ObjectId, RelationshipKey, RelationshipKind, UserId};

/// Session-scoped interaction synchronization engine.
pub struct InteractionEngine {
    config: EngineConfig,
    store: Arc<dyn RelationshipStore>,
    identity: Arc<dyn IdentityProvider>,
    cache: Arc<InteractionCache>,
    controller: ToggleController,
    counts: CountTracker,
}

impl InteractionEngine {
    /// Create an engine over the given store and identity source.
    pub fn new(
        store: Arc<dyn RelationshipStore>,
        identity: Arc<dyn IdentityProvider>,
        config: EngineConfig,
    ) -> Self {
        let cache = Arc::new(InteractionCache::new());
        let controller = ToggleController::new(
            Arc::clone(&cache),
            Arc::clone(&store),
            Arc::clone(&identity),
        );
        let counts = CountTracker::new(Arc::clone(&store));
        Self {
            config,
            store,
            identity,
            cache,
            controller,
            counts,
        }
    }

    /// Create an engine with the default configuration.
    pub fn with_defaults(
        store: Arc<dyn RelationshipStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self::new(store, identity, EngineConfig::default())
    }

    /// Read the cached flag for a key. Synchronous; never touches the
    /// store.
    pub fn flag(&self, key: &RelationshipKey) -> LocalFlag {
        self.cache.get(key)
    }

    /// Toggle a relationship optimistically, then refresh the affected
    /// object's count when configured.
    pub async fn toggle(
        &self,
        key: RelationshipKey,
    ) -> Result<ToggleOutcome, InteractionError> {
        let outcome = self.controller.toggle(key).await?;

        if self.config.refresh_counts_after_toggle {
            if let Err(err) = self.counts.refresh(key.object, key.kind).await {
                warn!("count refresh after toggle failed: {}", err);
            }
        }
        Ok(outcome)
    }

    /// Last count snapshot for `(object, kind)`, if one was taken.
    pub fn count(&self, object: ObjectId, kind: RelationshipKind) -> Option<DerivedCount> {
        self.counts.get(object, kind)
    }

    /// Recount rows for `(object, kind)` against the store.
    pub async fn refresh_count(
        &self,
        object: ObjectId,
        kind: RelationshipKind,
    ) -> Result<u64, InteractionError> {
        self.counts.refresh(object, kind).await
    }

    /// Recount both sides of a user profile.
    pub async fn refresh_profile(
        &self,
        user: UserId,
    ) -> Result<ProfileCounts, InteractionError> {
        self.counts.refresh_profile(user).await
    }

    /// Replace every cached flag of `kind` from a full scan of the acting
    /// user's edges. Returns how many edges were loaded.
    pub async fn load_flags(&self, kind: RelationshipKind) -> Result<usize, InteractionError> {
        let user = self
            .identity
            .current_user()
            .ok_or(InteractionError::Unauthenticated)?;
        let objects = self
            .store
            .list_subject_edges(user, kind)
            .await
            .map_err(InteractionError::from_store)?;
        let loaded = objects.len();
        self.cache.bulk_load(user, kind, objects);
        Ok(loaded)
    }

    /// Hydrate every configured kind. Session-start path.
    pub async fn hydrate(&self) -> Result<(), InteractionError> {
        for kind in self.config.hydrate_kinds.clone() {
            self.load_flags(kind).await?;
        }
        Ok(())
    }

    /// Drop all cached flags and count snapshots. Sign-out path; the
    /// identity source itself is owned by the auth layer.
    pub fn sign_out(&self) {
        self.cache.clear();
        self.counts.clear();
    }

    /// The cache, for UI layers that want to observe it directly.
    pub fn cache(&self) -> &InteractionCache {
        &self.cache
    }
}

//! Shared helpers for the integration test suite.
#![allow(dead_code)]

use std::sync::Arc;
use uuid::Uuid;

use pawfeed::{
    InteractionEngine, MemoryStore, ObjectId, RelationshipStore, SessionIdentity, UserId,
};

/// Mint a fresh user id.
pub fn user() -> UserId {
    UserId(Uuid::new_v4())
}

/// Mint a fresh object id.
pub fn object() -> ObjectId {
    ObjectId(Uuid::new_v4())
}

/// An engine for `user` over the given instrumented store.
pub fn engine_for(user: UserId, store: &Arc<MemoryStore>) -> InteractionEngine {
    InteractionEngine::with_defaults(
        Arc::clone(store) as Arc<dyn RelationshipStore>,
        Arc::new(SessionIdentity::signed_in(user)),
    )
}

/// An engine with nobody signed in.
pub fn anonymous_engine(store: &Arc<MemoryStore>) -> InteractionEngine {
    InteractionEngine::with_defaults(
        Arc::clone(store) as Arc<dyn RelationshipStore>,
        Arc::new(SessionIdentity::anonymous()),
    )
}

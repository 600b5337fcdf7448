//! # Relationship Store
//!
//! The remote persistence collaborator: one table per relationship kind,
//! exposing row-level existence checks, inserts, deletes, and count
//! queries. The store offers no atomic toggle or upsert-if-absent; the
//! toggle protocol layers race absorption on top of this contract.
//!
//! Two implementations ship with the crate:
//!
//! - [`RestStore`] speaks PostgREST conventions over HTTP
//! - [`MemoryStore`] is an in-process store with scripted failure
//!   injection, used by the test suite and as a reference implementation

use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::StoreError;
use crate::types::{ObjectId, RelationshipKey, RelationshipKind, UserId};

pub mod memory;
pub mod rest;

pub use memory::{MemoryStore, StoreOp};
pub use rest::{RestConfig, RestStore};

/// Minimum contract the engine requires from the remote store.
///
/// Errors are structural: implementations map their native failures onto
/// [`StoreError`] variants at this boundary, so no caller ever inspects
/// error-message text.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// Whether a row exists for the key.
    async fn exists(&self, key: &RelationshipKey) -> Result<bool, StoreError>;

    /// Insert the row for the key.
    ///
    /// Returns [`StoreError::Conflict`] if a row for the same key already
    /// exists (including one inserted by a concurrent writer).
    async fn insert_edge(&self, key: &RelationshipKey) -> Result<(), StoreError>;

    /// Delete the row for the key.
    ///
    /// Returns [`StoreError::NotFound`] if no row matched (including one
    /// deleted by a concurrent writer).
    async fn delete_edge(&self, key: &RelationshipKey) -> Result<(), StoreError>;

    /// Count rows whose object side matches, across all subjects. Backs
    /// like counts and follower counts.
    async fn count_by_object(
        &self,
        object: ObjectId,
        kind: RelationshipKind,
    ) -> Result<u64, StoreError>;

    /// Count rows whose subject side matches, across all objects. Backs
    /// following counts.
    async fn count_by_subject(
        &self,
        subject: UserId,
        kind: RelationshipKind,
    ) -> Result<u64, StoreError>;

    /// All objects the subject has an edge of this kind to. Used for bulk
    /// cache hydration at session start.
    async fn list_subject_edges(
        &self,
        subject: UserId,
        kind: RelationshipKind,
    ) -> Result<HashSet<ObjectId>, StoreError>;
}

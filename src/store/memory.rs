//! # In-Memory Relationship Store
//!
//! An in-process [`RelationshipStore`] backed by a plain edge set. Used by
//! the test suite and as a reference implementation of the contract.
//!
//! ## Features
//!
//! - **Seeding**: insert edges directly, bypassing the contract, to
//!   simulate rows written by other users
//! - **Failure injection**: script the next result of any operation to
//!   simulate conflicts, races, permission failures, and outages
//! - **Call counting**: assert how many times each operation was issued
//! - **Holds**: park the next call of an operation until released, to
//!   exercise in-flight behavior deterministically

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;

use crate::error::StoreError;
use crate::types::{ObjectId, RelationshipKey, RelationshipKind, UserId};

use super::RelationshipStore;

/// One operation of the store contract, used to address scripted failures,
/// holds, and call counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// `exists`
    Exists,
    /// `insert_edge`
    Insert,
    /// `delete_edge`
    Delete,
    /// `count_by_object`
    CountByObject,
    /// `count_by_subject`
    CountBySubject,
    /// `list_subject_edges`
    List,
}

/// In-memory relationship store with test instrumentation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    edges: Mutex<HashSet<RelationshipKey>>,
    failures: Mutex<HashMap<StoreOp, VecDeque<StoreError>>>,
    holds: Mutex<HashMap<StoreOp, VecDeque<Arc<Notify>>>>,
    calls: Mutex<Vec<StoreOp>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge directly, bypassing the contract. Simulates rows
    /// written by other users or pre-existing session state.
    pub fn seed(&self, key: RelationshipKey) {
        self.edges
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key);
    }

    /// Whether the row currently exists, read without instrumentation.
    pub fn contains(&self, key: &RelationshipKey) -> bool {
        self.edges
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    /// Script the next invocation of `op` to fail with `error`. Scripted
    /// failures queue up and are consumed in order.
    pub fn fail_next(&self, op: StoreOp, error: StoreError) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(op)
            .or_default()
            .push_back(error);
    }

    /// Park the next invocation of `op` until the returned handle is
    /// notified. The call is counted only after release.
    pub fn hold_next(&self, op: StoreOp) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.holds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(op)
            .or_default()
            .push_back(Arc::clone(&gate));
        gate
    }

    /// How many times `op` has been issued against the store.
    pub fn calls(&self, op: StoreOp) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|&&c| c == op)
            .count()
    }

    fn take_failure(&self, op: StoreOp) -> Option<StoreError> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&op)
            .and_then(VecDeque::pop_front)
    }

    fn take_hold(&self, op: StoreOp) -> Option<Arc<Notify>> {
        self.holds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&op)
            .and_then(VecDeque::pop_front)
    }

    /// Await a scripted hold, then record the call and pop any scripted
    /// failure. Every contract method funnels through here.
    async fn enter(&self, op: StoreOp) -> Result<(), StoreError> {
        if let Some(gate) = self.take_hold(op) {
            gate.notified().await;
        }
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(op);
        match self.take_failure(op) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RelationshipStore for MemoryStore {
    async fn exists(&self, key: &RelationshipKey) -> Result<bool, StoreError> {
        self.enter(StoreOp::Exists).await?;
        Ok(self.contains(key))
    }

    async fn insert_edge(&self, key: &RelationshipKey) -> Result<(), StoreError> {
        self.enter(StoreOp::Insert).await?;
        let inserted = self
            .edges
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(*key);
        if inserted {
            Ok(())
        } else {
            Err(StoreError::Conflict)
        }
    }

    async fn delete_edge(&self, key: &RelationshipKey) -> Result<(), StoreError> {
        self.enter(StoreOp::Delete).await?;
        let removed = self
            .edges
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        if removed {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    async fn count_by_object(
        &self,
        object: ObjectId,
        kind: RelationshipKind,
    ) -> Result<u64, StoreError> {
        self.enter(StoreOp::CountByObject).await?;
        let count = self
            .edges
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|k| k.object == object && k.kind == kind)
            .count();
        Ok(count as u64)
    }

    async fn count_by_subject(
        &self,
        subject: UserId,
        kind: RelationshipKind,
    ) -> Result<u64, StoreError> {
        self.enter(StoreOp::CountBySubject).await?;
        let count = self
            .edges
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|k| k.subject == subject && k.kind == kind)
            .count();
        Ok(count as u64)
    }

    async fn list_subject_edges(
        &self,
        subject: UserId,
        kind: RelationshipKind,
    ) -> Result<HashSet<ObjectId>, StoreError> {
        self.enter(StoreOp::List).await?;
        let objects = self
            .edges
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|k| k.subject == subject && k.kind == kind)
            .map(|k| k.object)
            .collect();
        Ok(objects)
    }
}

//! Pawfeed Interaction Engine
//!
//! Optimistic interaction synchronization for a social-feed client: keeps
//! a local cache of "did-I-like/follow-this" flags and derived counters
//! consistent with a remote relational store, while giving the user
//! instantaneous feedback on toggle actions before the remote write
//! completes.
//!
//! # Overview
//!
//! The remote store holds one table per relationship kind (post likes,
//! comment likes, follows) and offers only row-level existence checks,
//! inserts, deletes, and counts. There is no atomic toggle, so every
//! toggle is a check-then-act race; this crate layers the policy that
//! makes those races safe:
//!
//! - **[`protocol`]** converts a toggle intent into an insert/delete
//!   sequence, absorbing races by treating "desired state already true"
//!   as success
//! - **[`cache`]** is what the UI reads: the acting user's own flags,
//!   flipped optimistically and confirmed or rolled back on settlement
//! - **[`controller`]** drives the state machine around each toggle and
//!   serializes toggles per key
//! - **[`counts`]** recomputes derived counters from row counts instead
//!   of trusting local increments, which drift under concurrent writers
//! - **[`engine`]** wires the pieces into a session-scoped facade
//!
//! # Error Handling
//!
//! Store implementations map their native failures onto [`error::StoreError`]
//! variants at the store boundary; the engine classifies those into
//! [`error::InteractionError`] exactly once. Race outcomes (duplicate
//! insert, missing delete) are absorbed before classification and never
//! surface as errors.
//!
//! # Concurrency
//!
//! Cooperative async execution; suspension points are exactly the remote
//! store calls. Toggles are serialized per relationship key and fully
//! concurrent across keys. The flag cache has a single logical writer and
//! any number of readers.

/// Local flag cache read by the UI.
pub mod cache;

/// Engine configuration.
pub mod config;

/// Optimistic reconciliation controller.
pub mod controller;

/// Derived count recomputation.
pub mod counts;

/// Session-scoped facade.
pub mod engine;

/// Error taxonomies for the store and engine boundaries.
pub mod error;

/// Acting-user identity collaborator.
pub mod identity;

/// Toggle protocol over the relationship store.
pub mod protocol;

/// Relationship store contract and implementations.
pub mod store;

/// Core data types.
pub mod types;

pub use cache::InteractionCache;
pub use config::EngineConfig;
pub use controller::ToggleController;
pub use counts::{CountTracker, ProfileCounts};
pub use engine::InteractionEngine;
pub use error::{InteractionError, StoreError};
pub use identity::{IdentityProvider, SessionIdentity};
pub use protocol::{ToggleOutcome, ToggleProtocol};
pub use store::{MemoryStore, RelationshipStore, RestConfig, RestStore};
pub use types::{
    DerivedCount, FlagStatus, LocalFlag, ObjectId, RelationshipKey, RelationshipKind, UserId,
};

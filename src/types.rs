//! Core data types for the interaction engine.
//!
//! A relationship is a directed edge from the acting user to a post, a
//! comment, or another user. Existence of the remote row *is* the boolean
//! state; there is no separate "liked" column anywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of the entity a relationship points at (post, comment, or
/// followed user). Opaque to the engine; owned by the content subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Followed users appear as the object of `Follow` edges.
impl From<UserId> for ObjectId {
    fn from(user: UserId) -> Self {
        ObjectId(user.0)
    }
}

/// The kind of relationship edge.
///
/// Each kind maps to one remote table with a `(subject, object)` column
/// pair; the mapping mirrors the backing schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    /// The acting user likes a post (`likes` table).
    PostLike,
    /// The acting user likes a comment (`comment_likes` table).
    CommentLike,
    /// The acting user follows another user (`follows` table).
    Follow,
}

impl RelationshipKind {
    /// All kinds, in hydration order.
    pub const ALL: [RelationshipKind; 3] = [
        RelationshipKind::PostLike,
        RelationshipKind::CommentLike,
        RelationshipKind::Follow,
    ];

    /// Remote table holding this kind of edge.
    pub fn table(&self) -> &'static str {
        match self {
            RelationshipKind::PostLike => "likes",
            RelationshipKind::CommentLike => "comment_likes",
            RelationshipKind::Follow => "follows",
        }
    }

    /// Column identifying the acting user.
    pub fn subject_column(&self) -> &'static str {
        match self {
            RelationshipKind::PostLike | RelationshipKind::CommentLike => "user_id",
            RelationshipKind::Follow => "follower_id",
        }
    }

    /// Column identifying the target entity.
    pub fn object_column(&self) -> &'static str {
        match self {
            RelationshipKind::PostLike => "post_id",
            RelationshipKind::CommentLike => "comment_id",
            RelationshipKind::Follow => "following_id",
        }
    }
}

/// One relationship edge, unique per `(subject, object, kind)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipKey {
    /// The acting user.
    pub subject: UserId,
    /// The post, comment, or user being acted on.
    pub object: ObjectId,
    /// Which table the edge lives in.
    pub kind: RelationshipKind,
}

impl RelationshipKey {
    /// Key for the acting user liking a post.
    pub fn post_like(subject: UserId, post: ObjectId) -> Self {
        Self {
            subject,
            object: post,
            kind: RelationshipKind::PostLike,
        }
    }

    /// Key for the acting user liking a comment.
    pub fn comment_like(subject: UserId, comment: ObjectId) -> Self {
        Self {
            subject,
            object: comment,
            kind: RelationshipKind::CommentLike,
        }
    }

    /// Key for the acting user following another user.
    pub fn follow(subject: UserId, followee: UserId) -> Self {
        Self {
            subject,
            object: followee.into(),
            kind: RelationshipKind::Follow,
        }
    }
}

/// Settlement status of a locally cached flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlagStatus {
    /// No toggle in flight; the value is settled.
    #[default]
    Idle,
    /// A toggle was applied optimistically and is awaiting the remote result.
    Pending,
    /// The last toggle failed and the value was rolled back.
    Error,
}

/// The acting user's cached belief about one relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalFlag {
    /// Whether the relationship currently exists, as far as the UI knows.
    pub value: bool,
    /// Settlement status of the value.
    pub status: FlagStatus,
}

impl LocalFlag {
    /// A settled flag with the given value.
    pub fn settled(value: bool) -> Self {
        Self {
            value,
            status: FlagStatus::Idle,
        }
    }
}

/// A point-in-time snapshot of a remote row count.
///
/// Counts are recomputed by querying the store, never maintained by
/// incrementing local state. A snapshot may be stale, but it is always
/// exact for the instant it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedCount {
    /// Row count at the time of the last refresh.
    pub count: u64,
    /// When the count was last recomputed.
    pub last_refreshed: DateTime<Utc>,
}

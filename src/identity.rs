//! Identity collaborator.
//!
//! The engine never authenticates anyone; it only asks who the acting
//! user is. Toggles and hydration on behalf of an anonymous caller are
//! rejected before any remote call is made.

use std::sync::{PoisonError, RwLock};

use crate::types::UserId;

/// Supplies the acting user's identity.
pub trait IdentityProvider: Send + Sync {
    /// The currently authenticated user, if any.
    fn current_user(&self) -> Option<UserId>;
}

/// Session-scoped identity holder.
///
/// Set by the auth layer at sign-in and cleared at sign-out; the engine
/// only ever reads it.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    user: RwLock<Option<UserId>>,
}

impl SessionIdentity {
    /// An identity with nobody signed in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An identity with `user` already signed in.
    pub fn signed_in(user: UserId) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    /// Record a sign-in.
    pub fn sign_in(&self, user: UserId) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    /// Record a sign-out.
    pub fn sign_out(&self) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> Option<UserId> {
        *self.user.read().unwrap_or_else(PoisonError::into_inner)
    }
}

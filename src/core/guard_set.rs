//! # Guard Set
//!
//! Per-actor re-entrancy protection for bulk mining operations.
//!
//! A bulk break can trigger further break events on the world thread (a block
//! update that cascades into another break trigger for the same actor). Without a
//! guard, that nested trigger would re-enter the execution engine before the
//! first batch finished. The guard set records which actors currently have a batch
//! in flight.
//!
//! Membership is acquired through [`ActorGuardSet::try_acquire`], which hands out a
//! [`GuardToken`]. Dropping the token releases membership, so release happens on
//! every exit path: normal return, early `?` return, and unwinding.

use std::collections::HashSet;

use crate::mining::actor::ActorId;

use super::MtResource;

/// The set of actors with a bulk operation in flight.
///
/// Cloning shares the underlying set.
#[derive(Clone, Default)]
pub struct ActorGuardSet {
    in_flight: MtResource<HashSet<ActorId>>,
}

impl ActorGuardSet {
    /// Creates an empty guard set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to mark `actor` as in flight.
    ///
    /// # Returns
    /// `Some(GuardToken)` if the actor was not already guarded, `None` otherwise.
    pub fn try_acquire(&self, actor: ActorId) -> Option<GuardToken> {
        if self.in_flight.get_mut().insert(actor) {
            Some(GuardToken {
                set: self.clone(),
                actor,
            })
        } else {
            None
        }
    }

    /// Returns `true` while `actor` holds a guard token.
    pub fn is_held(&self, actor: ActorId) -> bool {
        self.in_flight.get().contains(&actor)
    }

    /// Number of actors currently in flight.
    pub fn len(&self) -> usize {
        self.in_flight.get().len()
    }

    /// Returns `true` if no actor is in flight.
    pub fn is_empty(&self) -> bool {
        self.in_flight.get().is_empty()
    }

    fn release(&self, actor: ActorId) {
        self.in_flight.get_mut().remove(&actor);
    }
}

/// Scoped membership in an [`ActorGuardSet`].
///
/// Released when dropped.
#[must_use = "dropping the token releases the guard immediately"]
pub struct GuardToken {
    set: ActorGuardSet,
    actor: ActorId,
}

impl GuardToken {
    /// The actor this token guards.
    pub fn actor(&self) -> ActorId {
        self.actor
    }
}

impl Drop for GuardToken {
    fn drop(&mut self) {
        self.set.release(self.actor);
    }
}

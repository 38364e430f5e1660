//! # Selection Session
//!
//! Per-actor mining state: whether vein mining is armed and which shape is
//! selected. Sessions are created lazily with defaults the first time an actor is
//! seen and live until the surrounding connection lifecycle calls
//! [`SessionStore::evict`]. Nothing expires on its own.
//!
//! The store also owns the per-actor in-progress guard. It lives in a separate
//! [`ActorGuardSet`] rather than inside the session record, so a guard can be
//! tested and released without touching selection state.

use std::collections::HashMap;

use log::debug;

use crate::config::MiningConfig;
use crate::core::{ActorGuardSet, GuardToken, MtResource};

use super::actor::ActorId;
use super::protocol::ShapeSelect;
use super::shape::ShapeKind;

/// Shape selection with depth and length always at least 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SelectionParameters {
    shape_kind: ShapeKind,
    depth: u32,
    length: u32,
}

impl SelectionParameters {
    /// Parameters for `shape_kind` at its documented defaults.
    pub fn new(shape_kind: ShapeKind) -> Self {
        let defaults = shape_kind.defaults();
        SelectionParameters {
            shape_kind,
            depth: defaults.depth,
            length: defaults.length,
        }
    }

    /// Selected shape.
    pub fn shape_kind(&self) -> ShapeKind {
        self.shape_kind
    }

    /// Layers or steps.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Line length.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Switches shape. Switching to a different kind resets depth and length to
    /// that kind's defaults; re-selecting the current kind keeps them.
    pub fn select_shape(&mut self, shape_kind: ShapeKind) {
        if shape_kind != self.shape_kind {
            *self = SelectionParameters::new(shape_kind);
        }
    }

    /// Sets depth, clamped to at least 1.
    pub fn set_depth(&mut self, depth: i64) {
        self.depth = clamp_positive(depth, u32::MAX);
    }

    /// Sets length, clamped to at least 1.
    pub fn set_length(&mut self, length: i64) {
        self.length = clamp_positive(length, u32::MAX);
    }

    /// Applies upper caps to depth and length.
    pub fn cap(&mut self, max_depth: u32, max_length: u32) {
        self.depth = self.depth.min(max_depth.max(1));
        self.length = self.length.min(max_length.max(1));
    }

    /// Whether these parameters can drive a shape computation.
    ///
    /// Always true for values built through this type; checked anyway at the
    /// trust boundary in the preview pipeline.
    pub fn is_valid(&self) -> bool {
        self.depth >= 1 && self.length >= 1
    }
}

impl Default for SelectionParameters {
    fn default() -> Self {
        SelectionParameters::new(ShapeKind::Legacy)
    }
}

fn clamp_positive(value: i64, max: u32) -> u32 {
    value.clamp(1, max as i64) as u32
}

/// One actor's mining state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ActorSession {
    /// Vein mining armed: break triggers expand by connectivity.
    pub activated: bool,
    /// Current shape selection.
    pub parameters: SelectionParameters,
}

/// Concurrency-safe map of actor sessions plus their in-progress guards.
///
/// Cloning shares the underlying state, so connection threads and the world
/// thread can each hold a handle.
#[derive(Clone)]
pub struct SessionStore {
    sessions: MtResource<HashMap<ActorId, ActorSession>>,
    guards: ActorGuardSet,
    max_depth: u32,
    max_length: u32,
}

impl SessionStore {
    /// Creates an empty store using the caps from `config`.
    pub fn new(config: &MiningConfig) -> Self {
        SessionStore {
            sessions: MtResource::new(HashMap::new()),
            guards: ActorGuardSet::new(),
            max_depth: config.max_depth,
            max_length: config.max_length,
        }
    }

    /// Snapshot of an actor's session, creating it with defaults if absent.
    pub fn session(&self, actor: ActorId) -> ActorSession {
        *self.sessions.get_mut().entry(actor).or_default()
    }

    /// Runs `update` on an actor's session, creating it first if absent.
    pub fn update<R>(&self, actor: ActorId, update: impl FnOnce(&mut ActorSession) -> R) -> R {
        let mut sessions = self.sessions.get_mut();
        update(sessions.entry(actor).or_default())
    }

    /// Sets the vein-mining activation flag.
    pub fn set_activated(&self, actor: ActorId, activated: bool) {
        self.update(actor, |session| session.activated = activated);
        debug!("actor {:?} vein mining active: {}", actor, activated);
    }

    /// Applies a shape selection message.
    ///
    /// The shape switch happens first (resetting to defaults when the kind
    /// changes), then the supplied depth and length are clamped and stored.
    ///
    /// # Returns
    /// The stored parameters.
    pub fn apply_shape_select(&self, actor: ActorId, select: &ShapeSelect) -> SelectionParameters {
        let (max_depth, max_length) = (self.max_depth, self.max_length);
        let parameters = self.update(actor, |session| {
            let parameters = &mut session.parameters;
            parameters.select_shape(select.shape_kind);
            parameters.set_depth(select.depth);
            parameters.set_length(select.length);
            parameters.cap(max_depth, max_length);
            *parameters
        });
        debug!("actor {:?} selected {:?}", actor, parameters);
        parameters
    }

    /// Forgets an actor. Called by the connection lifecycle on disconnect.
    pub fn evict(&self, actor: ActorId) {
        self.sessions.get_mut().remove(&actor);
    }

    /// Whether the store currently holds a session for `actor`.
    pub fn contains(&self, actor: ActorId) -> bool {
        self.sessions.get().contains_key(&actor)
    }

    /// Claims the in-progress guard for `actor`.
    ///
    /// # Returns
    /// `None` while another bulk operation for the same actor is in flight.
    pub fn try_begin(&self, actor: ActorId) -> Option<GuardToken> {
        self.guards.try_acquire(actor)
    }

    /// Whether a bulk operation for `actor` is in flight.
    pub fn is_in_progress(&self, actor: ActorId) -> bool {
        self.guards.is_held(actor)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::new(&MiningConfig::default())
    }
}

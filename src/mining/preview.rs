//! # Preview Pipeline
//!
//! Answers "what would break if I broke this cell now?" without changing the
//! world. The server computes previews on demand from a [`TargetRequest`]; the
//! client can compute a speculative one from its own cache so highlights appear
//! before the server replies.
//!
//! Both paths run the same derivation, so a preview matches the set the
//! [`ExecutionEngine`](super::execution::ExecutionEngine) would use when the
//! observed contents agree.

use cgmath::Point3;
use log::trace;

use crate::config::MiningConfig;
use crate::voxels::client_cache::ClientWorldCache;
use crate::voxels::world::BlockView;

use super::actor::ActorContext;
use super::connectivity::vein_targets;
use super::execution::{breakable_by, shape_targets};
use super::protocol::{PreviewResult, TargetRequest};
use super::session::{ActorSession, SessionStore};
use super::shape::ShapeKind;

/// Derives preview sets from the authoritative world.
#[derive(Clone)]
pub struct PreviewPipeline {
    sessions: SessionStore,
    config: MiningConfig,
}

impl PreviewPipeline {
    /// Creates a pipeline reading selections from `sessions`.
    pub fn new(sessions: SessionStore, config: MiningConfig) -> Self {
        PreviewPipeline { sessions, config }
    }

    /// Cells a break at the requested target would affect.
    ///
    /// Empty when the actor has not armed bulk mining, the target is unknown or
    /// empty, or the actor could not break the target itself.
    pub fn preview(
        &self,
        world: &impl BlockView,
        actor: &ActorContext,
        request: &TargetRequest,
    ) -> PreviewResult {
        let session = self.sessions.session(actor.id);
        let positions = derive_preview(world, &session, actor, request, self.config.vein_budget);
        trace!(
            "preview for {:?} at {:?}: {} cells",
            actor.id,
            request.target_position,
            positions.len()
        );
        PreviewResult { positions }
    }
}

/// Client-side preview over the local cache.
///
/// Uses the session the client believes it has. Chunks missing from the cache
/// read as unknown, so the result may be smaller than the server's.
pub fn speculative_preview(
    cache: &ClientWorldCache,
    session: &ActorSession,
    actor: &ActorContext,
    request: &TargetRequest,
    vein_budget: usize,
) -> PreviewResult {
    PreviewResult {
        positions: derive_preview(cache, session, actor, request, vein_budget),
    }
}

fn derive_preview(
    view: &impl BlockView,
    session: &ActorSession,
    actor: &ActorContext,
    request: &TargetRequest,
    vein_budget: usize,
) -> Vec<Point3<i32>> {
    if !session.activated || !session.parameters.is_valid() {
        return Vec::new();
    }

    let target = request.target_position;
    let Some(contents) = view.block_at(target) else {
        return Vec::new();
    };
    if !breakable_by(actor, &contents) {
        return Vec::new();
    }

    match session.parameters.shape_kind() {
        ShapeKind::Legacy => vein_targets(view, target, contents, vein_budget),
        _ => shape_targets(view, actor, &session.parameters, target, request.clicked_face),
    }
}

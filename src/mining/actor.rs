//! # Actor Context
//!
//! What the mining pipeline needs to know about the actor behind a request: who
//! they are, where they look, which tool they hold, and whether they play under
//! unrestricted (creative) rules. The surrounding game owns actors; it hands the
//! pipeline an `ActorContext` snapshot with every request.

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::voxels::block::block_type::{HarvestRequirement, ToolKind};
use crate::voxels::block::Block;

/// Stable identity of an actor for the lifetime of its connection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

/// Rule set the actor plays under.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Tool requirements apply.
    #[default]
    Survival,
    /// Tool requirements are bypassed.
    Creative,
}

/// A held tool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool family.
    pub kind: ToolKind,
    /// Material tier: 0 wood/stone, 1 iron, 2 diamond.
    pub tier: u8,
}

/// Snapshot of an actor taken when a request is handled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorContext {
    /// Actor identity.
    pub id: ActorId,
    /// View direction. Need not be normalized.
    pub look: Vector3<f64>,
    /// Rule set.
    pub mode: GameMode,
    /// Held tool, `None` for an empty hand.
    pub tool: Option<Tool>,
}

impl ActorContext {
    /// A survival actor with an empty hand looking along +X.
    pub fn new(id: ActorId) -> Self {
        ActorContext {
            id,
            look: Vector3::new(1.0, 0.0, 0.0),
            mode: GameMode::Survival,
            tool: None,
        }
    }

    /// Returns `true` under creative rules.
    pub fn is_unrestricted(&self) -> bool {
        self.mode == GameMode::Creative
    }

    /// Whether this actor may legally break `block` with what they hold.
    ///
    /// Creative actors can break anything; others need a tool that meets the
    /// block's harvest requirement.
    pub fn can_harvest(&self, block: &Block) -> bool {
        if self.is_unrestricted() {
            return true;
        }
        match block.harvest_requirement() {
            HarvestRequirement::Any => true,
            HarvestRequirement::Tool { kind, min_tier } => self
                .tool
                .is_some_and(|tool| tool.kind == kind && tool.tier >= min_tier),
        }
    }
}

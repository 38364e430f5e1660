//! # Protocol
//!
//! Messages exchanged between a client and the mining server. These are the
//! logical payloads only; framing and wire encoding belong to the network layer.
//! All types derive serde so that layer can pick any format.

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use super::shape::ShapeKind;
use crate::voxels::block::facing::Facing;
use crate::voxels::block::Block;

/// Asks the server which cells a break at `target_position` would affect.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRequest {
    /// Cell under the actor's crosshair.
    pub target_position: Point3<i32>,
    /// Face of that cell the actor is looking at.
    pub clicked_face: Facing,
}

/// Selects a shape. Depth and length are clamped before storage, so any value
/// is accepted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeSelect {
    /// New shape.
    pub shape_kind: ShapeKind,
    /// Requested depth.
    pub depth: i64,
    /// Requested length.
    pub length: i64,
}

/// Arms or disarms vein mining.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationToggle {
    /// `true` while the trigger is held.
    pub is_active: bool,
}

/// Asks the server to break `origin_position`, which the client saw holding
/// `origin_contents`. The server checks the claim against its own world before
/// breaking anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakTrigger {
    /// Cell the actor broke.
    pub origin_position: Point3<i32>,
    /// What the cell held.
    pub origin_contents: Block,
    /// Face the actor struck. Only shape breaks read it.
    #[serde(default = "default_face")]
    pub clicked_face: Facing,
}

fn default_face() -> Facing {
    Facing::Up
}

/// Client-to-server messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inbound {
    /// Preview request.
    Target(TargetRequest),
    /// Shape selection.
    Select(ShapeSelect),
    /// Vein-mining activation.
    Activation(ActivationToggle),
    /// Break notification.
    Break(BreakTrigger),
}

/// Cells the display layer should highlight.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResult {
    /// Affected cells in break order. Empty when nothing would happen.
    pub positions: Vec<Point3<i32>>,
}

/// Outcome of a bulk break, for reward and XP collaborators.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// All preconditions held and no break failed.
    pub success: bool,
    /// Non-empty cells actually broken.
    pub cells_broken: usize,
    /// Cells in the computed target set.
    pub cells_requested: usize,
}

/// Server-to-client messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outbound {
    /// Reply to [`Inbound::Target`].
    Preview(PreviewResult),
    /// Reply to [`Inbound::Break`].
    Execution(ExecutionResult),
}

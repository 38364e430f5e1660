//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world along with
//! the static properties the mining pipeline consults: hardness and the tool needed
//! to harvest them.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::BlockTypeSize;

/// Hardness value marking a block as unbreakable.
///
/// Any negative hardness is treated the same way.
pub const UNBREAKABLE_HARDNESS: f32 = -1.0;

/// Enumerates all possible block types in the voxel world.
///
/// The `FromPrimitive` derive allows conversion from the compact id stored in
/// chunk snapshots.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize)]
pub enum BlockType {
    /// Empty space. The "nothing" contents of a cell.
    Air,
    /// Loose soil.
    Dirt,
    /// Soil with a grass top.
    Grass,
    /// Common rock.
    Stone,
    /// Tree trunk.
    Wood,
    /// Coal-bearing rock.
    CoalOre,
    /// Iron-bearing rock.
    IronOre,
    /// Diamond-bearing rock.
    DiamondOre,
    /// World floor. Cannot be broken.
    Bedrock,
}

/// Families of tools an actor can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    /// Rock and ore.
    Pickaxe,
    /// Soil.
    Shovel,
    /// Wood.
    Axe,
}

/// What an actor must hold to harvest a block type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HarvestRequirement {
    /// Anything, including an empty hand.
    Any,
    /// A tool of the given kind with at least the given tier.
    Tool {
        /// Required tool family.
        kind: ToolKind,
        /// Minimum tool tier.
        min_tier: u8,
    },
}

impl BlockType {
    /// Converts a compact block id into a `BlockType`.
    ///
    /// # Returns
    /// `None` if `id` does not name a block type.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(id)
    }

    /// The compact id used for storage.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Mining hardness. Negative values mean unbreakable.
    pub fn hardness(self) -> f32 {
        match self {
            BlockType::Air => 0.0,
            BlockType::Dirt => 0.5,
            BlockType::Grass => 0.6,
            BlockType::Stone => 1.5,
            BlockType::Wood => 2.0,
            BlockType::CoalOre | BlockType::IronOre | BlockType::DiamondOre => 3.0,
            BlockType::Bedrock => UNBREAKABLE_HARDNESS,
        }
    }

    /// The tool requirement for harvesting this block type.
    pub fn harvest_requirement(self) -> HarvestRequirement {
        match self {
            BlockType::Stone | BlockType::CoalOre => HarvestRequirement::Tool {
                kind: ToolKind::Pickaxe,
                min_tier: 0,
            },
            BlockType::IronOre => HarvestRequirement::Tool {
                kind: ToolKind::Pickaxe,
                min_tier: 1,
            },
            BlockType::DiamondOre => HarvestRequirement::Tool {
                kind: ToolKind::Pickaxe,
                min_tier: 2,
            },
            BlockType::Air
            | BlockType::Dirt
            | BlockType::Grass
            | BlockType::Wood
            | BlockType::Bedrock => HarvestRequirement::Any,
        }
    }

    /// Returns `true` for the ore types.
    pub fn is_ore(self) -> bool {
        matches!(
            self,
            BlockType::CoalOre | BlockType::IronOre | BlockType::DiamondOre
        )
    }

    /// Picks a random ore type, weighted toward the common ores.
    ///
    /// Used by terrain generation when seeding veins.
    pub fn random_ore(rng: &mut fastrand::Rng) -> Self {
        match rng.u8(0..10) {
            0 => BlockType::DiamondOre,
            1..=3 => BlockType::IronOre,
            _ => BlockType::CoalOre,
        }
    }
}

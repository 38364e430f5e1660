//! # Block Module
//!
//! Cell contents and block faces. A [`Block`] is the opaque, equality-comparable
//! snapshot of what occupies a cell; the mining pipeline only ever compares blocks
//! for equality and reads their static properties.

use block_type::{BlockType, HarvestRequirement};
use serde::{Deserialize, Serialize};

pub mod block_type;
pub mod facing;

/// The underlying integer type used to represent block types in storage.
pub type BlockTypeSize = u8;

/// Represents the contents of a single voxel cell.
///
/// Two blocks are equal only when both the type and the variant match, so visually
/// distinct variants of one type (log orientation, ore richness) never merge during
/// connectivity search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    /// The type of this block.
    pub block_type: BlockType,
    /// Type-specific variant. `0` is the plain variant.
    pub variant: u8,
}

impl Block {
    /// Empty space.
    pub const AIR: Block = Block {
        block_type: BlockType::Air,
        variant: 0,
    };

    /// Creates the plain variant of a block type.
    pub const fn new(block_type: BlockType) -> Self {
        Block {
            block_type,
            variant: 0,
        }
    }

    /// Creates a specific variant of a block type.
    pub const fn with_variant(block_type: BlockType, variant: u8) -> Self {
        Block {
            block_type,
            variant,
        }
    }

    /// Returns `true` for empty space.
    pub fn is_air(&self) -> bool {
        self.block_type == BlockType::Air
    }

    /// Returns `true` when the block can never be broken.
    pub fn is_unbreakable(&self) -> bool {
        self.block_type.hardness() < 0.0
    }

    /// The tool requirement for harvesting this block.
    pub fn harvest_requirement(&self) -> HarvestRequirement {
        self.block_type.harvest_requirement()
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::AIR
    }
}

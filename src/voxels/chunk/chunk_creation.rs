//! # Chunk Creation Module
//!
//! A builder that fills a chunk cell by cell while maintaining the relationship
//! between the solidity bit vector and the compact block storage.

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::voxels::block::Block;

use super::{Chunk, CHUNK_SIZE};

/// Builds a [`Chunk`] from blocks pushed in cell order (x, then y, then z).
///
/// Cells not pushed by the time [`ChunkBuilder::finish`] is called are air.
pub struct ChunkBuilder {
    /// Chunk coordinates of the chunk being created
    position: Point3<i32>,
    /// One bit per pushed cell, set for non-air blocks
    solid_array: BitVec,
    /// Only the non-air blocks, in push order
    blocks: Vec<Block>,
}

impl ChunkBuilder {
    /// Creates a builder for a chunk at the given chunk coordinates.
    pub fn new(position: Point3<i32>) -> Self {
        ChunkBuilder {
            position,
            solid_array: BitVec::with_capacity(CHUNK_SIZE as usize),
            blocks: Vec::new(),
        }
    }

    /// Appends the next cell.
    ///
    /// Pushes beyond the chunk's cell count are ignored.
    pub fn push_block(&mut self, block: Block) {
        if self.solid_array.len() >= CHUNK_SIZE as usize {
            return;
        }

        let is_solid = !block.is_air();
        self.solid_array.push(is_solid);

        // Only store non-air blocks to save memory
        if is_solid {
            self.blocks.push(block);
        }
    }

    /// Finalizes the chunk, padding any cells not pushed with air.
    pub fn finish(mut self) -> Chunk {
        self.solid_array.resize(CHUNK_SIZE as usize, false);
        Chunk {
            position: self.position,
            solid_array: self.solid_array,
            blocks: self.blocks,
        }
    }
}

//! # Chunk Module
//!
//! This module provides the `Chunk` struct for managing 16x16x16 blocks of voxel
//! data, together with its generators and the compact snapshot format chunks are
//! shipped to clients in.
//!
//! ## Memory Optimization
//!
//! Chunks use a memory-efficient storage strategy:
//! - `solid_array`: A bit vector (1 bit per cell) indicating which cells are non-air
//! - `blocks`: A vector containing only the non-air blocks, in cell order
//!
//! The index of a block in `blocks` equals the number of set bits before its cell
//! in `solid_array` (its rank).
//!
//! ### Performance Characteristics
//! - **Air Check**: O(1) - Just check the bit in `solid_array`
//! - **Block Lookup**: O(n) - Requires counting set bits up to the target cell
//! - **Block Update**: O(n) - Insertion or removal in `blocks` shifts later entries

use bitvec::prelude::BitVec;
use cgmath::Point3;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::block::block_type::BlockType;
use super::block::{Block, BlockTypeSize};
use crate::error::WorldError;

mod chunk_creation;

pub use chunk_creation::ChunkBuilder;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Threshold above which Perlin noise is considered solid for terrain generation.
pub const PERLIN_POSITIVE_THRESHOLD: f64 = 0.2;
/// Threshold below which Perlin noise is considered empty for terrain generation.
pub const PERLIN_NEGATIVE_THRESHOLD: f64 = -0.2;
/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;
/// Chance that a solid Perlin cell seeds ore instead of stone.
pub const ORE_CHANCE: f64 = 0.04;
/// World y at or below which every cell is bedrock.
pub const BEDROCK_LEVEL: i32 = -64;

/// Represents a 16x16x16 collection of voxel blocks in the world.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,

    /// One bit per cell, set for non-air cells. Cells are ordered x, then y, then z.
    solid_array: BitVec,

    /// The non-air blocks of this chunk, ordered by cell index.
    blocks: Vec<Block>,
}

/// A dense, serializable copy of a chunk's contents.
///
/// Block types travel as their compact ids so a client can reject ids it does not
/// know instead of silently misreading them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSnapshot {
    /// Chunk coordinates.
    pub position: Point3<i32>,
    /// `(block id, variant)` per cell, in cell order.
    pub cells: Vec<(BlockTypeSize, u8)>,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn empty(position: &Point3<i32>) -> Self {
        Self::filled(position, Block::AIR)
    }

    /// Creates a new chunk where every cell holds `block`.
    pub fn filled(position: &Point3<i32>, block: Block) -> Self {
        let mut builder = ChunkBuilder::new(*position);
        for _ in 0..CHUNK_SIZE {
            builder.push_block(block);
        }
        builder.finish()
    }

    /// Generates a chunk using Perlin noise for natural-looking terrain.
    ///
    /// Solid cells are stone, with a small chance of seeding ore; cells at or below
    /// [`BEDROCK_LEVEL`] are bedrock. The same `seed` and `position` always produce
    /// the same chunk.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates where the chunk will be placed
    /// * `seed` - Seed for both the noise field and ore placement
    pub fn perlin(position: &Point3<i32>, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        let mut rng = fastrand::Rng::with_seed(Self::ore_seed(position, seed));

        Self::from_fn(position, |world| {
            if world.y <= BEDROCK_LEVEL {
                return Block::new(BlockType::Bedrock);
            }
            let sample = perlin.get(Self::to_perlin_pos(world, PERLIN_SCALE_FACTOR));
            if (PERLIN_NEGATIVE_THRESHOLD..=PERLIN_POSITIVE_THRESHOLD).contains(&sample) {
                Block::AIR
            } else if rng.f64() < ORE_CHANCE {
                Block::new(BlockType::random_ore(&mut rng))
            } else {
                Block::new(BlockType::Stone)
            }
        })
    }

    /// Builds a chunk by evaluating `block_for` at every cell's world position.
    pub fn from_fn(position: &Point3<i32>, mut block_for: impl FnMut(Point3<i32>) -> Block) -> Self {
        let mut builder = ChunkBuilder::new(*position);
        for k in 0..CHUNK_DIMENSION {
            for j in 0..CHUNK_DIMENSION {
                for i in 0..CHUNK_DIMENSION {
                    let world = Point3::new(
                        i + CHUNK_DIMENSION * position.x,
                        j + CHUNK_DIMENSION * position.y,
                        k + CHUNK_DIMENSION * position.z,
                    );
                    builder.push_block(block_for(world));
                }
            }
        }
        builder.finish()
    }

    /// Rebuilds a chunk from a snapshot.
    ///
    /// # Errors
    /// [`WorldError::UnknownBlockId`] if a cell carries an id with no block type.
    /// Snapshots with the wrong number of cells are padded with air or truncated.
    pub fn from_snapshot(snapshot: &ChunkSnapshot) -> Result<Self, WorldError> {
        let mut builder = ChunkBuilder::new(snapshot.position);
        for index in 0..CHUNK_SIZE as usize {
            let block = match snapshot.cells.get(index) {
                Some(&(id, variant)) => {
                    let block_type =
                        BlockType::from_id(id).ok_or(WorldError::UnknownBlockId(id))?;
                    Block::with_variant(block_type, variant)
                }
                None => Block::AIR,
            };
            builder.push_block(block);
        }
        Ok(builder.finish())
    }

    /// Produces the dense snapshot of this chunk.
    pub fn snapshot(&self) -> ChunkSnapshot {
        let mut cells = Vec::with_capacity(CHUNK_SIZE as usize);
        let mut rank = 0;
        for bit in self.solid_array.iter().by_vals() {
            if bit {
                let block = self.blocks[rank];
                cells.push((block.block_type.id(), block.variant));
                rank += 1;
            } else {
                cells.push((BlockType::Air.id(), 0));
            }
        }
        ChunkSnapshot {
            position: self.position,
            cells,
        }
    }

    fn ore_seed(position: &Point3<i32>, seed: u32) -> u64 {
        let mix = |v: i32| v as u32 as u64;
        (seed as u64)
            ^ mix(position.x).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ mix(position.y).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
            ^ mix(position.z).wrapping_mul(0x1656_67B1_9E37_79F9)
    }

    /// Converts world coordinates to Perlin sample coordinates.
    fn to_perlin_pos(pos: Point3<i32>, scale_factor: f64) -> [f64; 3] {
        [
            (pos.x as f64 * scale_factor),
            (pos.y as f64 * scale_factor),
            (pos.z as f64 * scale_factor),
        ]
    }

    fn cell_index(local: Point3<usize>) -> usize {
        local.x + CHUNK_DIMENSION as usize * local.y + CHUNK_PLANE_SIZE as usize * local.z
    }

    fn rank(&self, index: usize) -> usize {
        self.solid_array[..index].count_ones()
    }

    /// Checks if the cell at the specified chunk-relative coordinates is non-air.
    pub fn is_block_solid(&self, local: Point3<usize>) -> bool {
        self.solid_array[Self::cell_index(local)]
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// # Panics
    /// Panics if a coordinate is outside `0..CHUNK_DIMENSION`.
    pub fn get_block_at(&self, local: Point3<usize>) -> Block {
        let index = Self::cell_index(local);
        if self.solid_array[index] {
            self.blocks[self.rank(index)]
        } else {
            Block::AIR
        }
    }

    /// Replaces the block at the specified chunk-relative coordinates.
    ///
    /// Keeps `solid_array` and `blocks` consistent: storing air removes the block
    /// entry, storing a non-air block into an air cell inserts one at its rank.
    ///
    /// # Returns
    /// The block previously stored in the cell.
    pub fn set_block_at(&mut self, local: Point3<usize>, block: Block) -> Block {
        let index = Self::cell_index(local);
        let rank = self.rank(index);
        let was_solid = self.solid_array[index];
        let is_solid = !block.is_air();

        match (was_solid, is_solid) {
            (true, true) => std::mem::replace(&mut self.blocks[rank], block),
            (true, false) => {
                self.solid_array.set(index, false);
                self.blocks.remove(rank)
            }
            (false, true) => {
                self.solid_array.set(index, true);
                self.blocks.insert(rank, block);
                Block::AIR
            }
            (false, false) => Block::AIR,
        }
    }

    /// Number of non-air cells.
    pub fn solid_count(&self) -> usize {
        self.blocks.len()
    }
}

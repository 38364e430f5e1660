//! # World Module
//!
//! This module provides the `World` struct which manages a collection of chunks in
//! the voxel world, and the two access traits the mining pipeline is written
//! against:
//!
//! - [`BlockView`]: read-only cell lookup. Implemented by the authoritative
//!   `World` and by the client's
//!   [`ClientWorldCache`](crate::voxels::client_cache::ClientWorldCache), so the
//!   same search code runs on both sides.
//! - [`BlockBreaker`]: cell destruction, implemented by `World`.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach where only chunks that have been
//! generated or inserted are kept in memory. Cells in missing chunks read as
//! `None`, which never equals any block, so searches stop at the loaded edge.

use std::collections::HashMap;

use cgmath::Point3;
use log::trace;

use super::block::Block;
use super::chunk::{Chunk, ChunkSnapshot, CHUNK_DIMENSION};
use crate::error::WorldError;

/// Read access to cell contents.
pub trait BlockView {
    /// Contents of the cell at `position`, or `None` if it is not known.
    fn block_at(&self, position: Point3<i32>) -> Option<Block>;
}

/// Destructive access to cells.
pub trait BlockBreaker: BlockView {
    /// Breaks the cell at `position`, leaving air behind.
    ///
    /// # Returns
    /// The block that was broken.
    ///
    /// # Errors
    /// Fails when the cell is not loaded or cannot be broken.
    fn break_block(&mut self, position: Point3<i32>) -> Result<Block, WorldError>;
}

/// The method used to generate new chunks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GenerationMethod {
    /// Perlin terrain with ore veins.
    Perlin {
        /// Noise and ore seed.
        seed: u32,
    },
    /// Every cell holds the given block.
    Solid(Block),
    /// Every cell is air.
    Empty,
}

/// Represents a voxel world composed of multiple chunks.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_miner::voxels::block::{block_type::BlockType, Block};
/// use voxel_miner::voxels::world::{BlockView, World};
///
/// let mut world = World::new();
/// world.add_chunk_at(Point3::new(0, 0, 0));
/// world.set_block(Point3::new(3, 4, 5), Block::new(BlockType::Stone)).unwrap();
/// assert_eq!(world.block_at(Point3::new(3, 4, 5)), Some(Block::new(BlockType::Stone)));
/// ```
#[derive(Debug)]
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<Point3<i32>, Chunk>,
    /// How `add_chunk_at` fills new chunks.
    generation: GenerationMethod,
}

impl World {
    /// Creates a new, empty world whose generated chunks are empty.
    pub fn new() -> Self {
        Self::with_generation(GenerationMethod::Empty)
    }

    /// Creates a new, empty world using the given generation method.
    pub fn with_generation(generation: GenerationMethod) -> Self {
        World {
            chunks: HashMap::new(),
            generation,
        }
    }

    /// Chunk coordinates of the chunk holding a world position.
    pub fn chunk_position_of(position: Point3<i32>) -> Point3<i32> {
        Point3::new(
            position.x.div_euclid(CHUNK_DIMENSION),
            position.y.div_euclid(CHUNK_DIMENSION),
            position.z.div_euclid(CHUNK_DIMENSION),
        )
    }

    /// Chunk-relative coordinates of a world position.
    pub fn local_position_of(position: Point3<i32>) -> Point3<usize> {
        Point3::new(
            position.x.rem_euclid(CHUNK_DIMENSION) as usize,
            position.y.rem_euclid(CHUNK_DIMENSION) as usize,
            position.z.rem_euclid(CHUNK_DIMENSION) as usize,
        )
    }

    /// Generates a chunk at the given chunk coordinates if one doesn't already exist.
    pub fn add_chunk_at(&mut self, position: Point3<i32>) {
        if self.chunks.contains_key(&position) {
            return;
        }

        let chunk = match self.generation {
            GenerationMethod::Perlin { seed } => Chunk::perlin(&position, seed),
            GenerationMethod::Solid(block) => Chunk::filled(&position, block),
            GenerationMethod::Empty => Chunk::empty(&position),
        };

        self.chunks.insert(position, chunk);
    }

    /// Generates every chunk overlapping the inclusive block range `min..=max`.
    pub fn add_chunks_covering(&mut self, min: Point3<i32>, max: Point3<i32>) {
        let low = Self::chunk_position_of(min);
        let high = Self::chunk_position_of(max);
        for x in low.x..=high.x {
            for y in low.y..=high.y {
                for z in low.z..=high.z {
                    self.add_chunk_at(Point3::new(x, y, z));
                }
            }
        }
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    pub fn get_chunk_at(&self, position: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    /// Dense snapshot of a loaded chunk, for shipping to clients.
    pub fn chunk_snapshot(&self, position: Point3<i32>) -> Option<ChunkSnapshot> {
        self.chunks.get(&position).map(Chunk::snapshot)
    }

    /// Number of loaded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Stores `block` at a world position.
    ///
    /// # Returns
    /// The block previously stored there.
    ///
    /// # Errors
    /// [`WorldError::ChunkNotLoaded`] if the holding chunk is missing.
    pub fn set_block(&mut self, position: Point3<i32>, block: Block) -> Result<Block, WorldError> {
        let chunk = self
            .chunks
            .get_mut(&Self::chunk_position_of(position))
            .ok_or(WorldError::ChunkNotLoaded(position))?;
        Ok(chunk.set_block_at(Self::local_position_of(position), block))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockView for World {
    fn block_at(&self, position: Point3<i32>) -> Option<Block> {
        self.chunks
            .get(&Self::chunk_position_of(position))
            .map(|chunk| chunk.get_block_at(Self::local_position_of(position)))
    }
}

impl BlockBreaker for World {
    fn break_block(&mut self, position: Point3<i32>) -> Result<Block, WorldError> {
        let current = self
            .block_at(position)
            .ok_or(WorldError::ChunkNotLoaded(position))?;
        if current.is_unbreakable() {
            return Err(WorldError::Unbreakable(position));
        }
        let broken = self.set_block(position, Block::AIR)?;
        trace!("broke {:?} at {:?}", broken, position);
        Ok(broken)
    }
}

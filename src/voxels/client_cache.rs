//! # Client World Cache
//!
//! The client's local knowledge of the world: the chunk snapshots the server has
//! sent, patched with the single-cell updates that followed. Speculative previews
//! run against this cache, so they can only be as fresh as the last update the
//! client received.
//!
//! Chunks are held in an LRU cache; the least recently touched chunk is dropped
//! once the configured capacity is reached. Cells of dropped chunks read as
//! unknown.

use std::num::NonZeroUsize;

use cgmath::Point3;
use log::debug;
use lru::LruCache;

use super::block::Block;
use super::chunk::{Chunk, ChunkSnapshot};
use super::world::{BlockView, World};
use crate::config::MiningConfig;
use crate::error::WorldError;

/// Locally known world contents.
pub struct ClientWorldCache {
    chunks: LruCache<Point3<i32>, Chunk>,
}

impl ClientWorldCache {
    /// Creates a cache holding at most `capacity` chunks.
    pub fn new(capacity: NonZeroUsize) -> Self {
        ClientWorldCache {
            chunks: LruCache::new(capacity),
        }
    }

    /// Creates a cache sized by `config.chunk_cache_capacity`, holding at least
    /// one chunk.
    pub fn from_config(config: &MiningConfig) -> Self {
        Self::new(NonZeroUsize::new(config.chunk_cache_capacity).unwrap_or(NonZeroUsize::MIN))
    }

    /// Stores a chunk snapshot received from the server, replacing any older copy.
    ///
    /// # Errors
    /// [`WorldError::UnknownBlockId`] if the snapshot names an unknown block.
    pub fn apply_snapshot(&mut self, snapshot: &ChunkSnapshot) -> Result<(), WorldError> {
        let chunk = Chunk::from_snapshot(snapshot)?;
        if let Some((evicted, _)) = self.chunks.push(chunk.position, chunk) {
            if evicted != snapshot.position {
                debug!("client cache evicted chunk {:?}", evicted);
            }
        }
        Ok(())
    }

    /// Applies a single-cell change. Ignored if the chunk is not cached.
    pub fn apply_block_update(&mut self, position: Point3<i32>, block: Block) {
        if let Some(chunk) = self.chunks.get_mut(&World::chunk_position_of(position)) {
            chunk.set_block_at(World::local_position_of(position), block);
        }
    }

    /// Number of cached chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl BlockView for ClientWorldCache {
    fn block_at(&self, position: Point3<i32>) -> Option<Block> {
        self.chunks
            .peek(&World::chunk_position_of(position))
            .map(|chunk| chunk.get_block_at(World::local_position_of(position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::block_type::BlockType;

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn mirrors_server_snapshot_and_updates() {
        let mut world = World::new();
        world.add_chunk_at(Point3::new(0, 0, 0));
        let pos = Point3::new(4, 4, 4);
        world.set_block(pos, Block::new(BlockType::IronOre)).unwrap();

        let mut cache = ClientWorldCache::new(capacity(4));
        cache
            .apply_snapshot(&world.chunk_snapshot(Point3::new(0, 0, 0)).unwrap())
            .unwrap();
        assert_eq!(cache.block_at(pos), world.block_at(pos));

        cache.apply_block_update(pos, Block::AIR);
        assert_eq!(cache.block_at(pos), Some(Block::AIR));
    }

    #[test]
    fn capacity_comes_from_config() {
        let config = MiningConfig {
            chunk_cache_capacity: 1,
            ..MiningConfig::default()
        };
        let mut cache = ClientWorldCache::from_config(&config);
        for x in 0..2 {
            cache
                .apply_snapshot(&Chunk::empty(&Point3::new(x, 0, 0)).snapshot())
                .unwrap();
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn least_recently_used_chunk_is_evicted() {
        let mut cache = ClientWorldCache::new(capacity(2));
        for x in 0..3 {
            cache
                .apply_snapshot(&Chunk::empty(&Point3::new(x, 0, 0)).snapshot())
                .unwrap();
        }
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.block_at(Point3::new(0, 0, 0)), None);
        assert_eq!(cache.block_at(Point3::new(32, 0, 0)), Some(Block::AIR));
    }
}

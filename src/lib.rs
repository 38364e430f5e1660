#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Miner
//!
//! Server-authoritative assisted mining for a voxel world: shape-based bulk
//! breaking (Ultmine) and connectivity-based vein mining, with client-side
//! previews.
//!
//! ## Key Modules
//!
//! * `voxels` - Blocks, chunks, the authoritative world and the client cache
//! * `mining` - Shape calculation, connectivity expansion, sessions, previews
//!   and execution
//! * `server` - The world-thread message loop
//! * `core` - Shared concurrency primitives
//! * `config` - Tunable limits
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_miner::config::MiningConfig;
//! use voxel_miner::mining::actor::{ActorContext, ActorId, GameMode};
//! use voxel_miner::mining::execution::ExecutionEngine;
//! use voxel_miner::mining::session::SessionStore;
//! use voxel_miner::voxels::block::{block_type::BlockType, Block};
//! use voxel_miner::voxels::world::World;
//!
//! let config = MiningConfig::default();
//! let sessions = SessionStore::new(&config);
//! let engine = ExecutionEngine::new(sessions.clone(), config);
//!
//! let mut world = World::new();
//! world.add_chunk_at(Point3::new(0, 0, 0));
//! for x in 0..3 {
//!     world.set_block(Point3::new(x, 0, 0), Block::new(BlockType::Dirt)).unwrap();
//! }
//!
//! let actor = ActorContext { mode: GameMode::Creative, ..ActorContext::new(ActorId(1)) };
//! sessions.set_activated(actor.id, true);
//! let report = engine.execute(&mut world, &actor, Point3::new(0, 0, 0), Block::new(BlockType::Dirt));
//! assert_eq!(report.cells_broken, 2);
//! ```

use log::info;

pub mod config;
pub mod core;
pub mod error;
pub mod mining;
pub mod server;
pub mod voxels;

/// Installs the global logger: stdout, filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls leave the first logger in place.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    let installed = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init()
        .is_ok();

    if installed {
        info!("Logger initialized");
    }
}

//! # Voxels
//!
//! The world model the mining pipeline operates on.
//!
//! * **Block**: cell contents, block types with hardness and harvest rules, and
//!   the six cell faces
//! * **Chunk**: compact 16x16x16 block storage, generators and snapshots
//! * **World**: the authoritative sparse chunk map plus the `BlockView` /
//!   `BlockBreaker` access traits
//! * **Client cache**: the client's LRU-bounded copy of the chunks it has seen
//!
//! ## Thread Safety
//!
//! The world is owned by the world thread and mutated only there. Client caches
//! are separate copies and share nothing with it.

pub mod block;
pub mod chunk;
pub mod client_cache;
pub mod world;

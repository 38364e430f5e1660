//! # Core Module
//!
//! Concurrency primitives shared by the mining subsystems.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//! - `ActorGuardSet` / `GuardToken`: per-actor re-entrancy guard with scoped release
//!
//! ## Usage
//! ```rust
//! use voxel_miner::core::{ActorGuardSet, MtResource};
//! use voxel_miner::mining::actor::ActorId;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//!
//! let guards = ActorGuardSet::new();
//! let token = guards.try_acquire(ActorId(1)).unwrap();
//! assert!(guards.try_acquire(ActorId(1)).is_none());
//! drop(token);
//! assert!(guards.is_empty());
//! ```

pub mod guard_set;
pub mod mt_resource;

pub use guard_set::{ActorGuardSet, GuardToken};
pub use mt_resource::MtResource;

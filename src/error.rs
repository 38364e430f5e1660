//! # Errors
//!
//! Failure types raised by the world and the configuration layer. Precondition
//! rejections in the mining pipeline are not errors; see
//! [`Rejection`](crate::mining::execution::Rejection).

use cgmath::Point3;
use thiserror::Error;

/// A failure while reading or mutating world cells.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The chunk holding the position is not loaded.
    #[error("chunk containing ({}, {}, {}) is not loaded", .0.x, .0.y, .0.z)]
    ChunkNotLoaded(Point3<i32>),

    /// The cell cannot be broken by anyone.
    #[error("block at ({}, {}, {}) is unbreakable", .0.x, .0.y, .0.z)]
    Unbreakable(Point3<i32>),

    /// A stored block id did not map to a known block type.
    #[error("unknown block id {0}")]
    UnknownBlockId(u8),
}

/// A failure while loading [`MiningConfig`](crate::config::MiningConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document was not valid JSON or did not match the schema.
    #[error("invalid mining config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is outside its allowed range.
    #[error("invalid mining config: `{field}` must be at least 1")]
    ZeroLimit {
        /// Name of the offending field.
        field: &'static str,
    },
}

//! # Mining Configuration
//!
//! Tunables for the assisted-mining pipeline. Every field has a default, so a
//! partial (or empty) JSON document is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of cells a vein-mining batch may break, origin excluded.
pub const DEFAULT_VEIN_BUDGET: usize = 64;
/// Default upper bound for a selection's depth.
pub const DEFAULT_MAX_DEPTH: u32 = 32;
/// Default upper bound for a selection's length.
pub const DEFAULT_MAX_LENGTH: u32 = 64;
/// Default number of chunk snapshots a client keeps for speculative previews.
pub const DEFAULT_CHUNK_CACHE_CAPACITY: usize = 64;

/// Runtime configuration for the mining pipeline.
///
/// # Examples
///
/// ```
/// use voxel_miner::config::MiningConfig;
///
/// let config = MiningConfig::from_json_str(r#"{ "vein_budget": 32 }"#).unwrap();
/// assert_eq!(config.vein_budget, 32);
/// assert_eq!(config.max_depth, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Maximum cells broken by one vein-mining batch, origin excluded.
    pub vein_budget: usize,
    /// Upper clamp applied to selection depth.
    pub max_depth: u32,
    /// Upper clamp applied to selection length.
    pub max_length: u32,
    /// Chunk snapshots retained by the client cache.
    pub chunk_cache_capacity: usize,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            vein_budget: DEFAULT_VEIN_BUDGET,
            max_depth: DEFAULT_MAX_DEPTH,
            max_length: DEFAULT_MAX_LENGTH,
            chunk_cache_capacity: DEFAULT_CHUNK_CACHE_CAPACITY,
        }
    }
}

impl MiningConfig {
    /// Parses a configuration from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::ZeroLimit`] when a depth, length or cache limit is zero.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MiningConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroLimit { field: "max_depth" });
        }
        if self.max_length == 0 {
            return Err(ConfigError::ZeroLimit { field: "max_length" });
        }
        if self.chunk_cache_capacity == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "chunk_cache_capacity",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = MiningConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MiningConfig::default());
    }

    #[test]
    fn zero_budget_is_allowed() {
        // A zero budget disables vein mining without being a configuration error.
        let config = MiningConfig::from_json_str(r#"{ "vein_budget": 0 }"#).unwrap();
        assert_eq!(config.vein_budget, 0);
    }

    #[test]
    fn zero_depth_cap_is_rejected() {
        let err = MiningConfig::from_json_str(r#"{ "max_depth": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroLimit { field: "max_depth" }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = MiningConfig::from_json_str("{ vein_budget: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}

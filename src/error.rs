//! Error types
//!
//! The simulation itself never fails: stale references are skipped and
//! nothing is retried. Errors only surface at the edges, when a config is
//! parsed or when the host looks up the elements it renders into.

use thiserror::Error;

/// Rejected scene configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field}: range [{min}, {max}] is empty or inverted")]
    InvalidRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{field}: probability {value} is outside [0, 1]")]
    InvalidProbability { field: &'static str, value: f32 },

    #[error("capacity must be at least 1")]
    ZeroCapacity,
}

/// Host bootstrap failure; the scene is not started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("no browser window or document")]
    NoWindow,

    #[error("required element #{0} not found")]
    MissingElement(&'static str),
}

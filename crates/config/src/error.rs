//! Configuration errors.
//!
//! Every variant describes an operator mistake: the agent refuses to start
//! and reports the first one it hits.

use std::path::PathBuf;

/// Errors produced while loading, decoding, or assembling configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid duration '{value}' for {field}: {reason}")]
    DurationParse {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("No bind address specified but ports are configured")]
    MissingBindAddress,

    #[error("Failed to parse config from {origin}: {reason}")]
    Parse { origin: String, reason: String },

    #[error("Failed to read config at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Unsupported config format for {path}: expected a .toml or .json file")]
    UnsupportedFormat { path: PathBuf },
}

//! Configuration error types.

use std::path::PathBuf;

/// Errors raised while loading or validating `muster.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file '{0}' not found (searched upward from the current directory)")]
    NotFound(PathBuf),

    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid configuration:\n{0}")]
    Validation(String),
}

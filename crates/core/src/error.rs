//! Core error types

use thiserror::Error;

/// Core error type for Courier
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration rejected by validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for [`crate::Config`]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

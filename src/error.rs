//! Custom error types and handling
//!
//! A wrong answer is never an error: the engine reports it and returns
//! `Ok(false)`. Everything in here is fatal for the process.

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Stream errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Registry errors
    #[error("Registry is frozen, cannot register '{0}'")]
    RegistryFrozen(String),

    // Report errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Internal errors
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Config(_) => "CONFIGURATION_ERROR",
            Self::RegistryFrozen(_) => "REGISTRY_FROZEN",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

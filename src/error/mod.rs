//! Error handling module for Trimmify

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for Trimmify operations
#[derive(Error, Debug)]
pub enum TrimmifyError {
    /// Failure reported by the trim/preview core
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration file {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Configuration value out of range or unknown
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Environment override with an unusable value
    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidEnv { name: String, value: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TrimmifyError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result type alias for Trimmify operations
pub type TrimmifyResult<T> = std::result::Result<T, TrimmifyError>;

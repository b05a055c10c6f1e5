//! Error types for the workflow canvas
//!
//! Graph and gesture operations never fail: invalid requests are silent
//! no-ops. Errors only surface where external input is parsed or looked up
//! (configuration, catalogs, option ids).

use thiserror::Error;

/// Result type alias using EditorError
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors that can occur at the canvas input boundary
#[derive(Debug, Error)]
pub enum EditorError {
    /// Configuration values are out of range or inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catalog or configuration JSON could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A catalog option id was not found
    #[error("Unknown catalog option: {0}")]
    UnknownOption(String),
}

impl EditorError {
    /// Create an invalid configuration error with a message
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

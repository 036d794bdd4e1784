//! Error types for Ember

use thiserror::Error;

/// The main error type for Ember operations
#[derive(Debug, Error)]
pub enum EmberError {
    #[error("Sprite not found: {0}")]
    SpriteNotFound(String),

    #[error("Sprite error: {0}")]
    SpriteError(String),

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("Invalid field type: expected {expected}, got {got}")]
    InvalidFieldType { expected: String, got: String },

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Result type alias for Ember operations
pub type Result<T> = std::result::Result<T, EmberError>;

impl From<toml::de::Error> for EmberError {
    fn from(err: toml::de::Error) -> Self {
        EmberError::ConfigParseError(err.to_string())
    }
}

//! Error types for the letter trainer

use thiserror::Error;

/// Result type alias for trainer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the letter trainer
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Input that does not name one of the 26 letters
    #[error("invalid letter: {0:?}")]
    InvalidLetter(String),

    /// Cue playback or rendering error
    #[error("presentation error: {0}")]
    Presentation(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

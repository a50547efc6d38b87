//! Error types for picprompt.

use thiserror::Error;

/// Result type alias using picprompt's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for picprompt operations.
///
/// None of these are recovered locally; each is surfaced directly to the
/// user-facing surface with a human-readable message. A failed remote call
/// ends that image's processing leg.
#[derive(Error, Debug)]
pub enum Error {
    /// Blob store upload/delete failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Vision label detection failed
    #[error("Detection error: {0}")]
    Detection(String),

    /// Text generation failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// User input out of contract
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

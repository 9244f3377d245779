//! Error types for devindex-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised at the edges of the core (input validation and snapshot decoding).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("quality rating must be between 0 and 5, got {0}")]
    InvalidQuality(u8),

    #[error("mastery level must be between 0 and 4, got {0}")]
    InvalidMasteryLevel(u8),

    #[error("choice index {index} out of range for {len} choices")]
    InvalidChoice { index: usize, len: usize },

    #[error("question index {index} out of range for {len} questions")]
    InvalidQuestion { index: usize, len: usize },

    #[error("question for term {0} has already been answered")]
    AlreadyAnswered(String),

    #[error("invalid corpus snapshot: {0}")]
    Corpus(#[source] serde_json::Error),

    #[error("invalid settings: {0}")]
    Settings(#[source] serde_json::Error),

    #[error("progress store error: {0}")]
    Store(String),
}

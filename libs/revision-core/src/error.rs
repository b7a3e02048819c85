//! Error types for revision-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while validating caller input before it reaches a scheduler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid rating '{0}', expected forgot, hard, good or easy")]
    InvalidRating(String),

    #[error("invalid answer '{0}', expected A, B, C or D")]
    InvalidAnswerOption(String),

    #[error("invalid difficulty '{0}', expected easy, medium or hard")]
    InvalidDifficulty(String),
}

//! Definition error types.
//!
//! Raised when a curriculum-definition file is structurally unusable (as
//! opposed to merely suspicious — suspicious definitions load fine and are
//! reported through [`crate::parser::validate_definition`] warnings).

use thiserror::Error;

/// Errors that make a curriculum definition unusable.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The track string is not a known subject track.
    #[error("unknown track: {0}")]
    UnknownTrack(String),

    /// The level string is not a known school level.
    #[error("unknown level: {0}")]
    UnknownLevel(String),

    /// The definition key is empty.
    #[error("definition key is empty")]
    EmptyKey,
}

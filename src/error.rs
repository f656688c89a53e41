//! Error types for the fallible edges of the game
//!
//! The simulation itself never fails; only commands that take outside input do.

use thiserror::Error;

/// Rejected session command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown character id `{0}`")]
    UnknownCharacter(String),
}

/// Invalid tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

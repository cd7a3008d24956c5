//! Unified error types surfaced by the runtime API.
//!
//! Wraps turn rejections, snapshot failures and command-source problems so
//! frontends can bubble them up with consistent context.
use thiserror::Error;

use combat_core::{CombatError, ErrorSeverity, TurnError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error("snapshot encoding failed")]
    Encode(#[source] bincode::Error),

    #[error("snapshot decoding failed")]
    Decode(#[source] bincode::Error),

    #[error("snapshot digest mismatch (expected {expected}, found {found})")]
    DigestMismatch { expected: String, found: String },

    #[error("session draws from entropy and cannot be snapshotted")]
    NotReplayable,

    #[error("player command source closed")]
    CommandSourceClosed,
}

impl RuntimeError {
    /// Severity of the underlying failure.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Turn(error) => error.severity(),
            RuntimeError::NotReplayable | RuntimeError::CommandSourceClosed => {
                ErrorSeverity::Validation
            }
            _ => ErrorSeverity::Internal,
        }
    }
}

//! Error types for the turn orchestrator.

use crate::action::ActionError;
use crate::error::{CombatError, ErrorSeverity};

/// Errors surfaced while driving a round.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("a round is already being resolved")]
    Busy,

    #[error("the battle is over")]
    BattleOver,

    #[error("no round is being resolved")]
    NotResolving,

    #[error("player action rejected: {0}")]
    Action(#[from] ActionError),
}

impl CombatError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        use TurnError::*;
        match self {
            Busy => ErrorSeverity::Recoverable,
            BattleOver | NotResolving => ErrorSeverity::Validation,
            Action(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use TurnError::*;
        match self {
            Busy => "TURN_BUSY",
            BattleOver => "TURN_BATTLE_OVER",
            NotResolving => "TURN_NOT_RESOLVING",
            Action(error) => error.error_code(),
        }
    }
}

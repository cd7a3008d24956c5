//! Encounter contract violations.

use crate::ability::AbilityId;
use crate::error::{CombatError, ErrorSeverity};

use super::{CombatantId, Side};

/// Errors raised while turning an encounter into a battle state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitializationError {
    #[error("encounter has no player")]
    MissingPlayer,

    #[error("player slot must hold {expected} on the player side (got {found} on {side:?})")]
    InvalidPlayer {
        expected: CombatantId,
        found: CombatantId,
        side: Side,
    },

    #[error("combatant {combatant} is on {found:?}, expected {expected:?}")]
    SideMismatch {
        combatant: CombatantId,
        expected: Side,
        found: Side,
    },

    #[error("combatant id {0} is used more than once")]
    DuplicateId(CombatantId),

    #[error("encounter has no hostiles")]
    NoHostiles,

    #[error("encounter has {count} combatants (max: {max})")]
    TooManyCombatants { count: usize, max: usize },

    #[error("kit of combatant {combatant} exceeds {max} abilities")]
    KitTooLarge { combatant: CombatantId, max: usize },

    #[error("combatant {0} enters the battle with no health")]
    DeadOnArrival(CombatantId),

    #[error("combatant {0} has non-finite stats")]
    NonFiniteStats(CombatantId),

    #[error("combatant {combatant} knows {ability}, which has no definition")]
    UnknownAbility {
        combatant: CombatantId,
        ability: AbilityId,
    },
}

impl CombatError for InitializationError {
    fn severity(&self) -> ErrorSeverity {
        use InitializationError::*;
        match self {
            UnknownAbility { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use InitializationError::*;
        match self {
            MissingPlayer => "INIT_MISSING_PLAYER",
            InvalidPlayer { .. } => "INIT_INVALID_PLAYER",
            SideMismatch { .. } => "INIT_SIDE_MISMATCH",
            DuplicateId(_) => "INIT_DUPLICATE_ID",
            NoHostiles => "INIT_NO_HOSTILES",
            TooManyCombatants { .. } => "INIT_TOO_MANY_COMBATANTS",
            KitTooLarge { .. } => "INIT_KIT_TOO_LARGE",
            DeadOnArrival(_) => "INIT_DEAD_ON_ARRIVAL",
            NonFiniteStats(_) => "INIT_NON_FINITE_STATS",
            UnknownAbility { .. } => "INIT_UNKNOWN_ABILITY",
        }
    }
}

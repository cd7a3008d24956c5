//! Ability resolution errors.
//!
//! Every variant is raised before the first mutation, so a rejected action
//! leaves the battle state untouched.

use crate::ability::AbilityId;
use crate::error::{CombatError, ErrorSeverity};
use crate::state::CombatantId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("combatant {0} not found")]
    UnknownCombatant(CombatantId),

    #[error("combatant {0} is defeated")]
    ActorDefeated(CombatantId),

    #[error("{actor} does not know {ability}")]
    NotInKit {
        actor: CombatantId,
        ability: AbilityId,
    },

    #[error("no definition for ability {0}")]
    UndefinedAbility(AbilityId),

    #[error("{ability} is on cooldown ({remaining} rounds)")]
    OnCooldown { ability: AbilityId, remaining: u32 },

    #[error("{ability} costs {required}, only {available} available")]
    InsufficientResource {
        ability: AbilityId,
        required: u32,
        available: u32,
    },

    #[error("no living target")]
    NoLivingTarget,

    #[error("combatant {0} has no pending intent")]
    NoPendingIntent(CombatantId),
}

impl CombatError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            UnknownCombatant(_) | NotInKit { .. } | NoPendingIntent(_) => ErrorSeverity::Validation,
            ActorDefeated(_) | OnCooldown { .. } | InsufficientResource { .. } | NoLivingTarget => {
                ErrorSeverity::Recoverable
            }
            UndefinedAbility(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            UnknownCombatant(_) => "ACTION_UNKNOWN_COMBATANT",
            ActorDefeated(_) => "ACTION_ACTOR_DEFEATED",
            NotInKit { .. } => "ACTION_NOT_IN_KIT",
            UndefinedAbility(_) => "ACTION_UNDEFINED_ABILITY",
            OnCooldown { .. } => "ACTION_ON_COOLDOWN",
            InsufficientResource { .. } => "ACTION_INSUFFICIENT_RESOURCE",
            NoLivingTarget => "ACTION_NO_LIVING_TARGET",
            NoPendingIntent(_) => "ACTION_NO_PENDING_INTENT",
        }
    }
}

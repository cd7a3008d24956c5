//! Turn orchestration.
//!
//! The [`BattleEngine`] is the only driver of a [`BattleState`]. A round runs
//! player → companion → each living hostile → end-of-round bookkeeping, one
//! actor per [`BattleEngine::step`], so a caller can pace the round however it
//! likes (or not at all, via [`BattleEngine::submit`]).
//!
//! While a round is in flight the turn phase is `Resolving` and new player
//! commands are rejected with [`TurnError::Busy`]. A defeat check runs after
//! every individual action and ends the battle immediately.

mod bookkeeping;
mod errors;
mod turns;

pub use errors::TurnError;
pub use turns::{PlayerCommand, StepOutcome};

use crate::env::{CombatEnv, RandomSource};
use crate::events::NarrationSink;
use crate::state::BattleState;

/// Drives one battle run.
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    env: CombatEnv<'a>,
    rng: &'a mut dyn RandomSource,
    sink: &'a mut dyn NarrationSink,
}

impl<'a> BattleEngine<'a> {
    pub fn new(
        state: &'a mut BattleState,
        env: CombatEnv<'a>,
        rng: &'a mut dyn RandomSource,
        sink: &'a mut dyn NarrationSink,
    ) -> Self {
        Self {
            state,
            env,
            rng,
            sink,
        }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    pub fn env(&self) -> CombatEnv<'a> {
        self.env
    }
}

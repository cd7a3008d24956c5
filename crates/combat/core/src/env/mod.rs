//! Read-only collaborators the engine consults while resolving a battle.
//!
//! Ability definitions come from an [`AbilityOracle`] supplied by the content
//! layer; tunables come from [`CombatConfig`]. [`CombatEnv`] bundles both so
//! every component receives its context explicitly instead of reaching for a
//! global "current encounter".
mod rng;

pub use rng::{FixedRandom, RandomSource, SeededRandom, compute_seed, pick};

use crate::ability::{AbilityDef, AbilityId};
use crate::config::CombatConfig;

/// Source of immutable ability definitions.
pub trait AbilityOracle: Send + Sync {
    fn definition(&self, id: AbilityId) -> Option<&AbilityDef>;
}

/// Aggregates the read-only oracles required by the engine.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    abilities: &'a dyn AbilityOracle,
    config: &'a CombatConfig,
}

impl<'a> CombatEnv<'a> {
    pub fn new(abilities: &'a dyn AbilityOracle, config: &'a CombatConfig) -> Self {
        Self { abilities, config }
    }

    pub fn abilities(&self) -> &'a dyn AbilityOracle {
        self.abilities
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }

    /// Looks up an ability definition.
    pub fn ability(&self, id: AbilityId) -> Option<&'a AbilityDef> {
        self.abilities.definition(id)
    }
}

impl core::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

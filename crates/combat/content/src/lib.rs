//! Data-driven combat content and loaders.
//!
//! This crate houses the built-in ability catalog and the encounter builder,
//! and provides loaders for RON/TOML data files:
//! - Ability books (data-driven via RON, laid over the standard catalog)
//! - Encounters (data-driven via RON)
//! - Combat configuration (data-driven via TOML)
//!
//! Content is consumed by the engine through `AbilityOracle` and never
//! appears in battle state except as the combatants it builds.

pub mod catalog;
pub mod encounter;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{definition, standard_book};
pub use encounter::{CombatantSpec, EncounterBuilder, EncounterSpec, ResourceSpec};

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityBookLoader, AbilityCatalog, ConfigLoader, ContentFactory, EncounterLoader, LoadResult,
};

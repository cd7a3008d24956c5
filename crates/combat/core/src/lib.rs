//! Deterministic turn-based combat rules.
//!
//! `combat-core` defines the canonical rules (damage math, status ledger,
//! posture and intents, ability resolution, the learning AI agents and the
//! round state machine) as pure APIs over an explicit [`BattleState`]. All
//! round sequencing flows through [`engine::BattleEngine`]; randomness comes
//! in through [`RandomSource`] and narration goes out through
//! [`NarrationSink`], so the same inputs always replay the same battle.
pub mod ability;
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod state;
pub mod stats;

pub use ability::{
    AbilityBook, AbilityCategory, AbilityDef, AbilityId, AbilityTags, AbilityUpgrade,
    DamageEffect, EffectKind, GuardEffect, HealEffect, ShieldEffect, StatusApplication,
    TargetKind, UpgradePath, Upgrades,
};
pub use action::{
    ActionContext, ActionError, ActionRequest, AppliedEffect, Resolution, ResolveMode,
    check_usable, resolve, select_target,
};
pub use ai::{
    AbilityScore, Agent, CompanionPolicy, Decision, DecisionKind, DecisionPolicy, DecisionView,
    HostilePolicy,
};
pub use combat::{DamageKind, Element, Resistances};
pub use config::{
    CombatConfig, DecisionConfig, Difficulty, FormulaConfig, PostureConfig, ResourceConfig,
    RewardWeights,
};
pub use engine::{BattleEngine, PlayerCommand, StepOutcome, TurnError};
pub use env::{
    AbilityOracle, CombatEnv, FixedRandom, RandomSource, SeededRandom, compute_seed, pick,
};
pub use error::{CombatError, ErrorSeverity};
pub use events::{CombatEvent, EventLog, NarrationSink, NullSink, SkipReason, Tone};
pub use state::{
    BattleOutcome, BattleState, Combatant, CombatantId, Cooldowns, DecisionMemory, Encounter,
    InitializationError, Kit, LearnedStat, Meter, PendingIntent, Posture, ResourceKind,
    ResourcePool, Side, StatusEntry, StatusKind, StatusLedger, StatusTick, TurnCursor, TurnPhase,
    TurnState,
};
pub use stats::{BaseStats, EffectiveStats, Modifier, ModifierStack, Passives};

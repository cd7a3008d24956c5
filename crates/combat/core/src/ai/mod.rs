//! Decision engine for AI-controlled combatants.
//!
//! One [`Agent`] mechanism (gather → score → explore/exploit → abstain,
//! then learn) serves both sides; [`HostilePolicy`] and [`CompanionPolicy`]
//! plug in the scoring, targeting and reward functions.
mod agent;
mod companion;
mod estimate;
mod hostile;
mod policy;
mod score;

pub use agent::{Agent, Decision, DecisionKind, epsilon};
pub use companion::CompanionPolicy;
pub use estimate::{expected_damage, expected_heal, expected_shield};
pub use hostile::HostilePolicy;
pub use policy::{DecisionPolicy, DecisionView};
pub use score::{AbilityScore, best_index};

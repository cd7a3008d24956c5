//! Combat configuration constants and tunable parameters.
//!
//! Every numeric knob of the engine lives here so balance passes never touch
//! rule code. Compile-time capacities are associated constants; everything
//! else is a runtime-tunable field with a sensible default.

use crate::combat::sanitize_ratio;
use crate::state::Side;

/// Combat configuration shared by every component of a battle run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub formula: FormulaConfig,
    pub posture: PostureConfig,
    pub resources: ResourceConfig,
    pub decision: DecisionConfig,
    pub rewards: RewardWeights,
    pub difficulty: Difficulty,
    /// Upper bound on loot drops earned in a single battle.
    pub max_drops_per_battle: u32,
    /// Probability that a flee command succeeds.
    pub flee_chance: f64,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of abilities in a combatant's kit.
    pub const MAX_KIT: usize = 12;
    /// Highest upgrade tier an ability can reach on either path.
    pub const MAX_UPGRADE_TIER: u8 = 3;
    /// Maximum number of combatants in one encounter (player + companion + hostiles).
    pub const MAX_COMBATANTS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_DROPS: u32 = 3;
    pub const DEFAULT_FLEE_CHANCE: f64 = 0.5;

    pub fn new() -> Self {
        Self {
            formula: FormulaConfig::default(),
            posture: PostureConfig::default(),
            resources: ResourceConfig::default(),
            decision: DecisionConfig::default(),
            rewards: RewardWeights::default(),
            difficulty: Difficulty::Normal,
            max_drops_per_battle: Self::DEFAULT_MAX_DROPS,
            flee_chance: Self::DEFAULT_FLEE_CHANCE,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Disables exploration entirely. Used by replay tooling and tests that
    /// need the greedy pick every time.
    pub fn without_exploration(mut self) -> Self {
        self.decision.epsilon_start = 0.0;
        self.decision.epsilon_floor = 0.0;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Constants of the damage/mitigation model.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormulaConfig {
    /// Armor weight in `100 / (100 + armor * K)`.
    pub physical_k: f64,
    /// Magic-resist weight in `100 / (100 + resist * K)`.
    pub magic_k: f64,
    pub variance_min: f64,
    pub variance_max: f64,
    /// Hard ceiling on crit probability after all bonuses.
    pub crit_ceiling: f64,
    pub crit_multiplier: f64,
    /// Flat multiplier on damage taken while broken.
    pub broken_multiplier: f64,
    /// Crit chance granted against a broken target.
    pub broken_crit_bonus: f64,
    /// Highest damage-reduction fraction a guard can provide.
    pub guard_cap: f64,
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            physical_k: 1.0,
            magic_k: 0.8,
            variance_min: 0.85,
            variance_max: 1.15,
            crit_ceiling: 0.75,
            crit_multiplier: 1.5,
            broken_multiplier: 1.25,
            broken_crit_bonus: 0.15,
            guard_cap: 0.8,
        }
    }
}

/// Posture (stagger) accrual parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PostureConfig {
    /// Fraction of raw damage converted into posture.
    pub gain_ratio: f64,
    /// Per-hit cap as a fraction of the posture maximum.
    pub per_hit_cap_ratio: f64,
    /// Pools with a maximum at or below this value are never capped.
    pub tiny_pool_max: u32,
    pub crit_bonus: f64,
    pub interrupt_bonus: f64,
    pub basic_attack_bonus: f64,
    /// Rounds the `Broken` status lasts after a break.
    pub broken_duration: u32,
    /// Posture maximum of a hostile authored without one, as a fraction of
    /// its max health.
    pub default_ratio: f64,
}

impl PostureConfig {
    /// Posture maximum for a hostile with `max_health` and no authored pool.
    pub fn default_maximum(&self, max_health: u32) -> u32 {
        let ratio = sanitize_ratio(self.default_ratio);
        ((f64::from(max_health) * ratio).round() as u32).max(1)
    }
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            gain_ratio: 0.25,
            per_hit_cap_ratio: 0.30,
            tiny_pool_max: 10,
            crit_bonus: 2.0,
            interrupt_bonus: 4.0,
            basic_attack_bonus: 1.0,
            broken_duration: 2,
            default_ratio: 0.25,
        }
    }
}

/// Class resource mechanics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResourceConfig {
    /// Mana regenerated per round, as a fraction of maximum.
    pub mana_regen: f64,
    /// Energy regenerated per round, as a fraction of maximum.
    pub energy_regen: f64,
    /// Focus regenerated per round, as a fraction of maximum.
    pub focus_regen: f64,
    /// Rage lost per round.
    pub rage_decay: u32,
    pub rage_on_hit_dealt: u32,
    pub rage_on_hit_taken: u32,
    /// Outgoing damage bonus at full rage (scales linearly with rage fill).
    pub rage_damage_bonus: f64,
    /// Resource granted by guarding.
    pub guard_refund: u32,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            mana_regen: 0.08,
            energy_regen: 0.25,
            focus_regen: 0.10,
            rage_decay: 5,
            rage_on_hit_dealt: 8,
            rage_on_hit_taken: 5,
            rage_damage_bonus: 0.25,
            guard_refund: 5,
        }
    }
}

/// Parameters of the epsilon-greedy learning agents.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecisionConfig {
    pub epsilon_start: f64,
    pub epsilon_floor: f64,
    /// Multiplicative decay applied per accumulated decision.
    pub epsilon_decay: f64,
    /// Weight of the learned value in an ability's score.
    pub learned_weight: f64,
    /// Margin an ability must clear over the plain attack to be chosen.
    pub abstain_margin: f64,
    /// Learning rate never drops below this value.
    pub min_learning_rate: f64,
    pub lethal_bonus: f64,
    pub synergy_bonus: f64,
    /// Strength of the low-health preference for guard and buffs.
    pub defensive_bias: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            epsilon_start: 0.20,
            epsilon_floor: 0.03,
            epsilon_decay: 0.97,
            learned_weight: 0.5,
            abstain_margin: 0.02,
            min_learning_rate: 0.05,
            lethal_bonus: 0.5,
            synergy_bonus: 0.15,
            defensive_bias: 0.6,
        }
    }
}

/// Reward shaping weights. Tuned by playtesting, not load-bearing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardWeights {
    pub damage: f64,
    pub heal: f64,
    pub shield: f64,
    pub kill_bonus: f64,
    pub status: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            damage: 1.0,
            heal: 0.8,
            shield: 0.5,
            kill_bonus: 0.5,
            status: 0.1,
        }
    }
}

/// Difficulty setting chosen by the surrounding game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Difficulty {
    Story,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Outgoing damage multiplier for a combatant on `side`.
    pub fn damage_modifier(self, side: Side) -> f64 {
        match (self, side) {
            (Difficulty::Story, Side::Hostile) => 0.75,
            (Difficulty::Story, _) => 1.2,
            (Difficulty::Normal, _) => 1.0,
            (Difficulty::Hard, Side::Hostile) => 1.25,
            (Difficulty::Hard, _) => 0.9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_posture_follows_health() {
        let posture = PostureConfig::default();
        assert_eq!(posture.default_maximum(120), 30);
        assert_eq!(posture.default_maximum(2), 1);

        let broken = PostureConfig {
            default_ratio: f64::NAN,
            ..PostureConfig::default()
        };
        assert_eq!(broken.default_maximum(400), 1);
    }
}

//! Damage, heal and posture formulas.
//!
//! Every function here is pure. Intermediate values stay `f64`; rounding to
//! an integer happens only in [`finalize_hit`] and the heal/posture helpers
//! that produce a final amount.
//!
//! # Pipeline
//!
//! ```text
//! outgoing  = stat × potency × modifiers × variance × (crit ? crit_mult : 1)
//! mitigated = outgoing × defense_factor × elemental × (broken ? broken_mult : 1)
//! hit       = max(1, round(mitigated))
//! ```
//!
//! The outgoing roll is computed once per action; area abilities mitigate the
//! same roll separately for every defender.

use crate::config::{FormulaConfig, PostureConfig};
use crate::stats::ModifierStack;

use super::crit::{crit_chance, roll_crit};
use super::element::elemental_multiplier;
use super::mitigation::defense_factor;
use super::{sanitize, sanitize_ratio};

/// Result of the attacker-side stage.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutgoingRoll {
    /// Damage before any defender-side factor.
    pub amount: f64,
    pub crit: bool,
}

/// Attacker-side inputs of one hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutgoingInput {
    /// Attack for physical abilities, magic for magic ones.
    pub stat: f64,
    pub potency: f64,
    /// Product of every multiplicative modifier (buffs, difficulty, rage, upgrades).
    pub multiplier: f64,
    /// Total crit probability before the ceiling.
    pub crit_chance: f64,
}

/// Defender-side inputs of one hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenseInput {
    /// Armor for physical hits, magic resist for magic ones.
    pub defense: f64,
    pub penetration: f64,
    /// `K` of the matching curve.
    pub k: f64,
    /// Resistance fraction against the hit's element.
    pub resist: f64,
    pub broken: bool,
}

/// Variance multiplier for a uniform draw in `[0, 1)`.
pub fn variance(draw: f64, formula: &FormulaConfig) -> f64 {
    let low = sanitize(formula.variance_min);
    let high = sanitize(formula.variance_max).max(low);
    low + sanitize_ratio(draw) * (high - low)
}

/// Attacker-side stage. Consumes the variance and crit draws.
pub fn roll_outgoing(
    input: OutgoingInput,
    variance_draw: f64,
    crit_draw: f64,
    formula: &FormulaConfig,
) -> OutgoingRoll {
    let base = sanitize(input.stat).max(0.0) * sanitize(input.potency).max(0.0);
    let multiplier = sanitize(input.multiplier).max(0.0);
    let chance = crit_chance(input.crit_chance, 0.0, 0.0, formula.crit_ceiling);
    let crit = roll_crit(chance, crit_draw);
    let crit_factor = if crit {
        sanitize(formula.crit_multiplier).max(1.0)
    } else {
        1.0
    };

    OutgoingRoll {
        amount: base * multiplier * variance(variance_draw, formula) * crit_factor,
        crit,
    }
}

/// Defender-side stage: defense curve, element and broken multiplier.
pub fn mitigate(outgoing: f64, defense: DefenseInput, formula: &FormulaConfig) -> f64 {
    let broken = if defense.broken {
        sanitize(formula.broken_multiplier).max(1.0)
    } else {
        1.0
    };
    sanitize(outgoing).max(0.0)
        * defense_factor(defense.defense, defense.penetration, defense.k)
        * elemental_multiplier(defense.resist)
        * broken
}

/// Final rounding of an intentional hit. Never below 1.
pub fn finalize_hit(amount: f64) -> u32 {
    let rounded = sanitize(amount).max(0.0).round();
    (rounded.min(f64::from(u32::MAX)) as u32).max(1)
}

/// Full physical hit in one call.
///
/// `modifiers` carries the attacker's buffs; `extra_crit` adds contextual crit
/// on top of `base_crit`.
#[allow(clippy::too_many_arguments)]
pub fn physical_damage(
    attack: f64,
    modifiers: &ModifierStack,
    defender_armor: f64,
    penetration: f64,
    base_crit: f64,
    variance_draw: f64,
    crit_draw: f64,
    formula: &FormulaConfig,
) -> u32 {
    let roll = roll_outgoing(
        OutgoingInput {
            stat: attack,
            potency: 1.0,
            multiplier: modifiers.multiplier(),
            crit_chance: base_crit,
        },
        variance_draw,
        crit_draw,
        formula,
    );
    finalize_hit(mitigate(
        roll.amount,
        DefenseInput {
            defense: defender_armor,
            penetration,
            k: formula.physical_k,
            resist: 0.0,
            broken: false,
        },
        formula,
    ))
}

/// Magic mirror of [`physical_damage`], using magic resist and the magic `K`.
#[allow(clippy::too_many_arguments)]
pub fn magic_damage(
    magic: f64,
    modifiers: &ModifierStack,
    defender_resist: f64,
    penetration: f64,
    base_crit: f64,
    variance_draw: f64,
    crit_draw: f64,
    formula: &FormulaConfig,
) -> u32 {
    let roll = roll_outgoing(
        OutgoingInput {
            stat: magic,
            potency: 1.0,
            multiplier: modifiers.multiplier(),
            crit_chance: base_crit,
        },
        variance_draw,
        crit_draw,
        formula,
    );
    finalize_hit(mitigate(
        roll.amount,
        DefenseInput {
            defense: defender_resist,
            penetration,
            k: formula.magic_k,
            resist: 0.0,
            broken: false,
        },
        formula,
    ))
}

/// `magic × potency × heal_modifier`, capped at `missing`.
pub fn heal_amount(magic: f64, potency: f64, heal_modifier: f64, missing: u32) -> u32 {
    let raw = sanitize(magic).max(0.0) * sanitize(potency).max(0.0) * sanitize(heal_modifier).max(0.0);
    let rounded = raw.round().min(f64::from(u32::MAX)) as u32;
    rounded.min(missing)
}

/// Contextual bonuses added to a hit's posture gain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PostureBonus {
    pub crit: bool,
    pub interrupt: bool,
    pub basic: bool,
}

/// Posture gained from one hit.
///
/// `raw × gain_ratio + bonuses`, capped at `per_hit_cap_ratio × maximum`
/// (never below 1) unless the pool is tiny.
pub fn posture_gain(raw: u32, bonus: PostureBonus, maximum: u32, config: &PostureConfig) -> u32 {
    let mut gain = f64::from(raw) * sanitize_ratio(config.gain_ratio);
    if bonus.crit {
        gain += sanitize(config.crit_bonus).max(0.0);
    }
    if bonus.interrupt {
        gain += sanitize(config.interrupt_bonus).max(0.0);
    }
    if bonus.basic {
        gain += sanitize(config.basic_attack_bonus).max(0.0);
    }
    let gain = gain.round().min(f64::from(u32::MAX)) as u32;

    if maximum <= config.tiny_pool_max {
        return gain;
    }
    let cap = (f64::from(maximum) * sanitize_ratio(config.per_hit_cap_ratio)).floor() as u32;
    gain.min(cap.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formula() -> FormulaConfig {
        FormulaConfig::default()
    }

    #[test]
    fn midpoint_draw_has_unit_variance() {
        assert!((variance(0.5, &formula()) - 1.0).abs() < 1e-9);
        assert!((variance(0.0, &formula()) - 0.85).abs() < 1e-9);
    }

    #[test]
    fn hundred_attack_into_no_armor() {
        let damage = physical_damage(100.0, &ModifierStack::new(), 0.0, 0.0, 0.0, 0.5, 0.99, &formula());
        assert_eq!(damage, 100);
    }

    #[test]
    fn crit_multiplies_outgoing() {
        let input = OutgoingInput {
            stat: 100.0,
            potency: 1.0,
            multiplier: 1.0,
            crit_chance: 0.5,
        };
        let roll = roll_outgoing(input, 0.5, 0.1, &formula());
        assert!(roll.crit);
        assert_eq!(finalize_hit(roll.amount), 150);
    }

    #[test]
    fn magic_uses_its_own_curve() {
        let physical = physical_damage(100.0, &ModifierStack::new(), 50.0, 0.0, 0.0, 0.5, 0.99, &formula());
        let magic = magic_damage(100.0, &ModifierStack::new(), 50.0, 0.0, 0.0, 0.5, 0.99, &formula());
        assert!(magic > physical);
    }

    #[test]
    fn hits_never_drop_below_one() {
        assert_eq!(finalize_hit(0.0), 1);
        assert_eq!(finalize_hit(f64::NAN), 1);
        assert_eq!(finalize_hit(-50.0), 1);
    }

    #[test]
    fn broken_target_takes_more() {
        let defense = DefenseInput {
            defense: 0.0,
            penetration: 0.0,
            k: 1.0,
            resist: 0.0,
            broken: true,
        };
        assert!((mitigate(100.0, defense, &formula()) - 125.0).abs() < 1e-9);
    }

    #[test]
    fn heal_is_capped_at_missing() {
        assert_eq!(heal_amount(40.0, 1.5, 1.0, 100), 60);
        assert_eq!(heal_amount(40.0, 1.5, 1.0, 12), 12);
        assert_eq!(heal_amount(f64::NAN, 1.5, 1.0, 12), 0);
    }

    #[test]
    fn posture_gain_is_capped_per_hit() {
        let config = PostureConfig::default();
        assert_eq!(posture_gain(100, PostureBonus::default(), 50, &config), 15);
        assert_eq!(posture_gain(20, PostureBonus::default(), 50, &config), 5);
    }

    #[test]
    fn tiny_pools_are_uncapped() {
        let config = PostureConfig::default();
        assert_eq!(posture_gain(100, PostureBonus::default(), 5, &config), 25);
    }

    #[test]
    fn bonuses_stack_before_cap() {
        let config = PostureConfig::default();
        let bonus = PostureBonus {
            crit: true,
            interrupt: true,
            basic: true,
        };
        assert_eq!(posture_gain(4, bonus, 100, &config), 8);
    }
}

//! Deterministic expectations used by the scorers.
//!
//! These mirror the resolution formulas with the random terms replaced by
//! their expected values (unit variance, crit weighted by its probability).

use crate::ability::{AbilityDef, EffectKind};
use crate::action::ActionContext;
use crate::combat::{
    DamageKind, DefenseInput, crit_chance, guard_factor, heal_amount, mitigate, sanitize,
};
use crate::config::CombatConfig;
use crate::state::{Combatant, StatusKind};

/// Expected damage of `def` against `target`, plus splash onto `others`
/// additional enemies (approximated with the target's own defenses).
pub fn expected_damage(
    actor: &Combatant,
    def: &AbilityDef,
    target: &Combatant,
    others: usize,
    config: &CombatConfig,
) -> f64 {
    let formula = &config.formula;
    let ctx = ActionContext::build(actor, def, config);
    let defender = target.effective_stats();
    let k = match def.kind {
        DamageKind::Physical => formula.physical_k,
        DamageKind::Magic => formula.magic_k,
    };

    let mut total = 0.0;
    for leaf in def.effect.leaves() {
        let EffectKind::Damage(damage) = leaf else {
            continue;
        };
        let mut chance = ctx.stats.crit_chance + ctx.crit_bonus + damage.crit_bonus;
        if target.is_broken() {
            chance += formula.broken_crit_bonus;
        }
        let chance = crit_chance(chance, 0.0, 0.0, formula.crit_ceiling);
        let crit_factor = 1.0 + chance * (sanitize(formula.crit_multiplier) - 1.0).max(0.0);

        let outgoing = ctx.scaling_stat()
            * ctx.potency
            * sanitize(damage.scale)
            * ctx.damage.multiplier()
            * crit_factor;
        let hit = mitigate(
            outgoing,
            DefenseInput {
                defense: defender.defense(def.kind),
                penetration: ctx.stats.penetration + damage.penetration,
                k,
                resist: target.resistances.get(def.element),
                broken: target.is_broken(),
            },
            formula,
        ) * guard_factor(target.statuses.magnitude(StatusKind::Guard), formula.guard_cap)
            * (1.0 + target.statuses.magnitude(StatusKind::Vulnerable));

        let splash = damage.splash.map_or(0.0, |f| sanitize(f).max(0.0)) * others as f64;
        total += hit * (1.0 + splash);
    }
    total
}

/// Expected health restored on `target`, capped at its missing health.
pub fn expected_heal(actor: &Combatant, def: &AbilityDef, target: &Combatant, config: &CombatConfig) -> f64 {
    let ctx = ActionContext::build(actor, def, config);
    let mut missing = target.health.missing();
    let mut total = 0.0;
    for leaf in def.effect.leaves() {
        if let EffectKind::Heal(heal) = leaf {
            let amount = heal_amount(
                ctx.stats.magic,
                ctx.potency * sanitize(heal.scale),
                ctx.heal_multiplier,
                missing,
            );
            missing -= amount;
            total += f64::from(amount);
        }
    }
    total
}

/// Expected shield granted by `def`.
pub fn expected_shield(actor: &Combatant, def: &AbilityDef, config: &CombatConfig) -> f64 {
    let ctx = ActionContext::build(actor, def, config);
    def.effect
        .leaves()
        .into_iter()
        .filter_map(|leaf| match leaf {
            EffectKind::Shield(shield) => {
                Some(ctx.scaling_stat() * ctx.potency * sanitize(shield.scale))
            }
            _ => None,
        })
        .sum()
}

/// Timed statuses `def` would newly place: `(duration, already active)` pairs.
///
/// Debuffs are checked against `target`, buffs and guards against `actor`.
pub fn status_terms(actor: &Combatant, def: &AbilityDef, target: &Combatant) -> Vec<(u32, bool)> {
    def.effect
        .leaves()
        .into_iter()
        .filter_map(|leaf| match leaf {
            EffectKind::Debuff(status) => Some((status.duration, target.statuses.has(status.kind))),
            EffectKind::Buff(status) => Some((status.duration, actor.statuses.has(status.kind))),
            EffectKind::Guard(guard) => {
                Some((guard.duration, actor.statuses.has(StatusKind::Guard)))
            }
            EffectKind::Damage(damage) => damage
                .on_hit
                .as_ref()
                .map(|status| (status.duration, target.statuses.has(status.kind))),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityId, DamageEffect, HealEffect};
    use crate::combat::DamageKind;
    use crate::state::{CombatantId, Side};
    use crate::stats::BaseStats;

    fn fighter(id: u32, side: Side, attack: f64, armor: f64) -> Combatant {
        Combatant::new(
            CombatantId(id),
            "fighter",
            side,
            100,
            BaseStats::new(attack, 40.0, armor, 0.0),
        )
    }

    #[test]
    fn damage_expectation_matches_formula_at_unit_variance() {
        let def = AbilityDef::new(
            AbilityId::BasicAttack,
            DamageKind::Physical,
            1.0,
            EffectKind::Damage(DamageEffect::single()),
        );
        let actor = fighter(0, Side::Player, 100.0, 0.0);
        let target = fighter(2, Side::Hostile, 10.0, 100.0);
        let expected = expected_damage(&actor, &def, &target, 0, &CombatConfig::default());
        assert!((expected - 50.0).abs() < 1e-6);
    }

    #[test]
    fn heal_expectation_is_capped() {
        let def = AbilityDef::new(
            AbilityId::Mend,
            DamageKind::Magic,
            1.0,
            EffectKind::Heal(HealEffect::default()),
        );
        let actor = fighter(1, Side::Companion, 10.0, 0.0);
        let mut target = fighter(0, Side::Player, 10.0, 0.0);
        assert_eq!(expected_heal(&actor, &def, &target, &CombatConfig::default()), 0.0);
        target.health.drain(15);
        assert_eq!(expected_heal(&actor, &def, &target, &CombatConfig::default()), 15.0);
    }
}

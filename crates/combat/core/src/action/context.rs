use crate::ability::{AbilityDef, AbilityId, AbilityTags};
use crate::combat::{DamageKind, Element};
use crate::config::CombatConfig;
use crate::state::{Combatant, CombatantId, Side};
use crate::stats::{EffectiveStats, Modifier, ModifierStack};

/// Read-only modifiers for one action.
///
/// Built from the actor's statuses, class mechanics and upgrade tier right
/// after the cost is paid, and dropped when the action finishes.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionContext {
    pub actor: CombatantId,
    pub side: Side,
    pub ability: AbilityId,
    pub kind: DamageKind,
    pub element: Element,
    pub tags: AbilityTags,
    pub stats: EffectiveStats,
    /// Definition potency times the upgrade multiplier.
    pub potency: f64,
    /// Outgoing damage modifiers (difficulty, rage).
    pub damage: ModifierStack,
    pub heal_multiplier: f64,
    /// Extra crit chance from upgrades.
    pub crit_bonus: f64,
}

impl ActionContext {
    pub fn build(actor: &Combatant, def: &AbilityDef, config: &CombatConfig) -> Self {
        let upgrade = actor.upgrades.get(def.id);
        let potency = def.potency * upgrade.map_or(1.0, |u| u.potency_multiplier());
        let crit_bonus = upgrade.map_or(0.0, |u| u.crit_bonus());

        let mut damage = ModifierStack::new();
        let difficulty = config.difficulty.damage_modifier(actor.side);
        if difficulty != 1.0 {
            damage.push(Modifier::More(difficulty - 1.0));
        }
        let rage = actor.resource.damage_bonus(&config.resources);
        if rage > 0.0 {
            damage.push(Modifier::Increased(rage));
        }

        Self {
            actor: actor.id,
            side: actor.side,
            ability: def.id,
            kind: def.kind,
            element: def.element,
            tags: def.tags,
            stats: actor.effective_stats(),
            potency,
            damage,
            heal_multiplier: 1.0,
            crit_bonus,
        }
    }

    pub fn scaling_stat(&self) -> f64 {
        self.stats.scaling(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityUpgrade, DamageEffect, EffectKind, UpgradePath, Upgrades};
    use crate::config::Difficulty;
    use crate::state::{ResourceKind, ResourcePool};
    use crate::stats::BaseStats;

    fn brute() -> Combatant {
        Combatant::new(
            CombatantId(2),
            "Brute",
            Side::Hostile,
            100,
            BaseStats::new(50.0, 0.0, 0.0, 0.0),
        )
    }

    fn strike() -> AbilityDef {
        AbilityDef::new(
            AbilityId::Crush,
            DamageKind::Physical,
            1.2,
            EffectKind::Damage(DamageEffect::single()),
        )
    }

    #[test]
    fn difficulty_and_rage_shape_damage() {
        let config = CombatConfig::new().with_difficulty(Difficulty::Hard);
        let mut actor = brute().with_resource(ResourcePool::new(ResourceKind::Rage, 100));
        actor.resource.gain(100);

        let ctx = ActionContext::build(&actor, &strike(), &config);
        // 1.25 (hard, hostile) × 1.25 (full rage)
        assert!((ctx.damage.multiplier() - 1.5625).abs() < 1e-9);
    }

    #[test]
    fn upgrades_raise_potency_and_crit() {
        let mut upgrades = Upgrades::new();
        upgrades.set(AbilityId::Crush, AbilityUpgrade::new(UpgradePath::Potency, 3));
        let actor = brute().with_upgrades(upgrades);

        let ctx = ActionContext::build(&actor, &strike(), &CombatConfig::default());
        assert!((ctx.potency - 1.2 * 1.45).abs() < 1e-9);
        assert!(ctx.crit_bonus > 0.0);
        assert!(ctx.damage.is_empty());
    }
}

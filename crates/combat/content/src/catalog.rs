//! Built-in ability catalog.
//!
//! Every [`AbilityId`] has exactly one definition here, so encounters built
//! against [`standard_book`] never fail the ability check. Data files may
//! override individual entries (see `AbilityBookLoader::load_over`).

use combat_core::{
    AbilityBook, AbilityDef, AbilityId, AbilityTags, DamageEffect, DamageKind, EffectKind, Element,
    GuardEffect, HealEffect, ShieldEffect, StatusApplication, StatusKind,
};
use strum::IntoEnumIterator;

/// The default ability book.
pub fn standard_book() -> AbilityBook {
    AbilityId::iter().map(definition).collect()
}

/// Default definition of `id`.
pub fn definition(id: AbilityId) -> AbilityDef {
    use AbilityId::*;

    match id {
        // Universal
        BasicAttack => AbilityDef::new(
            id,
            DamageKind::Physical,
            1.0,
            EffectKind::Damage(DamageEffect::single()),
        )
        .with_name("Attack")
        .with_tags(AbilityTags::BASIC),
        Defend => AbilityDef::new(
            id,
            DamageKind::Physical,
            0.0,
            EffectKind::Guard(GuardEffect {
                reduction: 0.5,
                duration: 1,
            }),
        ),

        // Martial
        PowerStrike => AbilityDef::new(
            id,
            DamageKind::Physical,
            1.6,
            EffectKind::Damage(DamageEffect::single().with_crit_bonus(0.1)),
        )
        .with_name("Power Strike")
        .with_cost(20)
        .with_cooldown(1)
        .with_tags(AbilityTags::FINISHER),
        Cleave => AbilityDef::new(
            id,
            DamageKind::Physical,
            1.1,
            EffectKind::Damage(DamageEffect::splash(0.6)),
        )
        .with_cost(25)
        .with_cooldown(2)
        .with_tags(AbilityTags::AREA),
        ShieldBash => AbilityDef::new(
            id,
            DamageKind::Physical,
            0.7,
            EffectKind::Damage(DamageEffect::single().interrupting()),
        )
        .with_name("Shield Bash")
        .with_cost(15)
        .with_cooldown(3),
        Rend => AbilityDef::new(
            id,
            DamageKind::Physical,
            0.6,
            EffectKind::Damage(
                DamageEffect::single()
                    .with_on_hit(StatusApplication::scaled(StatusKind::Bleed, 0.25, 3)),
            ),
        )
        .with_cost(10),
        Sunder => AbilityDef::new(
            id,
            DamageKind::Physical,
            0.9,
            EffectKind::Composite(vec![
                EffectKind::Damage(DamageEffect::single().with_penetration(0.3)),
                EffectKind::Debuff(StatusApplication::flat(StatusKind::ArmorDown, 0.3, 3)),
            ]),
        )
        .with_cost(20)
        .with_cooldown(2),
        WarCry => AbilityDef::new(
            id,
            DamageKind::Physical,
            0.0,
            EffectKind::Buff(StatusApplication::flat(StatusKind::AttackUp, 0.3, 3)),
        )
        .with_name("War Cry")
        .with_cost(20)
        .with_cooldown(4),
        Evade => AbilityDef::new(
            id,
            DamageKind::Physical,
            0.0,
            EffectKind::Buff(StatusApplication::flat(StatusKind::Dodge, 0.5, 2)),
        )
        .with_cooldown(3),

        // Arcane
        Fireball => AbilityDef::new(
            id,
            DamageKind::Magic,
            1.8,
            EffectKind::Damage(
                DamageEffect::single()
                    .with_on_hit(StatusApplication::scaled(StatusKind::Burn, 0.1, 2)),
            ),
        )
        .with_element(Element::Fire)
        .with_cost(30)
        .with_cooldown(1),
        FrostLance => AbilityDef::new(
            id,
            DamageKind::Magic,
            1.3,
            EffectKind::Damage(
                DamageEffect::single()
                    .with_on_hit(StatusApplication::flat(StatusKind::Vulnerable, 0.1, 2)),
            ),
        )
        .with_name("Frost Lance")
        .with_element(Element::Frost)
        .with_cost(20),
        Venom => AbilityDef::new(
            id,
            DamageKind::Magic,
            0.0,
            EffectKind::Debuff(StatusApplication::scaled(StatusKind::Poison, 0.3, 3)),
        )
        .with_element(Element::Poison)
        .with_cost(15)
        .with_cooldown(1),
        Hex => AbilityDef::new(
            id,
            DamageKind::Magic,
            0.0,
            EffectKind::Debuff(StatusApplication::flat(StatusKind::Vulnerable, 0.2, 2)),
        )
        .with_element(Element::Shadow)
        .with_cost(15)
        .with_cooldown(2),
        Mend => AbilityDef::new(
            id,
            DamageKind::Magic,
            1.2,
            EffectKind::Heal(HealEffect::default()),
        )
        .with_element(Element::Holy)
        .with_cost(25)
        .with_cooldown(1),
        Barrier => AbilityDef::new(
            id,
            DamageKind::Magic,
            1.0,
            EffectKind::Shield(ShieldEffect::new(2)),
        )
        .with_cost(20)
        .with_cooldown(2),

        // Hostile signatures
        Enrage => AbilityDef::new(
            id,
            DamageKind::Physical,
            0.0,
            EffectKind::Composite(vec![
                EffectKind::Buff(StatusApplication::flat(StatusKind::AttackUp, 0.4, 3)),
                EffectKind::Buff(StatusApplication::flat(StatusKind::ArmorUp, 0.2, 3)),
            ]),
        )
        .with_cooldown(5),
        Crush => AbilityDef::new(
            id,
            DamageKind::Physical,
            2.2,
            EffectKind::Damage(DamageEffect::single()),
        )
        .with_telegraph(1)
        .with_cooldown(3)
        .with_tags(AbilityTags::SIGNATURE),
        Meteor => AbilityDef::new(
            id,
            DamageKind::Magic,
            1.6,
            EffectKind::Damage(DamageEffect::splash(0.5)),
        )
        .with_element(Element::Fire)
        .with_telegraph(2)
        .with_cooldown(5)
        .with_tags(AbilityTags::SIGNATURE | AbilityTags::AREA),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_ability_has_a_definition() {
        let book = standard_book();
        let ids: Vec<AbilityId> = AbilityId::iter().collect();
        assert_eq!(book.len(), ids.len());
        assert!(book.missing(ids.iter()).is_empty());
    }

    #[test]
    fn only_signatures_are_telegraphed() {
        for def in standard_book().iter() {
            assert_eq!(
                def.is_telegraphed(),
                def.tags.contains(AbilityTags::SIGNATURE),
                "{}",
                def.id
            );
        }
    }

    #[test]
    fn basic_attack_is_free() {
        let basic = definition(AbilityId::BasicAttack);
        assert_eq!(basic.cost, 0);
        assert_eq!(basic.cooldown, 0);
        assert!(basic.tags.contains(AbilityTags::BASIC));
    }
}

//! Combatant statistics.
//!
//! [`BaseStats`] are the values an encounter hands in. [`EffectiveStats`]
//! fold the owner's active statuses into them through a [`ModifierStack`];
//! they are recomputed on demand and never stored.

pub mod modifiers;

pub use modifiers::{Modifier, ModifierStack};

use crate::combat::{DamageKind, sanitize, sanitize_ratio};
use crate::state::{StatusKind, StatusLedger};

/// Stats supplied by the encounter.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub attack: f64,
    pub magic: f64,
    pub armor: f64,
    pub magic_resist: f64,
    pub speed: f64,
    /// Base crit probability (gear included).
    pub crit_chance: f64,
    /// Fraction of the defender's armor/resist ignored.
    pub penetration: f64,
}

impl BaseStats {
    pub fn new(attack: f64, magic: f64, armor: f64, magic_resist: f64) -> Self {
        Self {
            attack,
            magic,
            armor,
            magic_resist,
            ..Self::default()
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_crit_chance(mut self, crit_chance: f64) -> Self {
        self.crit_chance = crit_chance;
        self
    }

    pub fn with_penetration(mut self, penetration: f64) -> Self {
        self.penetration = penetration;
        self
    }

    /// True when every field is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.attack,
            self.magic,
            self.armor,
            self.magic_resist,
            self.speed,
            self.crit_chance,
            self.penetration,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Always-on passive traits.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Passives {
    /// Fraction of damage dealt returned as health.
    pub life_steal: f64,
    /// Fraction of damage taken reflected to the attacker.
    pub thorns: f64,
    /// Resource refunded on a critical hit.
    pub crit_refund: u32,
    /// Fraction of maximum health restored each round.
    pub regen: f64,
}

/// Stats after status modifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectiveStats {
    pub attack: f64,
    pub magic: f64,
    pub armor: f64,
    pub magic_resist: f64,
    pub crit_chance: f64,
    pub penetration: f64,
}

impl EffectiveStats {
    pub fn resolve(base: &BaseStats, statuses: &StatusLedger) -> Self {
        let attack = ModifierStack::new()
            .with(Modifier::Increased(statuses.magnitude(StatusKind::AttackUp)))
            .with(Modifier::Less(statuses.magnitude(StatusKind::AttackDown)));
        let magic =
            ModifierStack::new().with(Modifier::Increased(statuses.magnitude(StatusKind::MagicUp)));
        let armor = ModifierStack::new()
            .with(Modifier::Increased(statuses.magnitude(StatusKind::ArmorUp)))
            .with(Modifier::Less(statuses.magnitude(StatusKind::ArmorDown)));

        Self {
            attack: attack.apply(sanitize(base.attack).max(0.0)),
            magic: magic.apply(sanitize(base.magic).max(0.0)),
            armor: armor.apply(sanitize(base.armor).max(0.0)),
            magic_resist: sanitize(base.magic_resist).max(0.0),
            crit_chance: sanitize_ratio(base.crit_chance),
            penetration: sanitize_ratio(base.penetration),
        }
    }

    /// Scaling stat for an ability family.
    pub fn scaling(&self, kind: DamageKind) -> f64 {
        match kind {
            DamageKind::Physical => self.attack,
            DamageKind::Magic => self.magic,
        }
    }

    /// Defense stat against an ability family.
    pub fn defense(&self, kind: DamageKind) -> f64 {
        match kind {
            DamageKind::Physical => self.armor,
            DamageKind::Magic => self.magic_resist,
        }
    }
}

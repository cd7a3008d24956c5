//! Ability definitions.
//!
//! An ability is immutable data ([`AbilityDef`]) plus a closed effect
//! description ([`EffectKind`]) that the resolution engine dispatches on.
//! Which abilities a combatant may use is supplied by the caller as a kit of
//! [`AbilityId`]s; the engine never decides what is unlocked.

pub mod book;
pub mod effect;
pub mod upgrade;

pub use book::AbilityBook;
pub use effect::{
    DamageEffect, EffectKind, GuardEffect, HealEffect, ShieldEffect, StatusApplication,
};
pub use upgrade::{AbilityUpgrade, UpgradePath, Upgrades};

use bitflags::bitflags;

use crate::combat::{DamageKind, Element};

/// Closed set of ability identifiers.
///
/// Used as the key of cooldown tables, upgrade tables and decision memory, so
/// a typo can never fragment learned values.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::Display,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AbilityId {
    // ========================================================================
    // Universal
    // ========================================================================
    BasicAttack,
    Defend,

    // ========================================================================
    // Martial
    // ========================================================================
    PowerStrike,
    Cleave,
    ShieldBash,
    Rend,
    Sunder,
    WarCry,
    Evade,

    // ========================================================================
    // Arcane
    // ========================================================================
    Fireball,
    FrostLance,
    Venom,
    Hex,
    Mend,
    Barrier,

    // ========================================================================
    // Hostile signatures
    // ========================================================================
    Enrage,
    Crush,
    Meteor,
}

impl AbilityId {
    /// The action every combatant falls back to when nothing else is usable.
    pub const FALLBACK: Self = Self::BasicAttack;

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Broad category, used by scoring heuristics and presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityCategory {
    Damage,
    Heal,
    Shield,
    Buff,
    Debuff,
    Guard,
}

/// Who an ability is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetKind {
    /// A living member of the opposing side.
    Enemy,
    /// A living member of the caster's side (the caster itself if none given).
    Ally,
    /// Always the caster.
    Caster,
}

bitflags! {
    /// Descriptive tags that feed posture bonuses and AI heuristics.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AbilityTags: u8 {
        /// Plain weapon attack; grants a small posture bonus.
        const BASIC = 1;
        /// Hits several targets.
        const AREA = 1 << 1;
        /// Delivered after a telegraph.
        const SIGNATURE = 1 << 2;
        /// Scored higher against wounded targets.
        const FINISHER = 1 << 3;
    }
}

/// Immutable ability definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDef {
    pub id: AbilityId,
    pub name: String,
    /// Secondary-resource cost before upgrade modifiers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: u32,
    /// Rounds the ability stays unavailable after use.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u32,
    /// Own turns between declaration and execution. `None` resolves at once.
    #[cfg_attr(feature = "serde", serde(default))]
    pub telegraph: Option<u32>,
    /// Physical abilities scale with attack and meet armor; magic ones scale
    /// with magic and meet magic resist.
    pub kind: DamageKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    /// Base multiplier on the scaling stat.
    pub potency: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: AbilityTags,
    pub effect: EffectKind,
}

impl AbilityDef {
    pub fn new(id: AbilityId, kind: DamageKind, potency: f64, effect: EffectKind) -> Self {
        Self {
            id,
            name: id.as_str().replace('_', " "),
            cost: 0,
            cooldown: 0,
            telegraph: None,
            kind,
            element: Element::Neutral,
            potency,
            tags: AbilityTags::empty(),
            effect,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_telegraph(mut self, turns: u32) -> Self {
        self.telegraph = (turns > 0).then_some(turns);
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_tags(mut self, tags: AbilityTags) -> Self {
        self.tags = tags;
        self
    }

    pub fn category(&self) -> AbilityCategory {
        self.effect.category()
    }

    pub fn target_kind(&self) -> TargetKind {
        self.effect.target_kind()
    }

    pub fn is_telegraphed(&self) -> bool {
        self.telegraph.is_some()
    }

    /// True if resolving this ability can interrupt a pending intent.
    pub fn interrupts(&self) -> bool {
        self.effect.interrupts()
    }
}

//! Effect kinds carried by ability definitions.
//!
//! The set is closed on purpose: the resolution engine matches on
//! [`EffectKind`] exhaustively, so adding a kind without a handler fails to
//! compile.

use crate::state::StatusKind;

use super::{AbilityCategory, TargetKind};

/// The actual effect an ability produces.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Damage to an enemy (plus optional splash to the rest of its side).
    Damage(DamageEffect),
    /// Restore health to an ally, capped at missing health.
    Heal(HealEffect),
    /// Add an absorb shield to an ally.
    Shield(ShieldEffect),
    /// Timed status on the caster or an ally.
    Buff(StatusApplication),
    /// Timed status on an enemy.
    Debuff(StatusApplication),
    /// Damage reduction on the caster.
    Guard(GuardEffect),
    /// Several effects resolved in order against the same target.
    Composite(Vec<EffectKind>),
}

impl EffectKind {
    pub fn category(&self) -> AbilityCategory {
        match self {
            Self::Damage(_) => AbilityCategory::Damage,
            Self::Heal(_) => AbilityCategory::Heal,
            Self::Shield(_) => AbilityCategory::Shield,
            Self::Buff(_) => AbilityCategory::Buff,
            Self::Debuff(_) => AbilityCategory::Debuff,
            Self::Guard(_) => AbilityCategory::Guard,
            Self::Composite(parts) => parts
                .first()
                .map(EffectKind::category)
                .unwrap_or(AbilityCategory::Buff),
        }
    }

    pub fn target_kind(&self) -> TargetKind {
        match self {
            Self::Damage(_) | Self::Debuff(_) => TargetKind::Enemy,
            Self::Heal(_) | Self::Shield(_) => TargetKind::Ally,
            Self::Buff(_) | Self::Guard(_) => TargetKind::Caster,
            Self::Composite(parts) => parts
                .first()
                .map(EffectKind::target_kind)
                .unwrap_or(TargetKind::Caster),
        }
    }

    pub fn interrupts(&self) -> bool {
        match self {
            Self::Damage(damage) => damage.interrupts,
            Self::Composite(parts) => parts.iter().any(EffectKind::interrupts),
            _ => false,
        }
    }

    /// Largest splash fraction among the damage parts, if any.
    pub fn splash(&self) -> Option<f64> {
        match self {
            Self::Damage(damage) => damage.splash,
            Self::Composite(parts) => parts
                .iter()
                .filter_map(EffectKind::splash)
                .fold(None, |best, s| Some(best.map_or(s, |b: f64| b.max(s)))),
            _ => None,
        }
    }

    /// Flattened view of the leaf effects, in resolution order.
    pub fn leaves(&self) -> Vec<&EffectKind> {
        match self {
            Self::Composite(parts) => parts.iter().flat_map(EffectKind::leaves).collect(),
            leaf => vec![leaf],
        }
    }
}

fn unit_scale() -> f64 {
    1.0
}

/// Deal damage to the primary target, and a fraction of it to every other
/// living member of the target's side when `splash` is set.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEffect {
    /// Multiplier on the ability potency for this part.
    #[cfg_attr(feature = "serde", serde(default = "unit_scale"))]
    pub scale: f64,
    /// Fraction of the primary hit dealt to each other target.
    #[cfg_attr(feature = "serde", serde(default))]
    pub splash: Option<f64>,
    /// Extra armor/resist penetration on top of the attacker's own.
    #[cfg_attr(feature = "serde", serde(default))]
    pub penetration: f64,
    /// Extra crit chance for this hit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub crit_bonus: f64,
    /// Clears the primary target's pending intent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub interrupts: bool,
    /// Status applied to every target that took damage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_hit: Option<StatusApplication>,
}

impl DamageEffect {
    pub fn single() -> Self {
        Self {
            scale: 1.0,
            splash: None,
            penetration: 0.0,
            crit_bonus: 0.0,
            interrupts: false,
            on_hit: None,
        }
    }

    pub fn splash(fraction: f64) -> Self {
        Self {
            splash: Some(fraction),
            ..Self::single()
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_penetration(mut self, penetration: f64) -> Self {
        self.penetration = penetration;
        self
    }

    pub fn with_crit_bonus(mut self, crit_bonus: f64) -> Self {
        self.crit_bonus = crit_bonus;
        self
    }

    pub fn interrupting(mut self) -> Self {
        self.interrupts = true;
        self
    }

    pub fn with_on_hit(mut self, status: StatusApplication) -> Self {
        self.on_hit = Some(status);
        self
    }
}

/// Restore health.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealEffect {
    #[cfg_attr(feature = "serde", serde(default = "unit_scale"))]
    pub scale: f64,
}

impl Default for HealEffect {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Grant an absorb shield worth `magic × potency × scale` for `duration` rounds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShieldEffect {
    #[cfg_attr(feature = "serde", serde(default = "unit_scale"))]
    pub scale: f64,
    pub duration: u32,
}

impl ShieldEffect {
    pub fn new(duration: u32) -> Self {
        Self {
            scale: 1.0,
            duration,
        }
    }
}

/// Reduce incoming damage on the caster.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuardEffect {
    /// Damage-reduction fraction.
    pub reduction: f64,
    pub duration: u32,
}

/// A timed status to apply.
///
/// When `scales` is set the final magnitude is `magnitude × scaling stat` of
/// the caster (attack for physical abilities, magic for magic ones); otherwise
/// `magnitude` is used as-is.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusApplication {
    pub kind: StatusKind,
    pub magnitude: f64,
    pub duration: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scales: bool,
}

impl StatusApplication {
    pub fn flat(kind: StatusKind, magnitude: f64, duration: u32) -> Self {
        Self {
            kind,
            magnitude,
            duration,
            scales: false,
        }
    }

    pub fn scaled(kind: StatusKind, ratio: f64, duration: u32) -> Self {
        Self {
            kind,
            magnitude: ratio,
            duration,
            scales: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_reports_first_part() {
        let effect = EffectKind::Composite(vec![
            EffectKind::Damage(DamageEffect::single().with_scale(0.5)),
            EffectKind::Debuff(StatusApplication::flat(StatusKind::ArmorDown, 0.3, 3)),
        ]);
        assert_eq!(effect.category(), AbilityCategory::Damage);
        assert_eq!(effect.target_kind(), TargetKind::Enemy);
        assert_eq!(effect.leaves().len(), 2);
    }

    #[test]
    fn splash_and_interrupt_found_in_composites() {
        let effect = EffectKind::Composite(vec![
            EffectKind::Guard(GuardEffect {
                reduction: 0.2,
                duration: 1,
            }),
            EffectKind::Damage(DamageEffect::splash(0.7).interrupting()),
        ]);
        assert_eq!(effect.splash(), Some(0.7));
        assert!(effect.interrupts());
    }
}

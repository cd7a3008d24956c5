use std::collections::BTreeMap;

use super::sanitize;

/// Scaling family of an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageKind {
    /// Scales with attack, mitigated by armor.
    Physical,
    /// Scales with magic, mitigated by magic resist.
    Magic,
}

/// Elemental tag carried by abilities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Element {
    /// No elemental interaction.
    #[default]
    Neutral,
    Fire,
    Frost,
    Lightning,
    Poison,
    Holy,
    Shadow,
}

/// Per-element resistance fractions. Negative values are weaknesses.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resistances {
    values: BTreeMap<Element, f64>,
}

impl Resistances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, element: Element, resist: f64) -> Self {
        self.set(element, resist);
        self
    }

    pub fn set(&mut self, element: Element, resist: f64) {
        if element == Element::Neutral {
            return;
        }
        self.values.insert(element, sanitize(resist));
    }

    /// Raw resistance against `element`; `0.0` when unlisted.
    pub fn get(&self, element: Element) -> f64 {
        self.values.get(&element).copied().unwrap_or(0.0)
    }

    pub fn multiplier(&self, element: Element) -> f64 {
        elemental_multiplier(self.get(element))
    }
}

/// Damage multiplier for a resistance fraction: `1 - clamp(resist, -1.0, 0.9)`.
///
/// A full weakness doubles damage; resistance never grants immunity.
pub fn elemental_multiplier(resist: f64) -> f64 {
    1.0 - sanitize(resist).clamp(-1.0, 0.9)
}

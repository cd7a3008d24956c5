//! Layered multiplier stack.
//!
//! Application order: Increased (summed, applied once) → More (sequential) →
//! Less (sequential). Keeping additive buffs inside one bucket is what stops
//! two "+20%" sources from compounding.

/// A single modifier. Values are fractions (`0.2` = 20%).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Modifier {
    /// Summed with other increases, then multiplied once.
    Increased(f64),
    /// Multiplied individually: `× (1 + value)`.
    More(f64),
    /// Multiplied individually: `× (1 - value)`.
    Less(f64),
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierStack {
    modifiers: Vec<Modifier>,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    pub fn with(mut self, modifier: Modifier) -> Self {
        self.push(modifier);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Combined multiplier. Non-finite entries are ignored; the result is
    /// never negative.
    pub fn multiplier(&self) -> f64 {
        let finite = |value: f64| if value.is_finite() { value } else { 0.0 };

        let increased: f64 = self
            .modifiers
            .iter()
            .filter_map(|m| match m {
                Modifier::Increased(v) => Some(finite(*v)),
                _ => None,
            })
            .sum();

        let mut total = (1.0 + increased).max(0.0);
        for modifier in &self.modifiers {
            match modifier {
                Modifier::More(v) => total *= (1.0 + finite(*v)).max(0.0),
                Modifier::Less(v) => total *= (1.0 - finite(*v).clamp(0.0, 1.0)).max(0.0),
                Modifier::Increased(_) => {}
            }
        }
        total
    }

    /// Applies the stack to `base`.
    pub fn apply(&self, base: f64) -> f64 {
        let base = if base.is_finite() { base } else { 0.0 };
        base * self.multiplier()
    }
}

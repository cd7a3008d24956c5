//! Numeric formula library.
//!
//! Pure functions only: no function here touches battle state or draws from
//! a random source. Callers pass the draws in.

pub mod crit;
pub mod damage;
pub mod element;
pub mod mitigation;

pub use crit::{crit_chance, roll_crit};
pub use damage::{
    DefenseInput, OutgoingInput, OutgoingRoll, PostureBonus, finalize_hit, heal_amount,
    magic_damage, mitigate, physical_damage, posture_gain, roll_outgoing, variance,
};
pub use element::{DamageKind, Element, Resistances, elemental_multiplier};
pub use mitigation::{defense_factor, guard_factor};

/// Replaces non-finite values with `0.0`.
#[inline]
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Sanitizes and clamps to `[0, 1]`.
#[inline]
pub fn sanitize_ratio(value: f64) -> f64 {
    sanitize(value).clamp(0.0, 1.0)
}

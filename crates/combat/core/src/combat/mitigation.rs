//! Diminishing-returns defense curve.

use super::{sanitize, sanitize_ratio};

/// `100 / (100 + effective_defense * k)`.
///
/// Penetration removes a fraction of the defense before the curve is applied.
/// Negative or non-finite inputs count as zero defense.
pub fn defense_factor(defense: f64, penetration: f64, k: f64) -> f64 {
    let defense = sanitize(defense).max(0.0);
    let effective = defense * (1.0 - sanitize_ratio(penetration));
    let k = sanitize(k).max(0.0);
    100.0 / (100.0 + effective * k)
}

/// Multiplier from a guard's damage-reduction fraction, capped at `cap`.
pub fn guard_factor(reduction: f64, cap: f64) -> f64 {
    1.0 - sanitize_ratio(reduction).min(sanitize_ratio(cap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_armor_is_identity() {
        assert_eq!(defense_factor(0.0, 0.0, 1.0), 1.0);
    }

    #[test]
    fn hundred_armor_halves_damage() {
        assert!((defense_factor(100.0, 0.0, 1.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn penetration_shrinks_effective_armor() {
        let full = defense_factor(100.0, 0.0, 1.0);
        let pierced = defense_factor(100.0, 0.5, 1.0);
        assert!(pierced > full);
        assert_eq!(defense_factor(100.0, 1.0, 1.0), 1.0);
    }

    #[test]
    fn guard_respects_cap() {
        assert!((guard_factor(0.95, 0.8) - 0.2).abs() < 1e-9);
        assert_eq!(guard_factor(f64::INFINITY, 0.8), 1.0);
    }
}

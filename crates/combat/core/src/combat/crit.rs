use super::sanitize;

/// Combined crit probability, clamped to `[0, ceiling]`.
pub fn crit_chance(base: f64, gear: f64, contextual: f64, ceiling: f64) -> f64 {
    let total = sanitize(base) + sanitize(gear) + sanitize(contextual);
    total.clamp(0.0, sanitize(ceiling).clamp(0.0, 1.0))
}

/// Single Bernoulli trial: `draw < chance`.
pub fn roll_crit(chance: f64, draw: f64) -> bool {
    sanitize(draw) < sanitize(chance)
}

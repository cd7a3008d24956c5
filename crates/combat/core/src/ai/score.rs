use crate::ability::AbilityId;
use crate::state::CombatantId;

/// Scoring breakdown for one candidate ability.
///
/// Every component is expressed in "fraction of a health bar" units so the
/// heuristic terms and the learned reward are directly comparable.
///
/// ```text
/// value = estimate + lethality + synergy + stance + learned
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbilityScore {
    pub ability: AbilityId,
    pub target: Option<CombatantId>,
    /// Expected damage/heal/shield/status value of the ability itself.
    pub estimate: f64,
    /// Bonus when the hit is expected to finish the target.
    pub lethality: f64,
    /// Interaction with statuses and intents already on the target.
    pub synergy: f64,
    /// Health-driven preference for defensive abilities.
    pub stance: f64,
    /// Weighted learned value for this (actor, ability) pair.
    pub learned: f64,
}

impl AbilityScore {
    pub fn new(ability: AbilityId, target: Option<CombatantId>) -> Self {
        Self {
            ability,
            target,
            estimate: 0.0,
            lethality: 0.0,
            synergy: 0.0,
            stance: 0.0,
            learned: 0.0,
        }
    }

    pub fn value(&self) -> f64 {
        let total = self.estimate + self.lethality + self.synergy + self.stance + self.learned;
        if total.is_finite() { total } else { 0.0 }
    }
}

/// Index of the highest value; the earliest entry wins ties.
pub fn best_index(scores: &[AbilityScore]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, score) in scores.iter().enumerate() {
        let value = score.value();
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

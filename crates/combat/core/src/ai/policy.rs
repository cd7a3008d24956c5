//! Pluggable scoring and reward functions.
//!
//! The [`Agent`](super::Agent) owns the decision mechanism; a
//! [`DecisionPolicy`] only answers three questions about the battlefield:
//! whom to aim an ability at, how good it looks, and how well it went.

use crate::ability::{AbilityDef, AbilityId, EffectKind, TargetKind};
use crate::action::{AppliedEffect, Resolution, select_target};
use crate::config::CombatConfig;
use crate::state::{BattleState, Combatant, CombatantId};

use super::estimate::{expected_damage, expected_heal, expected_shield, status_terms};
use super::score::AbilityScore;

/// Read-only view of the battlefield from one actor's perspective.
#[derive(Clone, Copy)]
pub struct DecisionView<'a> {
    pub state: &'a BattleState,
    pub actor: &'a Combatant,
    pub config: &'a CombatConfig,
}

impl<'a> DecisionView<'a> {
    pub fn new(state: &'a BattleState, actor: &'a Combatant, config: &'a CombatConfig) -> Self {
        Self {
            state,
            actor,
            config,
        }
    }

    pub fn enemies(&self) -> impl Iterator<Item = &'a Combatant> + 'a {
        let state = self.state;
        state
            .living_enemies_of(self.actor.side)
            .into_iter()
            .filter_map(move |id| state.combatant(id))
    }

    pub fn allies(&self) -> impl Iterator<Item = &'a Combatant> + 'a {
        let state = self.state;
        state
            .living_allies_of(self.actor.side)
            .into_iter()
            .filter_map(move |id| state.combatant(id))
    }

    /// Health fraction of the actor, the input of the defensive stance term.
    pub fn health_fraction(&self) -> f64 {
        self.actor.health.fraction()
    }
}

/// Scoring and reward functions of one kind of agent.
pub trait DecisionPolicy: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Preferred target for `def`, or `None` when it has nothing to aim at.
    fn choose_target(&self, view: &DecisionView<'_>, def: &AbilityDef) -> Option<CombatantId>;

    /// Heuristic score of `def` aimed at `target`. The agent adds the learned
    /// term afterwards.
    fn score(
        &self,
        view: &DecisionView<'_>,
        def: &AbilityDef,
        target: Option<CombatantId>,
    ) -> AbilityScore;

    /// Scalar reward for a finished resolution, read against the state after
    /// the action was applied.
    fn reward(&self, state: &BattleState, config: &CombatConfig, resolution: &Resolution) -> f64;
}

// ============================================================================
// Shared scoring helpers
// ============================================================================

/// Fallback target rule shared by both policies.
pub(super) fn default_target(view: &DecisionView<'_>, def: &AbilityDef) -> Option<CombatantId> {
    select_target(view.state, view.actor, def.target_kind(), None)
}

/// Living target with the lowest health fraction; roster order breaks ties.
pub(super) fn weakest<'a>(candidates: impl Iterator<Item = &'a Combatant>) -> Option<CombatantId> {
    let mut best: Option<(CombatantId, f64)> = None;
    for candidate in candidates {
        let fraction = candidate.health.fraction();
        match best {
            Some((_, lowest)) if fraction >= lowest => {}
            _ => best = Some((candidate.id, fraction)),
        }
    }
    best.map(|(id, _)| id)
}

/// Fills the components every policy computes the same way.
pub(super) fn base_score(
    view: &DecisionView<'_>,
    def: &AbilityDef,
    target: Option<CombatantId>,
) -> AbilityScore {
    let mut score = AbilityScore::new(def.id, target);
    let config = view.config;
    let Some(target) = target.and_then(|id| view.state.combatant(id)) else {
        return score;
    };

    match def.target_kind() {
        TargetKind::Enemy => {
            let others = view.enemies().filter(|e| e.id != target.id).count();
            let damage = expected_damage(view.actor, def, target, others, config);
            let max = f64::from(target.health.maximum().max(1));
            score.estimate += config.rewards.damage * damage / max;
            if damage > 0.0 && damage >= f64::from(target.health.current()) {
                score.lethality = config.decision.lethal_bonus;
            }
            if damage > 0.0 {
                score.synergy +=
                    config.decision.synergy_bonus * target.statuses.debuff_count() as f64;
            }
        }
        TargetKind::Ally | TargetKind::Caster => {
            let max = f64::from(target.health.maximum().max(1));
            let heal = expected_heal(view.actor, def, target, config);
            let shield = expected_shield(view.actor, def, config);
            score.estimate += config.rewards.heal * heal / max;
            score.estimate += config.rewards.shield * shield / max;
        }
    }

    for (duration, active) in status_terms(view.actor, def, target) {
        if !active {
            score.estimate += config.rewards.status * f64::from(duration);
        }
    }

    if is_defensive(def) {
        score.stance = config.decision.defensive_bias * (1.0 - view.health_fraction());
    }
    score
}

fn is_defensive(def: &AbilityDef) -> bool {
    def.effect.leaves().into_iter().any(|leaf| {
        matches!(
            leaf,
            EffectKind::Guard(_) | EffectKind::Buff(_) | EffectKind::Shield(_) | EffectKind::Heal(_)
        )
    })
}

/// Damage as a fraction of each target's max health, plus weighted support
/// and finishing-blow bonuses.
pub(super) fn shaped_reward(state: &BattleState, config: &CombatConfig, resolution: &Resolution) -> f64 {
    let weights = &config.rewards;
    let max_of = |id: CombatantId| {
        state
            .combatant(id)
            .map_or(1.0, |c| f64::from(c.health.maximum().max(1)))
    };

    let mut reward = 0.0;
    for effect in &resolution.effects {
        reward += match *effect {
            AppliedEffect::Damage {
                target,
                amount,
                absorbed,
                killed,
                ..
            } => {
                let hit = weights.damage * f64::from(amount + absorbed) / max_of(target);
                if killed { hit + weights.kill_bonus } else { hit }
            }
            AppliedEffect::Heal { target, amount } => {
                weights.heal * f64::from(amount) / max_of(target)
            }
            AppliedEffect::Shield { target, amount } => {
                weights.shield * f64::from(amount) / max_of(target)
            }
            AppliedEffect::Status { duration, .. } => weights.status * f64::from(duration),
            _ => 0.0,
        };
    }
    if reward.is_finite() { reward } else { 0.0 }
}

/// Ability used when nothing else is usable or nothing clears the margin.
pub(super) fn fallback_ability() -> AbilityId {
    AbilityId::FALLBACK
}

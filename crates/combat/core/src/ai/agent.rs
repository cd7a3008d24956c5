//! Epsilon-greedy learning agent shared by hostiles and companions.
//!
//! Pipeline per turn:
//! 1. Gather usable kit abilities that have a target (empty → fallback)
//! 2. Score each: policy heuristic + `learned_weight * learned value`
//! 3. With probability ε pick uniformly at random (exploration)
//! 4. Otherwise take the best score; ties go to the earlier kit entry
//! 5. Abstain to the plain attack when the winner does not clear it by a margin
//!
//! After the chosen ability resolved, [`Agent::learn`] folds the policy's
//! reward into the actor's [`DecisionMemory`](crate::state::DecisionMemory).

use tracing::debug;

use crate::ability::{AbilityDef, AbilityId};
use crate::action::{Resolution, check_usable};
use crate::config::DecisionConfig;
use crate::env::{CombatEnv, RandomSource};
use crate::state::{BattleState, CombatantId};

use super::policy::{DecisionPolicy, DecisionView, fallback_ability};
use super::score::{AbilityScore, best_index};

/// How the chosen ability was arrived at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionKind {
    /// Highest score.
    Greedy,
    /// Random pick under exploration.
    Explored,
    /// Nothing cleared the margin over the plain attack.
    Abstained,
    /// Nothing was usable.
    Fallback,
}

/// The agent's pick for one turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    pub actor: CombatantId,
    pub ability: AbilityId,
    pub target: Option<CombatantId>,
    pub kind: DecisionKind,
    /// Total score of the pick (0 for fallbacks).
    pub score: f64,
}

/// Current exploration probability after `experience` decisions.
pub fn epsilon(config: &DecisionConfig, experience: u32) -> f64 {
    let decay = if config.epsilon_decay.is_finite() {
        config.epsilon_decay.clamp(0.0, 1.0)
    } else {
        1.0
    };
    let steps = i32::try_from(experience).unwrap_or(i32::MAX);
    let decayed = config.epsilon_start * decay.powi(steps);
    let value = decayed.max(config.epsilon_floor);
    if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 }
}

/// Decision mechanism parameterised by a [`DecisionPolicy`].
#[derive(Clone, Copy)]
pub struct Agent<'p> {
    policy: &'p dyn DecisionPolicy,
}

impl<'p> Agent<'p> {
    pub fn new(policy: &'p dyn DecisionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &'p dyn DecisionPolicy {
        self.policy
    }

    /// Scores every usable ability of `actor` in kit order.
    ///
    /// The learned term is included. Unusable abilities and abilities without
    /// a valid target are left out.
    pub fn candidates(
        &self,
        state: &BattleState,
        env: CombatEnv<'_>,
        actor: CombatantId,
    ) -> Vec<AbilityScore> {
        let Some(combatant) = state.combatant(actor) else {
            return Vec::new();
        };
        let view = DecisionView::new(state, combatant, env.config());
        combatant
            .kit
            .iter()
            .filter_map(|&ability| env.ability(ability))
            .filter(|def| check_usable(combatant, def).is_ok())
            .filter_map(|def| self.score_one(&view, def))
            .collect()
    }

    fn score_one(&self, view: &DecisionView<'_>, def: &AbilityDef) -> Option<AbilityScore> {
        let target = self.policy.choose_target(view, def)?;
        let mut score = self.policy.score(view, def, Some(target));
        score.learned = view.config.decision.learned_weight * view.actor.memory.value(def.id);
        Some(score)
    }

    /// Picks the ability `actor` uses this turn and counts the decision
    /// towards its experience. `None` when the actor is gone.
    pub fn decide(
        &self,
        state: &mut BattleState,
        env: CombatEnv<'_>,
        rng: &mut dyn RandomSource,
        actor: CombatantId,
    ) -> Option<Decision> {
        let decision = self.choose(state, env, rng, actor)?;
        if let Some(combatant) = state.combatant_mut(actor) {
            combatant.memory.note_decision();
        }
        Some(decision)
    }

    fn choose(
        &self,
        state: &BattleState,
        env: CombatEnv<'_>,
        rng: &mut dyn RandomSource,
        actor: CombatantId,
    ) -> Option<Decision> {
        let combatant = state.combatant(actor).filter(|c| c.is_alive())?;
        let config = &env.config().decision;
        let view = DecisionView::new(state, combatant, env.config());
        let scores = self.candidates(state, env, actor);

        for score in &scores {
            debug!(
                policy = self.policy.name(),
                %actor,
                ability = %score.ability,
                target = ?score.target,
                estimate = score.estimate,
                lethality = score.lethality,
                synergy = score.synergy,
                stance = score.stance,
                learned = score.learned,
                total = score.value(),
                "ability scored"
            );
        }

        let fallback = || {
            let ability = fallback_ability();
            let target = env
                .ability(ability)
                .and_then(|def| self.policy.choose_target(&view, def));
            Decision {
                actor,
                ability,
                target,
                kind: DecisionKind::Fallback,
                score: 0.0,
            }
        };

        let Some(best) = best_index(&scores) else {
            debug!(policy = self.policy.name(), %actor, "no usable ability, falling back");
            return Some(fallback());
        };

        let eps = epsilon(config, combatant.memory.experience());
        if eps > 0.0 && rng.float("ai.explore") < eps {
            if let Some(index) = rng.pick_index("ai.explore.pick", scores.len()) {
                let pick = scores[index];
                debug!(policy = self.policy.name(), %actor, ability = %pick.ability, eps, "exploring");
                return Some(Decision {
                    actor,
                    ability: pick.ability,
                    target: pick.target,
                    kind: DecisionKind::Explored,
                    score: pick.value(),
                });
            }
        }

        let pick = scores[best];
        if pick.ability != fallback_ability() {
            let baseline = env
                .ability(fallback_ability())
                .and_then(|def| self.score_one(&view, def));
            if let Some(baseline) = baseline {
                if pick.value() < baseline.value() + config.abstain_margin {
                    debug!(
                        policy = self.policy.name(),
                        %actor,
                        best = %pick.ability,
                        best_score = pick.value(),
                        baseline = baseline.value(),
                        "abstaining to plain attack"
                    );
                    return Some(Decision {
                        actor,
                        ability: baseline.ability,
                        target: baseline.target,
                        kind: DecisionKind::Abstained,
                        score: baseline.value(),
                    });
                }
            }
        }

        debug!(
            policy = self.policy.name(),
            %actor,
            ability = %pick.ability,
            score = pick.value(),
            "ability selected"
        );
        Some(Decision {
            actor,
            ability: pick.ability,
            target: pick.target,
            kind: DecisionKind::Greedy,
            score: pick.value(),
        })
    }

    /// Updates the actor's learned value from a finished resolution.
    ///
    /// Returns the new value, or `None` when the actor is gone.
    pub fn learn(
        &self,
        state: &mut BattleState,
        env: CombatEnv<'_>,
        resolution: &Resolution,
    ) -> Option<f64> {
        let config = env.config();
        let reward = self.policy.reward(state, config, resolution);
        let combatant = state.combatant_mut(resolution.actor)?;
        let value = combatant.memory.record(
            resolution.ability,
            reward,
            config.decision.min_learning_rate,
        );
        debug!(
            policy = self.policy.name(),
            actor = %resolution.actor,
            ability = %resolution.ability,
            reward,
            value,
            "learned value updated"
        );
        Some(value)
    }
}

impl core::fmt::Debug for Agent<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Agent")
            .field("policy", &self.policy.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_decays_toward_floor() {
        let config = DecisionConfig::default();
        assert!((epsilon(&config, 0) - config.epsilon_start).abs() < 1e-12);
        assert!(epsilon(&config, 10) < config.epsilon_start);
        assert_eq!(epsilon(&config, 10_000), config.epsilon_floor);
        assert!(epsilon(&config, u32::MAX) > 0.0);
    }

    #[test]
    fn epsilon_is_zero_without_exploration() {
        let config = crate::config::CombatConfig::default().without_exploration();
        assert_eq!(epsilon(&config.decision, 0), 0.0);
    }
}

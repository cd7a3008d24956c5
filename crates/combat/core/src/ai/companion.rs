use crate::ability::{AbilityDef, TargetKind};
use crate::action::{AppliedEffect, Resolution};
use crate::config::CombatConfig;
use crate::state::{BattleState, CombatantId};

use super::policy::{DecisionPolicy, DecisionView, base_score, default_target, shaped_reward, weakest};
use super::score::AbilityScore;

/// Companion agent: protects the party, shuts down telegraphed attacks and
/// finishes wounded hostiles.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompanionPolicy;

impl DecisionPolicy for CompanionPolicy {
    fn name(&self) -> &'static str {
        "companion"
    }

    fn choose_target(&self, view: &DecisionView<'_>, def: &AbilityDef) -> Option<CombatantId> {
        match def.target_kind() {
            TargetKind::Enemy => {
                if def.interrupts() {
                    let charging = view.enemies().find(|enemy| enemy.intent.is_some());
                    if let Some(enemy) = charging {
                        return Some(enemy.id);
                    }
                }
                weakest(view.enemies())
            }
            TargetKind::Ally => weakest(view.allies()),
            TargetKind::Caster => default_target(view, def),
        }
    }

    fn score(
        &self,
        view: &DecisionView<'_>,
        def: &AbilityDef,
        target: Option<CombatantId>,
    ) -> AbilityScore {
        let mut score = base_score(view, def, target);
        let synergy = view.config.decision.synergy_bonus;
        if let Some(target) = target.and_then(|id| view.state.combatant(id)) {
            if def.interrupts() && target.intent.is_some() {
                score.synergy += 2.0 * synergy;
            }
            if target.side.is_hostile() && target.is_broken() {
                score.synergy += synergy;
            }
        }
        score
    }

    fn reward(&self, state: &BattleState, config: &CombatConfig, resolution: &Resolution) -> f64 {
        let bonus = config.decision.synergy_bonus;
        let disruption = resolution
            .effects
            .iter()
            .filter(|effect| {
                matches!(
                    effect,
                    AppliedEffect::Interrupt { .. } | AppliedEffect::PostureBreak { .. }
                )
            })
            .count() as f64;
        shaped_reward(state, config, resolution) + bonus * disruption
    }
}

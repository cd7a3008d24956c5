use crate::ability::{AbilityDef, TargetKind};
use crate::action::Resolution;
use crate::config::CombatConfig;
use crate::state::{BattleState, CombatantId};

use super::policy::{DecisionPolicy, DecisionView, base_score, default_target, shaped_reward, weakest};
use super::score::AbilityScore;

/// Hostile agent: presses the most wounded enemy and values telegraphed
/// abilities less the longer they take to land.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostilePolicy;

impl HostilePolicy {
    /// Share of a telegraphed ability's value lost per turn of warning.
    pub const TELEGRAPH_DISCOUNT: f64 = 0.25;
}

impl DecisionPolicy for HostilePolicy {
    fn name(&self) -> &'static str {
        "hostile"
    }

    fn choose_target(&self, view: &DecisionView<'_>, def: &AbilityDef) -> Option<CombatantId> {
        match def.target_kind() {
            TargetKind::Enemy => weakest(view.enemies()),
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
        if let Some(turns) = def.telegraph {
            score.estimate /= 1.0 + Self::TELEGRAPH_DISCOUNT * f64::from(turns);
            // lethality is judged on the state at declaration; it rarely holds
            score.lethality = 0.0;
        }
        score
    }

    fn reward(&self, state: &BattleState, config: &CombatConfig, resolution: &Resolution) -> f64 {
        shaped_reward(state, config, resolution)
    }
}

//! Ability resolution pipeline.
//!
//! 1. Validate the request and price the ability (no mutation yet)
//! 2. Pay the cost and commit the cooldown
//! 3. Telegraphed abilities stop here and store an intent
//! 4. Build the transient [`ActionContext`]
//! 5. Run the effect handlers (damage feeds posture inside the handler)
//! 6. Apply on-hit passives of the actor
//!
//! A failure in step 1 returns an [`ActionError`] and leaves the state
//! untouched. Nothing after step 1 can fail.

use tracing::debug;

use crate::ability::{AbilityDef, AbilityId, TargetKind};
use crate::env::{CombatEnv, RandomSource};
use crate::events::CombatEvent;
use crate::state::{BattleState, Combatant, CombatantId, PendingIntent};

use super::context::ActionContext;
use super::effects::Resolver;
use super::error::ActionError;
use super::result::{AppliedEffect, Resolution, ResolveMode};

/// What an actor asks the engine to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRequest {
    pub actor: CombatantId,
    /// Ignored when `from_intent` is set; the stored intent decides.
    pub ability: AbilityId,
    /// Preferred target. Dead or wrong-side targets are re-derived.
    pub target: Option<CombatantId>,
    pub from_intent: bool,
}

impl ActionRequest {
    pub fn new(actor: CombatantId, ability: AbilityId, target: Option<CombatantId>) -> Self {
        Self {
            actor,
            ability,
            target,
            from_intent: false,
        }
    }

    /// Fires the actor's matured intent.
    pub fn execute_intent(actor: CombatantId, ability: AbilityId, target: Option<CombatantId>) -> Self {
        Self {
            actor,
            ability,
            target,
            from_intent: true,
        }
    }
}

/// Checks whether `actor` could use `def` right now (ignoring targets).
pub fn check_usable(actor: &Combatant, def: &AbilityDef) -> Result<u32, ActionError> {
    if !actor.is_alive() {
        return Err(ActionError::ActorDefeated(actor.id));
    }
    if !actor.knows(def.id) {
        return Err(ActionError::NotInKit {
            actor: actor.id,
            ability: def.id,
        });
    }
    let remaining = actor.cooldowns.remaining(def.id);
    if remaining > 0 {
        return Err(ActionError::OnCooldown {
            ability: def.id,
            remaining,
        });
    }
    let cost = actor.cost_of(def.id, def.cost);
    if !actor.resource.can_afford(cost) {
        return Err(ActionError::InsufficientResource {
            ability: def.id,
            required: cost,
            available: actor.resource.current(),
        });
    }
    Ok(cost)
}

/// Picks the primary target for `kind`, honouring `requested` when it is a
/// living member of the right side.
pub fn select_target(
    state: &BattleState,
    actor: &Combatant,
    kind: TargetKind,
    requested: Option<CombatantId>,
) -> Option<CombatantId> {
    match kind {
        TargetKind::Caster => Some(actor.id),
        TargetKind::Ally => {
            let allies = state.living_allies_of(actor.side);
            requested
                .filter(|id| allies.contains(id))
                .or(Some(actor.id))
        }
        TargetKind::Enemy => {
            let enemies = state.living_enemies_of(actor.side);
            requested
                .filter(|id| enemies.contains(id))
                .or_else(|| enemies.first().copied())
        }
    }
}

/// Resolves one ability use.
///
/// # Errors
///
/// Returns an [`ActionError`] when the request is invalid; the state is left
/// unchanged in that case.
pub fn resolve(
    state: &mut BattleState,
    env: CombatEnv<'_>,
    rng: &mut dyn RandomSource,
    request: ActionRequest,
) -> Result<Resolution, ActionError> {
    let config = env.config();

    // 1. validate
    let actor = state
        .combatant(request.actor)
        .ok_or(ActionError::UnknownCombatant(request.actor))?;
    if !actor.is_alive() {
        return Err(ActionError::ActorDefeated(actor.id));
    }

    let (ability, mode) = if request.from_intent {
        let intent = actor
            .intent
            .ok_or(ActionError::NoPendingIntent(actor.id))?;
        (intent.ability, ResolveMode::Execute)
    } else {
        let def = env
            .ability(request.ability)
            .ok_or(ActionError::UndefinedAbility(request.ability))?;
        let mode = if def.is_telegraphed() {
            ResolveMode::Declare
        } else {
            ResolveMode::Direct
        };
        (request.ability, mode)
    };
    let def = env
        .ability(ability)
        .ok_or(ActionError::UndefinedAbility(ability))?;

    let cost = match mode {
        ResolveMode::Execute => 0,
        _ => check_usable(actor, def)?,
    };

    let primary = match mode {
        ResolveMode::Declare => None,
        _ => Some(
            select_target(state, actor, def.target_kind(), request.target)
                .ok_or(ActionError::NoLivingTarget)?,
        ),
    };
    let cooldown = actor.cooldown_of(def.id, def.cooldown);
    let side = actor.side;

    // 2. pay
    let round = state.turn.round;
    let Some(actor) = state.combatant_mut(request.actor) else {
        return Err(ActionError::UnknownCombatant(request.actor));
    };
    let mut resolution = Resolution::new(actor.id, ability, mode);
    if mode != ResolveMode::Execute {
        actor.resource.spend(cost);
        actor.cooldowns.start(ability, cooldown, round);
    }

    // 3. telegraph
    if mode == ResolveMode::Declare {
        let turns = def.telegraph.unwrap_or(1);
        actor.intent = Some(PendingIntent::new(ability, turns, round));
        resolution.record(AppliedEffect::Declared { turns });
        resolution.narrate(CombatEvent::IntentDeclared {
            actor: actor.id,
            ability,
            turns,
        });
        debug!(actor = %actor.id, %ability, turns, "intent declared");
        return Ok(resolution);
    }
    if mode == ResolveMode::Execute {
        actor.intent = None;
    }

    // 4. context
    let ctx = ActionContext::build(actor, def, config);
    resolution.narrate(CombatEvent::AbilityUsed {
        actor: ctx.actor,
        side,
        ability,
    });

    // 5. effects
    let mut resolver = Resolver::new(state, config, rng, &ctx, resolution);
    for leaf in def.effect.leaves() {
        resolver.apply(leaf, primary);
    }

    // 6. passives
    resolver.apply_actor_passives();
    let resolution = resolver.finish();

    debug!(
        actor = %resolution.actor,
        ability = %resolution.ability,
        damage = resolution.total_damage(),
        healing = resolution.total_healing(),
        "ability resolved"
    );
    Ok(resolution)
}


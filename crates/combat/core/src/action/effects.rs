//! Per-kind effect handlers.
//!
//! One handler per [`EffectKind`] variant. Handlers never fail: a target that
//! died earlier in the same resolution is re-derived, and an effect with no
//! valid target is skipped.

use tracing::{debug, warn};

use crate::ability::{
    AbilityTags, DamageEffect, EffectKind, GuardEffect, HealEffect, ShieldEffect,
    StatusApplication, TargetKind,
};
use crate::combat::{
    DamageKind, DefenseInput, OutgoingInput, PostureBonus, finalize_hit, guard_factor,
    heal_amount, mitigate, posture_gain, roll_outgoing, sanitize,
};
use crate::config::CombatConfig;
use crate::env::RandomSource;
use crate::events::CombatEvent;
use crate::state::{BattleState, CombatantId, ResourceKind, StatusKind};

use super::context::ActionContext;
use super::resolve::select_target;
use super::result::{AppliedEffect, Resolution};

pub(super) struct Resolver<'s> {
    state: &'s mut BattleState,
    config: &'s CombatConfig,
    rng: &'s mut dyn RandomSource,
    ctx: &'s ActionContext,
    out: Resolution,
    /// Health removed by this action, for life-steal.
    dealt: u32,
    landed: bool,
    crit: bool,
}

impl<'s> Resolver<'s> {
    pub(super) fn new(
        state: &'s mut BattleState,
        config: &'s CombatConfig,
        rng: &'s mut dyn RandomSource,
        ctx: &'s ActionContext,
        out: Resolution,
    ) -> Self {
        Self {
            state,
            config,
            rng,
            ctx,
            out,
            dealt: 0,
            landed: false,
            crit: false,
        }
    }

    pub(super) fn finish(self) -> Resolution {
        self.out
    }

    /// Dispatches one leaf effect. Nothing happens once the actor has died.
    pub(super) fn apply(&mut self, effect: &EffectKind, primary: Option<CombatantId>) {
        if !self.state.is_alive(self.ctx.actor) {
            return;
        }
        let Some(target) = self.target_for(effect.target_kind(), primary) else {
            debug!(ability = %self.ctx.ability, "effect skipped: no living target");
            return;
        };

        match effect {
            EffectKind::Damage(damage) => self.damage(damage, target),
            EffectKind::Heal(heal) => self.heal(heal, target),
            EffectKind::Shield(shield) => self.shield(shield, target),
            EffectKind::Buff(status) | EffectKind::Debuff(status) => self.status(status, target),
            EffectKind::Guard(guard) => self.guard(guard),
            EffectKind::Composite(parts) => {
                for part in parts {
                    self.apply(part, primary);
                }
            }
        }
    }

    fn target_for(&self, kind: TargetKind, primary: Option<CombatantId>) -> Option<CombatantId> {
        let actor = self.state.combatant(self.ctx.actor)?;
        let chosen = select_target(self.state, actor, kind, primary);
        if kind == TargetKind::Enemy && primary.is_some() && chosen != primary {
            warn!(
                actor = %self.ctx.actor,
                requested = ?primary,
                chosen = ?chosen,
                "primary target gone, retargeting"
            );
        }
        chosen
    }

    // ========================================================================
    // Damage
    // ========================================================================

    fn damage(&mut self, effect: &DamageEffect, primary: CombatantId) {
        let config = self.config;
        let formula = &config.formula;
        let primary_broken = self
            .state
            .combatant(primary)
            .is_some_and(|target| target.is_broken());

        let mut crit_chance = self.ctx.stats.crit_chance + self.ctx.crit_bonus + effect.crit_bonus;
        if primary_broken {
            crit_chance += formula.broken_crit_bonus;
        }
        let variance_draw = self.rng.float("damage.variance");
        let crit_draw = self.rng.float("damage.crit");
        let roll = roll_outgoing(
            OutgoingInput {
                stat: self.ctx.scaling_stat(),
                potency: self.ctx.potency * sanitize(effect.scale),
                multiplier: self.ctx.damage.multiplier(),
                crit_chance,
            },
            variance_draw,
            crit_draw,
            formula,
        );
        if roll.crit {
            self.crit = true;
        }

        let mut targets = vec![(primary, None)];
        if let Some(fraction) = effect.splash {
            let side = self.ctx.side;
            targets.extend(
                self.state
                    .living_enemies_of(side)
                    .into_iter()
                    .filter(|id| *id != primary)
                    .map(|id| (id, Some(fraction))),
            );
        }

        for (target, splash) in targets {
            let Some(defender) = self.state.combatant(target) else {
                continue;
            };
            if !defender.is_alive() {
                continue;
            }
            let stats = defender.effective_stats();
            let k = match self.ctx.kind {
                DamageKind::Physical => formula.physical_k,
                DamageKind::Magic => formula.magic_k,
            };
            let mitigated = mitigate(
                roll.amount,
                DefenseInput {
                    defense: stats.defense(self.ctx.kind),
                    penetration: self.ctx.stats.penetration + effect.penetration,
                    k,
                    resist: defender.resistances.get(self.ctx.element),
                    broken: defender.is_broken(),
                },
                formula,
            );
            let amount = match splash {
                Some(fraction) => finalize_hit(mitigated * sanitize(fraction).max(0.0)),
                None => finalize_hit(mitigated),
            };

            let Some(killed) = self.strike(target, amount, roll.crit, splash.is_some()) else {
                continue;
            };

            let interrupting = splash.is_none() && effect.interrupts;
            let interrupted = interrupting && !killed && self.interrupt(target);
            if !killed {
                self.feed_posture(target, amount, roll.crit, interrupted);
                if let Some(status) = &effect.on_hit {
                    self.status(status, target);
                }
            }

            // thorns may have killed the attacker
            if !self.state.is_alive(self.ctx.actor) {
                break;
            }
        }
    }

    /// Lands `amount` on `target`: dodge, guard and vulnerable, shield, health.
    /// Returns whether the target died, or `None` when the hit was dodged.
    fn strike(&mut self, target: CombatantId, amount: u32, crit: bool, splash: bool) -> Option<bool> {
        let guard_cap = self.config.formula.guard_cap;
        let rage_taken = self.config.resources.rage_on_hit_taken;
        let source = self.ctx.actor;

        let dodge = self.state.combatant(target)?.statuses.magnitude(StatusKind::Dodge);
        if dodge > 0.0 && self.rng.float("hit.dodge") < dodge {
            let side = self.state.combatant(target)?.side;
            self.out.record(AppliedEffect::Dodged { target });
            self.out.narrate(CombatEvent::Dodged {
                source,
                target,
                side,
            });
            return None;
        }

        let defender = self.state.combatant_mut(target)?;
        let guard = defender.statuses.magnitude(StatusKind::Guard);
        let vulnerable = defender.statuses.magnitude(StatusKind::Vulnerable);
        let adjusted = f64::from(amount) * guard_factor(guard, guard_cap) * (1.0 + vulnerable);
        let amount = finalize_hit(adjusted);

        let (absorbed, leftover) = defender.statuses.absorb(amount);
        let dealt = defender.health.drain(leftover);
        let killed = defender.health.is_empty();
        if defender.resource.kind == ResourceKind::Rage && dealt + absorbed > 0 {
            defender.resource.gain(rage_taken);
        }
        let side = defender.side;
        let thorns = defender.passives.thorns;
        if killed {
            defender.clear_on_death();
        }

        self.dealt += dealt;
        self.landed = true;
        self.out.record(AppliedEffect::Damage {
            target,
            amount: dealt,
            absorbed,
            crit,
            splash,
            killed,
        });
        self.out.narrate(CombatEvent::Damaged {
            source,
            target,
            side,
            amount: dealt,
            absorbed,
            crit,
        });
        if killed {
            self.out.narrate(CombatEvent::Defeated { target, side });
        }

        let reflected = (f64::from(dealt + absorbed) * sanitize(thorns).max(0.0)).round() as u32;
        if reflected > 0 {
            self.reflect(target, reflected);
        }

        Some(killed)
    }

    fn reflect(&mut self, defender: CombatantId, amount: u32) {
        let Some(actor) = self.state.combatant_mut(self.ctx.actor) else {
            return;
        };
        if !actor.is_alive() {
            return;
        }
        let taken = actor.health.drain(amount);
        let killed = actor.health.is_empty();
        let side = actor.side;
        if killed {
            actor.clear_on_death();
        }
        self.out.record(AppliedEffect::Thorns {
            target: self.ctx.actor,
            amount: taken,
        });
        self.out.narrate(CombatEvent::Thorns {
            source: defender,
            target: self.ctx.actor,
            amount: taken,
        });
        if killed {
            self.out.narrate(CombatEvent::Defeated {
                target: self.ctx.actor,
                side,
            });
        }
    }

    /// Clears a pending intent on `target`. Its cooldown stays committed.
    fn interrupt(&mut self, target: CombatantId) -> bool {
        let Some(defender) = self.state.combatant_mut(target) else {
            return false;
        };
        let Some(intent) = defender.intent.take() else {
            return false;
        };
        self.out.record(AppliedEffect::Interrupt {
            target,
            ability: intent.ability,
        });
        self.out.narrate(CombatEvent::Interrupted {
            target,
            ability: intent.ability,
        });
        debug!(%target, ability = %intent.ability, "intent interrupted");
        true
    }

    fn feed_posture(&mut self, target: CombatantId, raw: u32, crit: bool, interrupted: bool) {
        let config = &self.config.posture;
        let broken_duration = config.broken_duration;
        let basic = self.ctx.tags.contains(AbilityTags::BASIC);
        let Some(defender) = self.state.combatant_mut(target) else {
            return;
        };
        if !defender.side.is_hostile() {
            return;
        }
        let Some(posture) = defender.posture.as_mut() else {
            return;
        };

        let bonus = PostureBonus {
            crit,
            interrupt: interrupted,
            basic,
        };
        let gain = posture_gain(raw, bonus, posture.maximum(), config);
        if !posture.accrue(gain) {
            return;
        }

        defender
            .statuses
            .apply_timed(StatusKind::Broken, 1.0, broken_duration);
        defender.staggered = true;
        let dropped = defender.intent.take();

        self.out.record(AppliedEffect::PostureBreak { target });
        self.out.narrate(CombatEvent::PostureBroken { target });
        if let Some(intent) = dropped {
            self.out.record(AppliedEffect::Interrupt {
                target,
                ability: intent.ability,
            });
            self.out.narrate(CombatEvent::Interrupted {
                target,
                ability: intent.ability,
            });
        }
        debug!(%target, "posture broken");
    }

    // ========================================================================
    // Support
    // ========================================================================

    fn heal(&mut self, effect: &HealEffect, target: CombatantId) {
        let magic = self.ctx.stats.magic;
        let potency = self.ctx.potency * sanitize(effect.scale);
        let multiplier = self.ctx.heal_multiplier;
        let Some(ally) = self.state.combatant_mut(target) else {
            return;
        };
        let amount = heal_amount(magic, potency, multiplier, ally.health.missing());
        let restored = ally.health.restore(amount);
        let side = ally.side;
        self.out.record(AppliedEffect::Heal {
            target,
            amount: restored,
        });
        self.out.narrate(CombatEvent::Healed {
            target,
            side,
            amount: restored,
        });
    }

    fn shield(&mut self, effect: &ShieldEffect, target: CombatantId) {
        let raw = self.ctx.scaling_stat() * self.ctx.potency * sanitize(effect.scale);
        let amount = sanitize(raw).max(0.0).round() as u32;
        let Some(ally) = self.state.combatant_mut(target) else {
            return;
        };
        if !ally.statuses.add_shield(f64::from(amount), effect.duration) {
            return;
        }
        let side = ally.side;
        self.out.record(AppliedEffect::Shield { target, amount });
        self.out.narrate(CombatEvent::Shielded {
            target,
            side,
            amount,
        });
    }

    fn status(&mut self, status: &StatusApplication, target: CombatantId) {
        let magnitude = if status.scales {
            status.magnitude * self.ctx.scaling_stat()
        } else {
            status.magnitude
        };
        let Some(combatant) = self.state.combatant_mut(target) else {
            return;
        };
        if !combatant.is_alive() {
            return;
        }
        if !combatant
            .statuses
            .apply_timed(status.kind, magnitude, status.duration)
        {
            return;
        }
        let side = combatant.side;
        self.out.record(AppliedEffect::Status {
            target,
            kind: status.kind,
            magnitude: sanitize(magnitude),
            duration: status.duration,
        });
        self.out.narrate(CombatEvent::StatusApplied {
            target,
            side,
            kind: status.kind,
            duration: status.duration,
        });
    }

    fn guard(&mut self, guard: &GuardEffect) {
        let cap = self.config.formula.guard_cap;
        let refund = self.config.resources.guard_refund;
        let reduction = sanitize(guard.reduction).clamp(0.0, cap);
        let caster = self.ctx.actor;
        let Some(actor) = self.state.combatant_mut(caster) else {
            return;
        };
        actor.resource.gain(refund);
        if !actor
            .statuses
            .apply_timed(StatusKind::Guard, reduction, guard.duration)
        {
            return;
        }
        let side = actor.side;
        self.out.record(AppliedEffect::Status {
            target: caster,
            kind: StatusKind::Guard,
            magnitude: reduction,
            duration: guard.duration,
        });
        self.out.narrate(CombatEvent::StatusApplied {
            target: caster,
            side,
            kind: StatusKind::Guard,
            duration: guard.duration,
        });
    }

    // ========================================================================
    // Actor passives
    // ========================================================================

    /// Life-steal, rage from dealing damage and crit refunds.
    pub(super) fn apply_actor_passives(&mut self) {
        let rage_dealt = self.config.resources.rage_on_hit_dealt;
        let (dealt, landed, crit) = (self.dealt, self.landed, self.crit);
        let Some(actor) = self.state.combatant_mut(self.ctx.actor) else {
            return;
        };
        if !actor.is_alive() {
            return;
        }

        if landed && actor.resource.kind == ResourceKind::Rage {
            actor.resource.gain(rage_dealt);
        }
        if crit && actor.passives.crit_refund > 0 {
            actor.resource.gain(actor.passives.crit_refund);
        }

        let stolen = (f64::from(dealt) * sanitize(actor.passives.life_steal).max(0.0)).round() as u32;
        if stolen == 0 {
            return;
        }
        let healed = actor.health.restore(stolen);
        if healed > 0 {
            let id = actor.id;
            self.out.record(AppliedEffect::LifeSteal { amount: healed });
            self.out.narrate(CombatEvent::LifeSteal { actor: id, amount: healed });
        }
    }
}

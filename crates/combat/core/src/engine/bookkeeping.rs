use tracing::{debug, info};

use crate::combat::{sanitize, sanitize_ratio};
use crate::events::CombatEvent;
use crate::state::BattleOutcome;

use super::BattleEngine;

/// End-of-round bookkeeping and defeat settlement.
impl<'a> BattleEngine<'a> {
    /// Status ticks, passive regen, resource regen/decay and cooldowns for
    /// every living combatant, in roster order.
    pub(super) fn end_of_round(&mut self) {
        let round = self.state.turn.round;
        let resources = &self.env.config().resources;
        let mut events = Vec::new();

        for combatant in self.state.combatants_mut() {
            if !combatant.is_alive() {
                continue;
            }
            let id = combatant.id;
            let side = combatant.side;

            if let Some(tick) = combatant.statuses.tick(round) {
                let damage = sanitize(tick.damage).max(0.0).round() as u32;
                if damage > 0 {
                    let taken = combatant.health.drain(damage);
                    events.push(CombatEvent::PeriodicDamage {
                        target: id,
                        side,
                        amount: taken,
                    });
                }
                if combatant.is_alive() {
                    let heal = sanitize(tick.heal).max(0.0).round() as u32;
                    let healed = combatant.health.restore(heal);
                    if healed > 0 {
                        events.push(CombatEvent::Healed {
                            target: id,
                            side,
                            amount: healed,
                        });
                    }
                }
                for kind in tick.faded {
                    events.push(CombatEvent::StatusFaded { target: id, kind });
                }
            }

            if !combatant.is_alive() {
                combatant.clear_on_death();
                events.push(CombatEvent::Defeated { target: id, side });
                continue;
            }

            let ratio = sanitize_ratio(combatant.passives.regen);
            let regen = (f64::from(combatant.health.maximum()) * ratio).round() as u32;
            let regenerated = combatant.health.restore(regen);
            if regenerated > 0 {
                events.push(CombatEvent::Healed {
                    target: id,
                    side,
                    amount: regenerated,
                });
            }

            let delta = combatant.resource.round_tick(resources);
            if delta != 0 {
                debug!(combatant = %id, kind = ?combatant.resource.kind, delta, "resource tick");
            }
            combatant.cooldowns.tick(round);
        }

        for event in events {
            self.sink.emit(event);
        }
    }

    /// Marks newly defeated combatants and awards capped loot drops.
    pub(super) fn settle_defeats(&mut self) {
        let max_drops = self.env.config().max_drops_per_battle;
        let mut dropped = Vec::new();
        for combatant in self.state.combatants_mut() {
            if combatant.is_alive() || combatant.fallen {
                continue;
            }
            combatant.fallen = true;
            if combatant.side.is_hostile() {
                dropped.push(combatant.id);
            }
        }

        for id in dropped {
            if self.state.turn.drops >= max_drops {
                debug!(combatant = %id, max_drops, "drop cap reached");
                continue;
            }
            self.state.turn.drops += 1;
            self.sink.emit(CombatEvent::LootDropped {
                total: self.state.turn.drops,
            });
        }
    }

    /// Ends the battle when one side is gone. Returns the outcome if it did.
    pub(super) fn check_outcome(&mut self) -> Option<BattleOutcome> {
        if let Some(outcome) = self.state.outcome {
            return Some(outcome);
        }
        let outcome = self.state.evaluate_outcome()?;
        self.end_battle(outcome);
        Some(outcome)
    }

    /// Ends the battle with `outcome`. Safe at any time, including halfway
    /// through a round; later calls are no-ops and return `false`.
    pub fn end_battle(&mut self, outcome: BattleOutcome) -> bool {
        if self.state.outcome.is_some() {
            return false;
        }
        self.state.outcome = Some(outcome);
        self.state.turn.close();
        self.sink.emit(CombatEvent::BattleEnded { outcome });
        info!(?outcome, round = self.state.turn.round, "battle ended");
        true
    }
}

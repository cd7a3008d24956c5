use tracing::{debug, info, warn};

use crate::ability::AbilityId;
use crate::action::{ActionRequest, Resolution, ResolveMode, resolve};
use crate::ai::{Agent, CompanionPolicy, DecisionPolicy, DecisionView, HostilePolicy};
use crate::events::{CombatEvent, SkipReason};
use crate::state::{BattleOutcome, CombatantId, StatusKind, TurnCursor};

use super::{BattleEngine, TurnError};

static HOSTILE: HostilePolicy = HostilePolicy;
static COMPANION: CompanionPolicy = CompanionPolicy;

/// What the player asks for at the start of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerCommand {
    UseAbility {
        ability: AbilityId,
        target: Option<CombatantId>,
    },
    Flee,
}

/// Result of advancing the round by one actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Acted {
        actor: CombatantId,
        ability: AbilityId,
        mode: ResolveMode,
    },
    /// A pending intent counted down but did not go off yet.
    Charging {
        actor: CombatantId,
        ability: AbilityId,
        turns_remaining: u32,
    },
    Skipped {
        actor: CombatantId,
        reason: SkipReason,
    },
    FleeFailed,
    /// Bookkeeping ran; `round` is the round that just finished.
    RoundComplete {
        round: u32,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
}

impl StepOutcome {
    /// Whether no further [`BattleEngine::step`] belongs to this round.
    pub fn ends_round(&self) -> bool {
        matches!(self, Self::RoundComplete { .. } | Self::BattleEnded { .. })
    }
}

/// Round sequencing for BattleEngine.
impl<'a> BattleEngine<'a> {
    /// Opens a round with the player's command.
    ///
    /// # Errors
    ///
    /// [`TurnError::Busy`] while a round is in flight, [`TurnError::BattleOver`]
    /// after the battle ended, [`TurnError::Action`] when the player's ability
    /// cannot be used. No state changes in any of these cases.
    pub fn begin_round(&mut self, command: PlayerCommand) -> Result<StepOutcome, TurnError> {
        if self.state.is_over() {
            return Err(TurnError::BattleOver);
        }
        if self.state.turn.is_busy() {
            return Err(TurnError::Busy);
        }

        let player = CombatantId::PLAYER;
        let round = self.state.turn.round;
        let blocked = self.state.combatant(player).is_some_and(|p| {
            p.statuses.has(StatusKind::Stun) || p.intent.is_some()
        });

        if !blocked {
            if let PlayerCommand::UseAbility { ability, target } = command {
                // validate first: a rejected command must not open the round
                let request = ActionRequest::new(player, ability, target);
                let resolution = resolve(self.state, self.env, &mut *self.rng, request)?;
                self.open_round(round);
                return Ok(self.publish(resolution));
            }
        }

        self.open_round(round);
        if blocked {
            return Ok(self.take_turn(player, &COMPANION));
        }

        let roll = self.rng.float("battle.flee");
        if roll < self.env.config().flee_chance {
            self.end_battle(BattleOutcome::Fled);
            return Ok(StepOutcome::BattleEnded {
                outcome: BattleOutcome::Fled,
            });
        }
        self.sink.emit(CombatEvent::FleeFailed);
        debug!(roll, "flee failed");
        Ok(StepOutcome::FleeFailed)
    }

    fn open_round(&mut self, round: u32) {
        self.state.turn.open(TurnCursor::Companion);
        self.sink.emit(CombatEvent::RoundStarted { round });
        info!(round, "round started");
    }

    /// Advances the open round by exactly one actor, or runs the end-of-round
    /// bookkeeping. Dead and absent actors are passed over.
    ///
    /// # Errors
    ///
    /// [`TurnError::BattleOver`] after the battle ended and
    /// [`TurnError::NotResolving`] when no round is open.
    pub fn step(&mut self) -> Result<StepOutcome, TurnError> {
        if self.state.is_over() {
            return Err(TurnError::BattleOver);
        }
        let Some(mut cursor) = self.state.turn.cursor.filter(|_| self.state.turn.is_busy()) else {
            return Err(TurnError::NotResolving);
        };

        loop {
            let hostiles = self.state.hostile_count();
            let first_hostile = if hostiles > 0 {
                TurnCursor::Hostile(0)
            } else {
                TurnCursor::EndOfRound
            };

            match cursor {
                TurnCursor::Companion => {
                    self.state.turn.cursor = Some(first_hostile);
                    let companion = self.state.companion().filter(|c| c.is_alive()).map(|c| c.id);
                    if let Some(id) = companion {
                        return Ok(self.take_turn(id, &COMPANION));
                    }
                    cursor = first_hostile;
                }
                TurnCursor::Hostile(index) => {
                    let next = if index + 1 < hostiles {
                        TurnCursor::Hostile(index + 1)
                    } else {
                        TurnCursor::EndOfRound
                    };
                    self.state.turn.cursor = Some(next);
                    let hostile = self.state.hostile_at(index).filter(|h| h.is_alive()).map(|h| h.id);
                    if let Some(id) = hostile {
                        return Ok(self.take_turn(id, &HOSTILE));
                    }
                    debug!(index, "hostile slot empty, skipping");
                    cursor = next;
                }
                TurnCursor::EndOfRound => return Ok(self.finish_round()),
            }
        }
    }

    /// Runs a whole round: the player's command, then every step until the
    /// round completes or the battle ends.
    ///
    /// # Errors
    ///
    /// Only the errors of [`begin_round`](Self::begin_round); once the round
    /// is open it always runs to completion.
    pub fn submit(&mut self, command: PlayerCommand) -> Result<Vec<StepOutcome>, TurnError> {
        let mut outcomes = vec![self.begin_round(command)?];
        while !outcomes.last().is_some_and(StepOutcome::ends_round) {
            match self.step() {
                Ok(outcome) => outcomes.push(outcome),
                Err(error) => {
                    warn!(%error, "round stopped early");
                    break;
                }
            }
        }
        Ok(outcomes)
    }

    fn finish_round(&mut self) -> StepOutcome {
        let round = self.state.turn.round;
        self.end_of_round();
        self.settle_defeats();
        if let Some(outcome) = self.check_outcome() {
            return StepOutcome::BattleEnded { outcome };
        }
        self.state.turn.round = round.saturating_add(1);
        self.state.turn.close();
        info!(round, "round complete");
        StepOutcome::RoundComplete { round }
    }

    // ========================================================================
    // Single actor turn
    // ========================================================================

    /// One actor's turn: stagger and stun skips, then the pending intent,
    /// then a fresh decision.
    fn take_turn(&mut self, actor: CombatantId, policy: &dyn DecisionPolicy) -> StepOutcome {
        let Some(combatant) = self.state.combatant_mut(actor) else {
            return StepOutcome::Skipped {
                actor,
                reason: SkipReason::Idle,
            };
        };

        let skip = if combatant.staggered {
            combatant.staggered = false;
            Some(SkipReason::Staggered)
        } else if combatant.statuses.remove(StatusKind::Stun).is_some() {
            Some(SkipReason::Stunned)
        } else {
            None
        };
        if let Some(reason) = skip {
            return self.skip(actor, reason);
        }

        if let Some(intent) = combatant.intent.as_mut() {
            let ability = intent.ability;
            if !intent.advance() {
                let turns_remaining = intent.turns_remaining;
                self.sink.emit(CombatEvent::IntentCharging {
                    actor,
                    ability,
                    turns_remaining,
                });
                return StepOutcome::Charging {
                    actor,
                    ability,
                    turns_remaining,
                };
            }
            return self.execute_intent(actor, ability, policy);
        }

        self.act(actor, policy)
    }

    fn skip(&mut self, actor: CombatantId, reason: SkipReason) -> StepOutcome {
        self.sink.emit(CombatEvent::TurnSkipped { actor, reason });
        debug!(%actor, %reason, "turn skipped");
        StepOutcome::Skipped { actor, reason }
    }

    fn execute_intent(
        &mut self,
        actor: CombatantId,
        ability: AbilityId,
        policy: &dyn DecisionPolicy,
    ) -> StepOutcome {
        let target = self.target_for(actor, ability, policy);
        let request = ActionRequest::execute_intent(actor, ability, target);
        match resolve(self.state, self.env, &mut *self.rng, request) {
            Ok(resolution) => {
                Agent::new(policy).learn(self.state, self.env, &resolution);
                self.publish(resolution)
            }
            Err(error) => {
                warn!(%actor, %ability, %error, "intent fizzled");
                if let Some(combatant) = self.state.combatant_mut(actor) {
                    combatant.intent = None;
                }
                self.skip(actor, SkipReason::Idle)
            }
        }
    }

    /// Target chosen against the battlefield as it is now.
    fn target_for(
        &self,
        actor: CombatantId,
        ability: AbilityId,
        policy: &dyn DecisionPolicy,
    ) -> Option<CombatantId> {
        let combatant = self.state.combatant(actor)?;
        let def = self.env.ability(ability)?;
        let view = DecisionView::new(self.state, combatant, self.env.config());
        policy.choose_target(&view, def)
    }

    fn act(&mut self, actor: CombatantId, policy: &dyn DecisionPolicy) -> StepOutcome {
        let agent = Agent::new(policy);
        let Some(decision) = agent.decide(self.state, self.env, &mut *self.rng, actor) else {
            return self.skip(actor, SkipReason::Idle);
        };

        let request = ActionRequest::new(actor, decision.ability, decision.target);
        let resolution = match resolve(self.state, self.env, &mut *self.rng, request) {
            Ok(resolution) => resolution,
            Err(error) => {
                warn!(%actor, ability = %decision.ability, %error, "decision rejected, using plain attack");
                let fallback = AbilityId::FALLBACK;
                let target = self.target_for(actor, fallback, policy);
                let request = ActionRequest::new(actor, fallback, target);
                match resolve(self.state, self.env, &mut *self.rng, request) {
                    Ok(resolution) => resolution,
                    Err(error) => {
                        warn!(%actor, %error, "no action possible");
                        return self.skip(actor, SkipReason::Idle);
                    }
                }
            }
        };

        if resolution.mode != ResolveMode::Declare {
            agent.learn(self.state, self.env, &resolution);
        }
        self.publish(resolution)
    }

    /// Forwards narration, settles defeats and runs the defeat check.
    fn publish(&mut self, resolution: Resolution) -> StepOutcome {
        let Resolution {
            actor,
            ability,
            mode,
            narration,
            ..
        } = resolution;
        for event in narration {
            self.sink.emit(event);
        }
        self.settle_defeats();
        if let Some(outcome) = self.check_outcome() {
            return StepOutcome::BattleEnded { outcome };
        }
        StepOutcome::Acted {
            actor,
            ability,
            mode,
        }
    }
}

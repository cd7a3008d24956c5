//! Async battle session.
//!
//! The session owns everything one battle run needs (state, ability book,
//! configuration, random source) and drives the core step API, publishing
//! every event on the [`EventBus`] and awaiting the [`Pacer`] between actors.
//! It is the only owner of its state, so no locks are involved.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

use combat_core::{
    AbilityOracle, BattleEngine, BattleOutcome, BattleState, CombatConfig, CombatEnv, EventLog,
    PlayerCommand, StepOutcome, TurnError,
};

use crate::bus::{Event, EventBus, Topic};
use crate::commands::{CommandSource, basic_attack};
use crate::error::{Result, RuntimeError};
use crate::pacing::{Beat, Pacer, Pacing};
use crate::rng::SessionRng;
use crate::snapshot::SessionSnapshot;

pub struct BattleSession {
    abilities: Arc<dyn AbilityOracle>,
    config: CombatConfig,
    state: BattleState,
    rng: SessionRng,
    log: EventLog,
    bus: EventBus,
    pacer: Box<dyn Pacer>,
    rounds_played: u32,
}

impl BattleSession {
    /// Creates a session with instant pacing and a fresh bus.
    pub fn new(
        abilities: Arc<dyn AbilityOracle>,
        config: CombatConfig,
        state: BattleState,
        rng: SessionRng,
    ) -> Self {
        Self {
            abilities,
            config,
            state,
            rng,
            log: EventLog::new(),
            bus: EventBus::new(),
            pacer: Box::new(Pacing::instant()),
            rounds_played: 0,
        }
    }

    /// Resumes a saved session.
    pub fn restore(
        abilities: Arc<dyn AbilityOracle>,
        config: CombatConfig,
        snapshot: SessionSnapshot,
    ) -> Self {
        Self::new(abilities, config, snapshot.state, SessionRng::Seeded(snapshot.rng))
    }

    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Box::new(pacer);
        self
    }

    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.state.outcome
    }

    /// Rounds completed by this session (not counting restored history).
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    fn engine(&mut self) -> BattleEngine<'_> {
        let env = CombatEnv::new(&*self.abilities, &self.config);
        BattleEngine::new(&mut self.state, env, &mut self.rng, &mut self.log)
    }

    /// Publishes the narration produced by the last step, then the step itself.
    fn flush(&mut self, outcome: StepOutcome) {
        for event in self.log.drain() {
            self.bus.publish(Event::Combat(event));
        }
        self.bus.publish(Event::Turn(outcome));
    }

    /// Plays one full round from the player's command to the end-of-round
    /// bookkeeping (or the end of the battle).
    ///
    /// A rejected command leaves the state untouched and is returned as
    /// [`RuntimeError::Turn`].
    pub async fn play_round(&mut self, command: PlayerCommand) -> Result<Vec<StepOutcome>> {
        let mut last = self.engine().begin_round(command)?;
        self.flush(last);
        let mut outcomes = vec![last];

        while !last.ends_round() {
            self.pacer.pause(Beat::Action).await;
            last = self.engine().step()?;
            self.flush(last);
            outcomes.push(last);
        }

        if let StepOutcome::RoundComplete { round } = last {
            self.rounds_played += 1;
            info!(round, "round complete");
        }
        self.pacer.pause(Beat::Round).await;
        Ok(outcomes)
    }

    /// Plays rounds until the battle ends or `max_rounds` more rounds have
    /// been played. Returns the outcome, if any.
    ///
    /// Commands the engine rejects are reported and replaced by a basic
    /// attack, so a misbehaving source never stalls the battle.
    pub async fn run(
        &mut self,
        commands: &dyn CommandSource,
        max_rounds: u32,
    ) -> Result<Option<BattleOutcome>> {
        let mut played = 0;
        while self.state.outcome.is_none() && played < max_rounds {
            let env = CombatEnv::new(&*self.abilities, &self.config);
            let command = commands.next_command(&self.state, env).await?;

            match self.play_round(command).await {
                Ok(_) => {}
                Err(RuntimeError::Turn(TurnError::Action(error))) => {
                    warn!(%error, ?command, "command rejected; falling back to a basic attack");
                    self.play_round(basic_attack()).await?;
                }
                Err(error) => return Err(error),
            }
            played += 1;
        }
        Ok(self.state.outcome)
    }

    /// Ends the battle now. Safe at any time; returns `false` if it had
    /// already ended.
    pub fn end_battle(&mut self, outcome: BattleOutcome) -> bool {
        let ended = self.engine().end_battle(outcome);
        if ended {
            for event in self.log.drain() {
                self.bus.publish(Event::Combat(event));
            }
            self.bus.publish(Event::Turn(StepOutcome::BattleEnded { outcome }));
        }
        ended
    }

    /// Captures state and random stream for a later [`BattleSession::restore`].
    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        let rng = self.rng.replayable().ok_or(RuntimeError::NotReplayable)?;
        Ok(SessionSnapshot::new(self.state.clone(), rng))
    }
}

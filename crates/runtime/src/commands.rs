//! Asynchronous abstraction for sourcing player commands.
//!
//! Sessions plug in a [`CommandSource`] so a battle can run with human
//! input, scripted fixtures, or an automatic pilot.
use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use combat_core::ai::{Agent, CompanionPolicy, best_index};
use combat_core::{AbilityId, BattleState, CombatEnv, CombatantId, PlayerCommand};

use crate::error::{Result, RuntimeError};

/// Trait for providing the player's command at the start of each round.
#[async_trait]
pub trait CommandSource: Send + Sync {
    async fn next_command(&self, state: &BattleState, env: CombatEnv<'_>) -> Result<PlayerCommand>;
}

/// Plain attack on the first living enemy.
pub fn basic_attack() -> PlayerCommand {
    PlayerCommand::UseAbility {
        ability: AbilityId::BasicAttack,
        target: None,
    }
}

/// Plays the player greedily with the companion's scoring, without
/// exploration or learning.
pub struct AutoPilot;

#[async_trait]
impl CommandSource for AutoPilot {
    async fn next_command(&self, state: &BattleState, env: CombatEnv<'_>) -> Result<PlayerCommand> {
        let policy = CompanionPolicy;
        let scores = Agent::new(&policy).candidates(state, env, CombatantId::PLAYER);
        let command = best_index(&scores)
            .map(|index| PlayerCommand::UseAbility {
                ability: scores[index].ability,
                target: scores[index].target,
            })
            .unwrap_or_else(basic_attack);
        tracing::debug!(?command, candidates = scores.len(), "autopilot command");
        Ok(command)
    }
}

/// Commands pushed by a frontend over a channel.
pub struct ChannelCommands {
    rx: Mutex<mpsc::Receiver<PlayerCommand>>,
}

impl ChannelCommands {
    /// Creates the source and the sender a frontend pushes into.
    pub fn new(capacity: usize) -> (mpsc::Sender<PlayerCommand>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx: Mutex::new(rx) })
    }
}

#[async_trait]
impl CommandSource for ChannelCommands {
    async fn next_command(&self, _state: &BattleState, _env: CombatEnv<'_>) -> Result<PlayerCommand> {
        self.rx
            .lock()
            .await
            .recv()
            .await
            .ok_or(RuntimeError::CommandSourceClosed)
    }
}

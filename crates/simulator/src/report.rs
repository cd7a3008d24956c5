//! Console output: live narration and the end-of-battle summary.

use anyhow::Result;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use combat_core::{BattleOutcome, BattleState, CombatantId, Side};
use combat_runtime::{BattleSession, Event, RuntimeError};

/// Prints combat events as they are published.
pub struct Narrator {
    handle: JoinHandle<()>,
}

impl Narrator {
    /// Prints the roster, then every combat event until the bus closes.
    pub fn spawn(mut events: broadcast::Receiver<Event>, state: &BattleState) -> Self {
        for combatant in state.combatants() {
            println!(
                "{} {} ({:?}, {} hp)",
                combatant.id,
                combatant.name,
                combatant.side,
                combatant.health.maximum()
            );
        }

        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(Event::Combat(event)) => println!("[{}] {}", event.tone(), event),
                    Ok(Event::Turn(_)) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "narration fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Self { handle }
    }

    /// Waits for the remaining events. The session must be dropped first.
    pub async fn finish(self) -> Result<()> {
        self.handle.await?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CombatantSummary {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub health: u32,
    pub max_health: u32,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub outcome: Option<BattleOutcome>,
    pub round: u32,
    pub rounds_played: u32,
    pub combatants: Vec<CombatantSummary>,
    /// Digest of the final snapshot; absent for entropy sessions.
    pub digest: Option<String>,
}

impl Summary {
    pub fn collect(session: &BattleSession) -> Result<Self> {
        let digest = match session.snapshot() {
            Ok(snapshot) => Some(snapshot.digest()?),
            Err(RuntimeError::NotReplayable) => None,
            Err(error) => return Err(error.into()),
        };
        let state = session.state();
        let combatants = state
            .combatants()
            .iter()
            .map(|c| CombatantSummary {
                id: c.id,
                name: c.name.clone(),
                side: c.side,
                health: c.health.current(),
                max_health: c.health.maximum(),
            })
            .collect();

        Ok(Self {
            outcome: session.outcome(),
            round: state.turn.round,
            rounds_played: session.rounds_played(),
            combatants,
            digest,
        })
    }

    pub fn print(&self) {
        println!();
        match self.outcome {
            Some(outcome) => println!("Outcome: {outcome:?} after {} rounds", self.rounds_played),
            None => println!("Undecided after {} rounds", self.rounds_played),
        }
        for c in &self.combatants {
            println!("  {} {:<16} {:>5}/{:<5} {:?}", c.id, c.name, c.health, c.max_health, c.side);
        }
        if let Some(digest) = &self.digest {
            println!("Snapshot: {digest}");
        }
    }
}

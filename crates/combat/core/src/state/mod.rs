//! Battle state.
//!
//! [`BattleState`] is plain data: every combatant, the turn counters and the
//! outcome. Cloning it together with the random source's position captures
//! everything needed to replay a battle.
mod combatant;
mod error;
mod memory;
mod posture;
mod resources;
mod status;
mod turn;

pub use combatant::{Combatant, Kit};
pub use error::InitializationError;
pub use memory::{DecisionMemory, LearnedStat};
pub use posture::{PendingIntent, Posture};
pub use resources::{Cooldowns, Meter, ResourceKind, ResourcePool};
pub use status::{StatusEntry, StatusKind, StatusLedger, StatusTick};
pub use turn::{TurnCursor, TurnPhase, TurnState};

use std::collections::BTreeSet;

use crate::config::CombatConfig;
use crate::env::AbilityOracle;

/// Unique identifier of a combatant within one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    /// Reserved for the player character.
    pub const PLAYER: Self = Self(0);
}

impl core::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Allegiance. Player and companion fight on the same team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Companion,
    Hostile,
}

impl Side {
    pub fn is_ally_of(self, other: Side) -> bool {
        self.is_hostile() == other.is_hostile()
    }

    pub fn is_hostile(self) -> bool {
        self == Side::Hostile
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Fled,
}

/// Fully-populated combatant set handed over by the encounter builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    pub player: Combatant,
    pub companion: Option<Combatant>,
    pub hostiles: Vec<Combatant>,
}

impl Encounter {
    /// Checks that every kit ability has a definition in `abilities`.
    ///
    /// # Errors
    ///
    /// Returns the first [`InitializationError::UnknownAbility`] found.
    pub fn check_abilities(&self, abilities: &dyn AbilityOracle) -> Result<(), InitializationError> {
        let everyone = std::iter::once(&self.player)
            .chain(self.companion.iter())
            .chain(self.hostiles.iter());
        for combatant in everyone {
            if let Some(ability) = combatant
                .kit
                .iter()
                .find(|ability| abilities.definition(**ability).is_none())
            {
                return Err(InitializationError::UnknownAbility {
                    combatant: combatant.id,
                    ability: *ability,
                });
            }
        }
        Ok(())
    }
}

/// Complete state of one battle run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    /// Player first, then the companion (if any), then hostiles in turn order.
    combatants: Vec<Combatant>,
    pub turn: TurnState,
    pub outcome: Option<BattleOutcome>,
}

impl BattleState {
    /// Validates the encounter contract and builds the initial state.
    ///
    /// # Errors
    ///
    /// Returns an [`InitializationError`] describing the first violation.
    pub fn new(encounter: Encounter) -> Result<Self, InitializationError> {
        let Encounter {
            player,
            companion,
            hostiles,
        } = encounter;

        if player.id != CombatantId::PLAYER || player.side != Side::Player {
            return Err(InitializationError::InvalidPlayer {
                expected: CombatantId::PLAYER,
                found: player.id,
                side: player.side,
            });
        }
        if let Some(companion) = &companion {
            expect_side(companion, Side::Companion)?;
        }
        if hostiles.is_empty() {
            return Err(InitializationError::NoHostiles);
        }
        for hostile in &hostiles {
            expect_side(hostile, Side::Hostile)?;
        }

        let mut combatants = Vec::with_capacity(2 + hostiles.len());
        combatants.push(player);
        combatants.extend(companion);
        combatants.extend(hostiles);

        if combatants.len() > CombatConfig::MAX_COMBATANTS {
            return Err(InitializationError::TooManyCombatants {
                count: combatants.len(),
                max: CombatConfig::MAX_COMBATANTS,
            });
        }

        let mut seen = BTreeSet::new();
        for combatant in &combatants {
            if !seen.insert(combatant.id) {
                return Err(InitializationError::DuplicateId(combatant.id));
            }
            if !combatant.is_alive() {
                return Err(InitializationError::DeadOnArrival(combatant.id));
            }
            if !combatant.stats.is_finite() {
                return Err(InitializationError::NonFiniteStats(combatant.id));
            }
        }

        Ok(Self {
            combatants,
            turn: TurnState::new(),
            outcome: None,
        })
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn combatants_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.combatant(CombatantId::PLAYER)
    }

    pub fn companion(&self) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.side == Side::Companion)
    }

    pub fn hostiles(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.side == Side::Hostile)
    }

    /// Hostile at roster position `index`, dead or alive.
    pub fn hostile_at(&self, index: usize) -> Option<&Combatant> {
        self.hostiles().nth(index)
    }

    pub fn hostile_count(&self) -> usize {
        self.hostiles().count()
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.combatant(id).is_some_and(Combatant::is_alive)
    }

    /// Living members of the team opposing `side`, in roster order.
    pub fn living_enemies_of(&self, side: Side) -> Vec<CombatantId> {
        self.combatants
            .iter()
            .filter(|c| c.is_alive() && !c.side.is_ally_of(side))
            .map(|c| c.id)
            .collect()
    }

    /// Living members of `side`'s team, in roster order.
    pub fn living_allies_of(&self, side: Side) -> Vec<CombatantId> {
        self.combatants
            .iter()
            .filter(|c| c.is_alive() && c.side.is_ally_of(side))
            .map(|c| c.id)
            .collect()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Outcome implied by who is still standing.
    pub fn evaluate_outcome(&self) -> Option<BattleOutcome> {
        if !self.is_alive(CombatantId::PLAYER) {
            Some(BattleOutcome::Defeat)
        } else if self.hostiles().all(|h| !h.is_alive()) {
            Some(BattleOutcome::Victory)
        } else {
            None
        }
    }
}

fn expect_side(combatant: &Combatant, expected: Side) -> Result<(), InitializationError> {
    if combatant.side == expected {
        Ok(())
    } else {
        Err(InitializationError::SideMismatch {
            combatant: combatant.id,
            expected,
            found: combatant.side,
        })
    }
}

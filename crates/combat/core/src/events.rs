//! Structured narration.
//!
//! The engine never formats player-facing prose. It emits [`CombatEvent`]s to
//! a [`NarrationSink`]; each event carries a [`Tone`] and a terse `Display`
//! form for logs, and the presentation layer decides the rest.

use crate::ability::AbilityId;
use crate::state::{BattleOutcome, CombatantId, Side, StatusKind};

/// Presentation hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    Normal,
    Good,
    Danger,
    System,
}

/// Why an actor did not act.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    Staggered,
    Stunned,
    /// Nothing could be resolved, not even the plain attack.
    Idle,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    RoundStarted {
        round: u32,
    },
    AbilityUsed {
        actor: CombatantId,
        side: Side,
        ability: AbilityId,
    },
    Damaged {
        source: CombatantId,
        target: CombatantId,
        /// Side of the target.
        side: Side,
        amount: u32,
        absorbed: u32,
        crit: bool,
    },
    Dodged {
        source: CombatantId,
        target: CombatantId,
        side: Side,
    },
    Healed {
        target: CombatantId,
        side: Side,
        amount: u32,
    },
    Shielded {
        target: CombatantId,
        side: Side,
        amount: u32,
    },
    StatusApplied {
        target: CombatantId,
        side: Side,
        kind: StatusKind,
        duration: u32,
    },
    StatusFaded {
        target: CombatantId,
        kind: StatusKind,
    },
    PeriodicDamage {
        target: CombatantId,
        side: Side,
        amount: u32,
    },
    PostureBroken {
        target: CombatantId,
    },
    IntentDeclared {
        actor: CombatantId,
        ability: AbilityId,
        turns: u32,
    },
    IntentCharging {
        actor: CombatantId,
        ability: AbilityId,
        turns_remaining: u32,
    },
    Interrupted {
        target: CombatantId,
        ability: AbilityId,
    },
    LifeSteal {
        actor: CombatantId,
        amount: u32,
    },
    Thorns {
        source: CombatantId,
        target: CombatantId,
        amount: u32,
    },
    TurnSkipped {
        actor: CombatantId,
        reason: SkipReason,
    },
    Defeated {
        target: CombatantId,
        side: Side,
    },
    LootDropped {
        total: u32,
    },
    FleeFailed,
    BattleEnded {
        outcome: BattleOutcome,
    },
}

impl CombatEvent {
    pub fn tone(&self) -> Tone {
        use CombatEvent::*;
        let against = |side: &Side| if side.is_hostile() { Tone::Good } else { Tone::Danger };
        let favoring = |side: &Side| if side.is_hostile() { Tone::Danger } else { Tone::Good };
        match self {
            RoundStarted { .. } | BattleEnded { .. } | LootDropped { .. } => Tone::System,
            AbilityUsed { .. } | StatusFaded { .. } | Dodged { .. } | LifeSteal { .. } => {
                Tone::Normal
            }
            Damaged { side, .. } | PeriodicDamage { side, .. } | Defeated { side, .. } => {
                against(side)
            }
            Healed { side, .. } | Shielded { side, .. } => favoring(side),
            StatusApplied { side, kind, .. } => {
                if kind.is_debuff() {
                    against(side)
                } else {
                    favoring(side)
                }
            }
            PostureBroken { .. } | Interrupted { .. } => Tone::Good,
            IntentDeclared { .. } | IntentCharging { .. } | FleeFailed => Tone::Danger,
            Thorns { .. } | TurnSkipped { .. } => Tone::Normal,
        }
    }
}

impl core::fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use CombatEvent::*;
        match self {
            RoundStarted { round } => write!(f, "round {round}"),
            AbilityUsed { actor, ability, .. } => write!(f, "{actor} uses {ability}"),
            Damaged {
                source,
                target,
                amount,
                absorbed,
                crit,
                ..
            } => {
                write!(f, "{source} hits {target} for {amount}")?;
                if *crit {
                    write!(f, " (crit)")?;
                }
                if *absorbed > 0 {
                    write!(f, " [{absorbed} absorbed]")?;
                }
                Ok(())
            }
            Dodged { source, target, .. } => write!(f, "{target} dodges {source}"),
            Healed { target, amount, .. } => write!(f, "{target} heals {amount}"),
            Shielded { target, amount, .. } => write!(f, "{target} gains a {amount} shield"),
            StatusApplied {
                target,
                kind,
                duration,
                ..
            } => write!(f, "{target} gains {kind} ({duration})"),
            StatusFaded { target, kind } => write!(f, "{kind} fades from {target}"),
            PeriodicDamage { target, amount, .. } => {
                write!(f, "{target} suffers {amount} over time")
            }
            PostureBroken { target } => write!(f, "{target} is broken"),
            IntentDeclared {
                actor,
                ability,
                turns,
            } => write!(f, "{actor} prepares {ability} ({turns})"),
            IntentCharging {
                actor,
                ability,
                turns_remaining,
            } => write!(f, "{actor} charges {ability} ({turns_remaining} left)"),
            Interrupted { target, ability } => write!(f, "{target}'s {ability} is interrupted"),
            LifeSteal { actor, amount } => write!(f, "{actor} drains {amount}"),
            Thorns {
                source,
                target,
                amount,
            } => write!(f, "{source} reflects {amount} to {target}"),
            TurnSkipped { actor, reason } => write!(f, "{actor} loses the turn ({reason})"),
            Defeated { target, .. } => write!(f, "{target} falls"),
            LootDropped { total } => write!(f, "loot dropped ({total})"),
            FleeFailed => write!(f, "escape failed"),
            BattleEnded { outcome } => write!(f, "battle over: {outcome:?}"),
        }
    }
}

/// Receives engine events.
pub trait NarrationSink {
    fn emit(&mut self, event: CombatEvent);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl NarrationSink for NullSink {
    fn emit(&mut self, _event: CombatEvent) {}
}

/// In-memory event collector.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}

impl NarrationSink for EventLog {
    fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }
}

impl<S: NarrationSink + ?Sized> NarrationSink for &mut S {
    fn emit(&mut self, event: CombatEvent) {
        (**self).emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_depends_on_who_is_hit() {
        let hit = |side| CombatEvent::Damaged {
            source: CombatantId(2),
            target: CombatantId(0),
            side,
            amount: 10,
            absorbed: 0,
            crit: false,
        };
        assert_eq!(hit(Side::Player).tone(), Tone::Danger);
        assert_eq!(hit(Side::Hostile).tone(), Tone::Good);
        assert_eq!(CombatEvent::RoundStarted { round: 1 }.tone(), Tone::System);
    }

    #[test]
    fn display_is_terse() {
        let event = CombatEvent::Damaged {
            source: CombatantId(0),
            target: CombatantId(2),
            side: Side::Hostile,
            amount: 42,
            absorbed: 5,
            crit: true,
        };
        assert_eq!(event.to_string(), "#0 hits #2 for 42 (crit) [5 absorbed]");
        assert_eq!(Tone::Danger.to_string(), "danger");
    }

    #[test]
    fn log_collects_in_order() {
        let mut log = EventLog::new();
        log.emit(CombatEvent::RoundStarted { round: 1 });
        log.emit(CombatEvent::FleeFailed);
        assert_eq!(log.len(), 2);
        assert_eq!(log.drain().len(), 2);
        assert!(log.is_empty());
    }
}

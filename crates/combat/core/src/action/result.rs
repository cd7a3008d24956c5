use crate::ability::AbilityId;
use crate::events::CombatEvent;
use crate::state::{CombatantId, StatusKind};

/// How an ability went through the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolveMode {
    /// Resolved immediately.
    Direct,
    /// Telegraphed: cost and cooldown paid, intent stored.
    Declare,
    /// A matured intent went off. No cost, cooldown untouched.
    Execute,
}

/// One observable consequence of an action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppliedEffect {
    Damage {
        target: CombatantId,
        /// Health removed.
        amount: u32,
        /// Soaked by a shield.
        absorbed: u32,
        crit: bool,
        splash: bool,
        killed: bool,
    },
    Dodged {
        target: CombatantId,
    },
    Heal {
        target: CombatantId,
        amount: u32,
    },
    Shield {
        target: CombatantId,
        amount: u32,
    },
    Status {
        target: CombatantId,
        kind: StatusKind,
        magnitude: f64,
        duration: u32,
    },
    PostureBreak {
        target: CombatantId,
    },
    Interrupt {
        target: CombatantId,
        ability: AbilityId,
    },
    LifeSteal {
        amount: u32,
    },
    Thorns {
        /// The attacker that was hurt by its own hit.
        target: CombatantId,
        amount: u32,
    },
    Declared {
        turns: u32,
    },
}

/// Outcome descriptor of [`resolve`](super::resolve).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    pub actor: CombatantId,
    pub ability: AbilityId,
    pub mode: ResolveMode,
    pub effects: Vec<AppliedEffect>,
    pub narration: Vec<CombatEvent>,
}

impl Resolution {
    pub fn new(actor: CombatantId, ability: AbilityId, mode: ResolveMode) -> Self {
        Self {
            actor,
            ability,
            mode,
            effects: Vec::new(),
            narration: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, effect: AppliedEffect) {
        self.effects.push(effect);
    }

    pub(crate) fn narrate(&mut self, event: CombatEvent) {
        self.narration.push(event);
    }

    /// Health removed from `target` (shield absorption excluded).
    pub fn damage_to(&self, target: CombatantId) -> u32 {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                AppliedEffect::Damage {
                    target: t, amount, ..
                } if *t == target => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Damage dealt to every target, shield absorption included.
    pub fn total_damage(&self) -> u32 {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                AppliedEffect::Damage {
                    amount, absorbed, ..
                } => Some(amount + absorbed),
                _ => None,
            })
            .sum()
    }

    /// `(target, health removed)` for every damaged target, first hit first.
    pub fn damaged_targets(&self) -> Vec<(CombatantId, u32)> {
        let mut out: Vec<(CombatantId, u32)> = Vec::new();
        for effect in &self.effects {
            if let AppliedEffect::Damage { target, amount, .. } = effect {
                match out.iter_mut().find(|(id, _)| id == target) {
                    Some((_, total)) => *total += amount,
                    None => out.push((*target, *amount)),
                }
            }
        }
        out
    }

    pub fn total_healing(&self) -> u32 {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                AppliedEffect::Heal { amount, .. } => Some(*amount),
                _ => None,
            })
            .sum()
    }

    pub fn total_shielding(&self) -> u32 {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                AppliedEffect::Shield { amount, .. } => Some(*amount),
                _ => None,
            })
            .sum()
    }

    pub fn statuses_applied(&self) -> usize {
        self.effects
            .iter()
            .filter(|effect| matches!(effect, AppliedEffect::Status { .. }))
            .count()
    }

    pub fn kills(&self) -> Vec<CombatantId> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                AppliedEffect::Damage {
                    target,
                    killed: true,
                    ..
                } => Some(*target),
                _ => None,
            })
            .collect()
    }

    pub fn was_crit(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect, AppliedEffect::Damage { crit: true, .. }))
    }

    pub fn broke_posture(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect, AppliedEffect::PostureBreak { .. }))
    }
}

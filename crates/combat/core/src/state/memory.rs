//! Learned per-ability values for an AI-controlled combatant.

use std::collections::BTreeMap;

use crate::ability::AbilityId;
use crate::combat::sanitize;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearnedStat {
    /// Exponential moving average of rewards.
    pub value: f64,
    pub uses: u32,
}

/// Owned by one combatant and dropped with it.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionMemory {
    entries: BTreeMap<AbilityId, LearnedStat>,
    /// Decisions taken so far; drives exploration decay.
    experience: u32,
}

impl DecisionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, ability: AbilityId) -> f64 {
        self.entries.get(&ability).map_or(0.0, |s| s.value)
    }

    pub fn stat(&self, ability: AbilityId) -> Option<&LearnedStat> {
        self.entries.get(&ability)
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn note_decision(&mut self) {
        self.experience = self.experience.saturating_add(1);
    }

    /// Folds `reward` into the running value with rate
    /// `max(min_rate, 1 / (uses + 1))`. Returns the updated value.
    pub fn record(&mut self, ability: AbilityId, reward: f64, min_rate: f64) -> f64 {
        let reward = sanitize(reward);
        let entry = self.entries.entry(ability).or_default();
        let rate = (1.0 / f64::from(entry.uses.saturating_add(1))).max(sanitize(min_rate));
        entry.value += rate.min(1.0) * (reward - entry.value);
        entry.uses = entry.uses.saturating_add(1);
        entry.value
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AbilityId, &LearnedStat)> {
        self.entries.iter()
    }
}

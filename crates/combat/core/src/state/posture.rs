//! Posture (stagger) pool and telegraphed intents.

use crate::ability::AbilityId;

/// Breakable stagger resource. `0 <= current < maximum` between hits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Posture {
    current: u32,
    maximum: u32,
}

impl Posture {
    pub fn new(maximum: u32) -> Self {
        Self {
            current: 0,
            maximum: maximum.max(1),
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Adds `gain`. Reaching the maximum resets the pool to zero and returns
    /// `true`.
    pub fn accrue(&mut self, gain: u32) -> bool {
        let next = self.current.saturating_add(gain);
        if next >= self.maximum {
            self.current = 0;
            true
        } else {
            self.current = next;
            false
        }
    }
}

/// A declared telegraphed ability waiting to go off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingIntent {
    pub ability: AbilityId,
    /// Own turns left before it executes.
    pub turns_remaining: u32,
    pub declared_round: u32,
}

impl PendingIntent {
    pub fn new(ability: AbilityId, turns: u32, declared_round: u32) -> Self {
        Self {
            ability,
            turns_remaining: turns.max(1),
            declared_round,
        }
    }

    /// Counts down one of the owner's turns. Returns `true` once matured.
    pub fn advance(&mut self) -> bool {
        self.turns_remaining = self.turns_remaining.saturating_sub(1);
        self.turns_remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accrue_resets_at_maximum() {
        let mut posture = Posture::new(50);
        assert!(!posture.accrue(15));
        assert!(!posture.accrue(15));
        assert!(!posture.accrue(15));
        assert_eq!(posture.current(), 45);
        assert!(posture.accrue(15));
        assert_eq!(posture.current(), 0);
    }

    #[test]
    fn intent_matures_after_its_turns() {
        let mut intent = PendingIntent::new(AbilityId::Meteor, 2, 1);
        assert!(!intent.advance());
        assert!(intent.advance());
    }
}

//! Per-combatant ledger of timed modifiers.
//!
//! Invariants kept by every mutator:
//! - magnitudes are finite and non-negative
//! - an entry with zero remaining duration is removed, never left behind
//! - [`StatusLedger::tick`] runs at most once per round

use std::collections::BTreeMap;

use crate::combat::sanitize;

/// Closed set of status kinds.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    // Damage over time
    Bleed,
    Burn,
    Poison,

    // Buffs
    /// Absorbs incoming damage before health.
    Shield,
    AttackUp,
    MagicUp,
    ArmorUp,
    /// Heals its magnitude once per tick.
    Regen,
    /// Probability of evading an incoming hit.
    Dodge,
    /// Damage-reduction fraction.
    Guard,

    // Debuffs
    AttackDown,
    ArmorDown,
    /// Extra damage taken, as a fraction.
    Vulnerable,
    /// Skips the owner's next action.
    Stun,
    /// Posture broken: takes extra damage.
    Broken,
}

impl StatusKind {
    pub fn is_damage_over_time(self) -> bool {
        matches!(self, Self::Bleed | Self::Burn | Self::Poison)
    }

    pub fn is_debuff(self) -> bool {
        self.is_damage_over_time()
            || matches!(
                self,
                Self::AttackDown | Self::ArmorDown | Self::Vulnerable | Self::Stun | Self::Broken
            )
    }

    pub fn is_buff(self) -> bool {
        !self.is_debuff()
    }
}

/// Magnitude and remaining rounds of one active status.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEntry {
    pub magnitude: f64,
    pub remaining: u32,
}

/// What one round's tick produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusTick {
    /// Summed damage-over-time magnitude.
    pub damage: f64,
    /// `Regen` magnitude.
    pub heal: f64,
    /// Kinds whose duration ran out this tick.
    pub faded: Vec<StatusKind>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusLedger {
    entries: BTreeMap<StatusKind, StatusEntry>,
    /// Round of the most recent tick.
    last_tick: Option<u32>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a timed status.
    ///
    /// Overlapping applications keep the larger magnitude and the longer
    /// remaining duration; they never add up. Zero-duration or
    /// zero-magnitude applications are ignored.
    ///
    /// Returns `true` if the ledger changed.
    pub fn apply_timed(&mut self, kind: StatusKind, magnitude: f64, duration: u32) -> bool {
        let magnitude = sanitize(magnitude).max(0.0);
        if duration == 0 || magnitude <= 0.0 {
            return false;
        }

        match self.entries.get_mut(&kind) {
            Some(entry) => {
                let before = *entry;
                entry.magnitude = entry.magnitude.max(magnitude);
                entry.remaining = entry.remaining.max(duration);
                *entry != before
            }
            None => {
                self.entries.insert(
                    kind,
                    StatusEntry {
                        magnitude,
                        remaining: duration,
                    },
                );
                true
            }
        }
    }

    /// Adds absorb to the shield. Amounts sum; duration refreshes to the
    /// longer of the two.
    pub fn add_shield(&mut self, amount: f64, duration: u32) -> bool {
        let amount = sanitize(amount).max(0.0);
        if duration == 0 || amount <= 0.0 {
            return false;
        }
        let entry = self.entries.entry(StatusKind::Shield).or_insert(StatusEntry {
            magnitude: 0.0,
            remaining: 0,
        });
        entry.magnitude += amount;
        entry.remaining = entry.remaining.max(duration);
        true
    }

    /// Soaks up to `damage` with the shield. Returns `(absorbed, leftover)`.
    pub fn absorb(&mut self, damage: u32) -> (u32, u32) {
        let Some(entry) = self.entries.get_mut(&StatusKind::Shield) else {
            return (0, damage);
        };
        let capacity = entry.magnitude.floor().min(f64::from(u32::MAX)) as u32;
        let absorbed = capacity.min(damage);
        entry.magnitude -= f64::from(absorbed);
        if entry.magnitude < 1.0 {
            self.entries.remove(&StatusKind::Shield);
        }
        (absorbed, damage - absorbed)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEntry> {
        self.entries.get(&kind)
    }

    /// Active magnitude, `0.0` if absent.
    pub fn magnitude(&self, kind: StatusKind) -> f64 {
        self.entries.get(&kind).map_or(0.0, |e| e.magnitude)
    }

    pub fn remaining(&self, kind: StatusKind) -> u32 {
        self.entries.get(&kind).map_or(0, |e| e.remaining)
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn remove(&mut self, kind: StatusKind) -> Option<StatusEntry> {
        self.entries.remove(&kind)
    }

    /// Removes every debuff, returning the kinds removed.
    pub fn clear_debuffs(&mut self) -> Vec<StatusKind> {
        let removed: Vec<StatusKind> = self
            .entries
            .keys()
            .copied()
            .filter(|kind| kind.is_debuff())
            .collect();
        for kind in &removed {
            self.entries.remove(kind);
        }
        removed
    }

    pub fn debuff_count(&self) -> usize {
        self.entries.keys().filter(|k| k.is_debuff()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatusKind, &StatusEntry)> {
        self.entries.iter().map(|(kind, entry)| (*kind, entry))
    }

    pub fn last_tick(&self) -> Option<u32> {
        self.last_tick
    }

    /// Runs the periodic tick for `round`.
    ///
    /// Damage-over-time and regen are read once, then every duration drops by
    /// one and expired entries are removed. A second call for the same round
    /// returns `None` and changes nothing.
    pub fn tick(&mut self, round: u32) -> Option<StatusTick> {
        if self.last_tick.is_some_and(|last| last >= round) {
            return None;
        }
        self.last_tick = Some(round);

        let mut tick = StatusTick::default();
        for (kind, entry) in &self.entries {
            if kind.is_damage_over_time() {
                tick.damage += entry.magnitude;
            } else if *kind == StatusKind::Regen {
                tick.heal += entry.magnitude;
            }
        }

        for (kind, entry) in self.entries.iter_mut() {
            entry.remaining = entry.remaining.saturating_sub(1);
            if entry.remaining == 0 {
                tick.faded.push(*kind);
            }
        }
        self.entries.retain(|_, entry| entry.remaining > 0);

        Some(tick)
    }
}

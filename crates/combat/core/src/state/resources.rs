//! Health meter, class resource and cooldown table.

use std::collections::BTreeMap;

use crate::ability::AbilityId;
use crate::combat::sanitize_ratio;
use crate::config::ResourceConfig;

/// Bounded counter: `0 <= current <= maximum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meter {
    current: u32,
    maximum: u32,
}

impl Meter {
    /// Full meter.
    pub fn new(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn with_current(maximum: u32, current: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    pub fn missing(&self) -> u32 {
        self.maximum - self.current
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// `current / maximum`, `0.0` for an empty pool.
    pub fn fraction(&self) -> f64 {
        if self.maximum == 0 {
            0.0
        } else {
            f64::from(self.current) / f64::from(self.maximum)
        }
    }

    /// Removes up to `amount`, returning what was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.current);
        self.current -= taken;
        taken
    }

    /// Adds up to `amount`, returning what was actually added.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.missing());
        self.current += added;
        added
    }
}

/// Class-specific secondary resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    /// Regenerates a fraction of maximum each round.
    Mana,
    /// Starts empty, built by trading blows, decays each round.
    Rage,
    /// Regenerates quickly.
    Energy,
    /// Regenerates slowly.
    Focus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    pub kind: ResourceKind,
    meter: Meter,
}

impl ResourcePool {
    /// Rage pools start empty; every other kind starts full.
    pub fn new(kind: ResourceKind, maximum: u32) -> Self {
        let meter = match kind {
            ResourceKind::Rage => Meter::with_current(maximum, 0),
            _ => Meter::new(maximum),
        };
        Self { kind, meter }
    }

    pub fn current(&self) -> u32 {
        self.meter.current()
    }

    pub fn maximum(&self) -> u32 {
        self.meter.maximum()
    }

    pub fn fill(&self) -> f64 {
        self.meter.fraction()
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.meter.current() >= cost
    }

    /// Deducts `cost` if affordable.
    pub fn spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.meter.drain(cost);
        true
    }

    pub fn gain(&mut self, amount: u32) -> u32 {
        self.meter.restore(amount)
    }

    /// End-of-round regeneration or decay. Returns the signed change.
    pub fn round_tick(&mut self, config: &ResourceConfig) -> i64 {
        let regen = |ratio: f64, max: u32| (f64::from(max) * sanitize_ratio(ratio)).round() as u32;
        match self.kind {
            ResourceKind::Rage => -i64::from(self.meter.drain(config.rage_decay)),
            ResourceKind::Mana => i64::from(self.gain(regen(config.mana_regen, self.maximum()))),
            ResourceKind::Energy => i64::from(self.gain(regen(config.energy_regen, self.maximum()))),
            ResourceKind::Focus => i64::from(self.gain(regen(config.focus_regen, self.maximum()))),
        }
    }

    /// Outgoing damage bonus granted by a full rage bar, scaled by fill.
    pub fn damage_bonus(&self, config: &ResourceConfig) -> f64 {
        match self.kind {
            ResourceKind::Rage => sanitize_ratio(config.rage_damage_bonus) * self.fill(),
            _ => 0.0,
        }
    }
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::new(ResourceKind::Mana, 0)
    }
}

/// Remaining cooldown rounds per ability. Ready abilities have no entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldowns {
    remaining: BTreeMap<AbilityId, CooldownEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct CooldownEntry {
    rounds: u32,
    /// Round of use; the end of that round does not count.
    started: u32,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks `ability` for the `rounds` rounds following `round`.
    pub fn start(&mut self, ability: AbilityId, rounds: u32, round: u32) {
        if rounds > 0 {
            self.remaining.insert(
                ability,
                CooldownEntry {
                    rounds,
                    started: round,
                },
            );
        }
    }

    pub fn remaining(&self, ability: AbilityId) -> u32 {
        self.remaining.get(&ability).map_or(0, |entry| entry.rounds)
    }

    pub fn is_ready(&self, ability: AbilityId) -> bool {
        self.remaining(ability) == 0
    }

    /// Closes `round`: every cooldown started before it loses one round.
    pub fn tick(&mut self, round: u32) {
        for entry in self.remaining.values_mut() {
            if entry.started < round {
                entry.rounds = entry.rounds.saturating_sub(1);
            }
        }
        self.remaining.retain(|_, entry| entry.rounds > 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (AbilityId, u32)> + '_ {
        self.remaining.iter().map(|(ability, entry)| (*ability, entry.rounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_stays_in_bounds() {
        let mut meter = Meter::new(50);
        assert_eq!(meter.drain(80), 50);
        assert!(meter.is_empty());
        assert_eq!(meter.restore(80), 50);
        assert_eq!(meter.current(), 50);
    }

    #[test]
    fn rage_starts_empty_and_decays() {
        let config = ResourceConfig::default();
        let mut rage = ResourcePool::new(ResourceKind::Rage, 100);
        assert_eq!(rage.current(), 0);
        rage.gain(40);
        assert!((rage.damage_bonus(&config) - 0.1).abs() < 1e-9);
        assert_eq!(rage.round_tick(&config), -5);
        assert_eq!(rage.current(), 35);
    }

    #[test]
    fn mana_regenerates_by_fraction() {
        let config = ResourceConfig::default();
        let mut mana = ResourcePool::new(ResourceKind::Mana, 100);
        assert!(mana.spend(30));
        assert!(!mana.spend(80));
        assert_eq!(mana.round_tick(&config), 8);
        assert_eq!(mana.current(), 78);
    }

    #[test]
    fn cooldowns_expire() {
        let mut cooldowns = Cooldowns::new();
        cooldowns.start(AbilityId::Fireball, 2, 1);
        cooldowns.start(AbilityId::Mend, 0, 1);
        assert!(!cooldowns.is_ready(AbilityId::Fireball));
        assert!(cooldowns.is_ready(AbilityId::Mend));
        cooldowns.tick(1);
        assert_eq!(cooldowns.remaining(AbilityId::Fireball), 2);
        cooldowns.tick(2);
        assert_eq!(cooldowns.remaining(AbilityId::Fireball), 1);
        cooldowns.tick(3);
        assert!(cooldowns.is_ready(AbilityId::Fireball));
    }

    #[test]
    fn round_of_use_does_not_count_toward_the_cooldown() {
        let mut cooldowns = Cooldowns::new();
        cooldowns.start(AbilityId::PowerStrike, 1, 4);
        cooldowns.tick(4);
        assert!(!cooldowns.is_ready(AbilityId::PowerStrike));
        cooldowns.tick(5);
        assert!(cooldowns.is_ready(AbilityId::PowerStrike));
        assert_eq!(cooldowns.iter().count(), 0);
    }
}

//! Per-ability upgrade tiers.
//!
//! Every upgraded ability sits on exactly one of two mutually exclusive paths.
//! The path is an enum, so "both" is not representable.

use std::collections::BTreeMap;

use crate::config::CombatConfig;

use super::AbilityId;

/// Upgrade path chosen for an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpgradePath {
    /// Higher potency; the final tier also sharpens crits.
    Potency,
    /// Lower cost; higher tiers shorten the cooldown.
    Efficiency,
}

/// Upgrade tier on a path. Tier 0 is the base ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityUpgrade {
    pub path: UpgradePath,
    tier: u8,
}

impl AbilityUpgrade {
    const POTENCY_PER_TIER: f64 = 0.15;
    const COST_CUT_PER_TIER: f64 = 0.15;
    const FINAL_TIER_CRIT: f64 = 0.05;

    /// Creates an upgrade, clamping the tier to [`CombatConfig::MAX_UPGRADE_TIER`].
    pub fn new(path: UpgradePath, tier: u8) -> Self {
        Self {
            path,
            tier: tier.min(CombatConfig::MAX_UPGRADE_TIER),
        }
    }

    pub fn tier(&self) -> u8 {
        self.tier
    }

    pub fn potency_multiplier(&self) -> f64 {
        match self.path {
            UpgradePath::Potency => 1.0 + Self::POTENCY_PER_TIER * f64::from(self.tier),
            UpgradePath::Efficiency => 1.0,
        }
    }

    pub fn cost_multiplier(&self) -> f64 {
        match self.path {
            UpgradePath::Potency => 1.0,
            UpgradePath::Efficiency => 1.0 - Self::COST_CUT_PER_TIER * f64::from(self.tier),
        }
    }

    /// Rounds shaved off the cooldown.
    pub fn cooldown_reduction(&self) -> u32 {
        match self.path {
            UpgradePath::Potency => 0,
            UpgradePath::Efficiency => u32::from(self.tier / 2),
        }
    }

    pub fn crit_bonus(&self) -> f64 {
        match self.path {
            UpgradePath::Potency if self.tier >= CombatConfig::MAX_UPGRADE_TIER => {
                Self::FINAL_TIER_CRIT
            }
            _ => 0.0,
        }
    }
}

/// Upgrade table of one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Upgrades {
    entries: BTreeMap<AbilityId, AbilityUpgrade>,
}

impl Upgrades {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or replaces) the upgrade of `ability`. Switching path replaces
    /// the old tier entirely.
    pub fn set(&mut self, ability: AbilityId, upgrade: AbilityUpgrade) {
        if upgrade.tier == 0 {
            self.entries.remove(&ability);
        } else {
            self.entries.insert(ability, upgrade);
        }
    }

    pub fn get(&self, ability: AbilityId) -> Option<&AbilityUpgrade> {
        self.entries.get(&ability)
    }

    pub fn potency_multiplier(&self, ability: AbilityId) -> f64 {
        self.get(ability).map_or(1.0, AbilityUpgrade::potency_multiplier)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AbilityId, &AbilityUpgrade)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_is_clamped() {
        let upgrade = AbilityUpgrade::new(UpgradePath::Potency, 9);
        assert_eq!(upgrade.tier(), CombatConfig::MAX_UPGRADE_TIER);
    }

    #[test]
    fn paths_are_exclusive() {
        let potency = AbilityUpgrade::new(UpgradePath::Potency, 2);
        assert!((potency.potency_multiplier() - 1.3).abs() < 1e-9);
        assert_eq!(potency.cost_multiplier(), 1.0);
        assert_eq!(potency.cooldown_reduction(), 0);

        let efficiency = AbilityUpgrade::new(UpgradePath::Efficiency, 2);
        assert_eq!(efficiency.potency_multiplier(), 1.0);
        assert!((efficiency.cost_multiplier() - 0.7).abs() < 1e-9);
        assert_eq!(efficiency.cooldown_reduction(), 1);
    }

    #[test]
    fn switching_path_replaces_entry() {
        let mut upgrades = Upgrades::new();
        upgrades.set(AbilityId::Fireball, AbilityUpgrade::new(UpgradePath::Potency, 3));
        upgrades.set(AbilityId::Fireball, AbilityUpgrade::new(UpgradePath::Efficiency, 1));
        let entry = upgrades.get(AbilityId::Fireball).copied();
        assert_eq!(entry.map(|u| u.path), Some(UpgradePath::Efficiency));

        upgrades.set(AbilityId::Fireball, AbilityUpgrade::new(UpgradePath::Potency, 0));
        assert!(upgrades.get(AbilityId::Fireball).is_none());
    }
}

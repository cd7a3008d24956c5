use arrayvec::ArrayVec;

use crate::ability::{AbilityId, Upgrades};
use crate::combat::Resistances;
use crate::config::CombatConfig;
use crate::stats::{BaseStats, EffectiveStats, Passives};

use super::{
    CombatantId, Cooldowns, DecisionMemory, InitializationError, Meter, PendingIntent, Posture,
    ResourcePool, Side, StatusLedger,
};

/// Abilities a combatant may use, in preference order.
pub type Kit = ArrayVec<AbilityId, { CombatConfig::MAX_KIT }>;

/// One participant of a battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub level: u32,
    pub health: Meter,
    pub resource: ResourcePool,
    pub stats: BaseStats,
    pub resistances: Resistances,
    pub passives: Passives,
    pub statuses: StatusLedger,
    /// Only hostiles carry posture.
    pub posture: Option<Posture>,
    pub kit: Kit,
    pub cooldowns: Cooldowns,
    pub upgrades: Upgrades,
    pub intent: Option<PendingIntent>,
    pub memory: DecisionMemory,
    /// Set by a posture break; consumed by the next turn.
    pub staggered: bool,
    /// Set once the defeat has been processed.
    pub fallen: bool,
}

impl Combatant {
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        side: Side,
        max_health: u32,
        stats: BaseStats,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            level: 1,
            health: Meter::new(max_health),
            resource: ResourcePool::default(),
            stats,
            resistances: Resistances::default(),
            passives: Passives::default(),
            statuses: StatusLedger::default(),
            posture: None,
            kit: Kit::new(),
            cooldowns: Cooldowns::default(),
            upgrades: Upgrades::default(),
            intent: None,
            memory: DecisionMemory::default(),
            staggered: false,
            fallen: false,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_resource(mut self, resource: ResourcePool) -> Self {
        self.resource = resource;
        self
    }

    pub fn with_resistances(mut self, resistances: Resistances) -> Self {
        self.resistances = resistances;
        self
    }

    pub fn with_passives(mut self, passives: Passives) -> Self {
        self.passives = passives;
        self
    }

    pub fn with_posture(mut self, maximum: u32) -> Self {
        self.posture = Some(Posture::new(maximum));
        self
    }

    pub fn with_upgrades(mut self, upgrades: Upgrades) -> Self {
        self.upgrades = upgrades;
        self
    }

    /// Replaces the kit. Duplicates are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`InitializationError::KitTooLarge`] when more than
    /// [`CombatConfig::MAX_KIT`] distinct abilities are supplied.
    pub fn with_kit(
        mut self,
        abilities: impl IntoIterator<Item = AbilityId>,
    ) -> Result<Self, InitializationError> {
        let mut kit = Kit::new();
        for ability in abilities {
            if kit.contains(&ability) {
                continue;
            }
            kit.try_push(ability)
                .map_err(|_| InitializationError::KitTooLarge {
                    combatant: self.id,
                    max: CombatConfig::MAX_KIT,
                })?;
        }
        self.kit = kit;
        Ok(self)
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_empty()
    }

    pub fn is_broken(&self) -> bool {
        self.statuses.has(super::StatusKind::Broken)
    }

    pub fn knows(&self, ability: AbilityId) -> bool {
        ability == AbilityId::FALLBACK || self.kit.contains(&ability)
    }

    pub fn effective_stats(&self) -> EffectiveStats {
        EffectiveStats::resolve(&self.stats, &self.statuses)
    }

    /// Resource cost of `ability` after upgrades.
    pub fn cost_of(&self, ability: AbilityId, base_cost: u32) -> u32 {
        let multiplier = self
            .upgrades
            .get(ability)
            .map_or(1.0, |upgrade| upgrade.cost_multiplier());
        (f64::from(base_cost) * multiplier.max(0.0)).round() as u32
    }

    /// Cooldown of `ability` after upgrades.
    pub fn cooldown_of(&self, ability: AbilityId, base_cooldown: u32) -> u32 {
        let reduction = self
            .upgrades
            .get(ability)
            .map_or(0, |upgrade| upgrade.cooldown_reduction());
        base_cooldown.saturating_sub(reduction)
    }

    /// A corpse never acts.
    pub(crate) fn clear_on_death(&mut self) {
        self.intent = None;
        self.staggered = false;
    }
}

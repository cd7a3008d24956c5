//! Encounter assembly.
//!
//! Specs describe combatants without ids; [`EncounterBuilder`] assigns ids in
//! roster order (player `0`, companion `1`, hostiles after that), applies
//! level scaling, gives every hostile a posture pool and hands a validated
//! [`BattleState`] to the engine.

use combat_core::{
    AbilityId, AbilityOracle, AbilityUpgrade, BaseStats, BattleState, Combatant, CombatantId,
    Element, Encounter, InitializationError, Passives, PostureConfig, ResourceKind, ResourcePool,
    Resistances, Side, UpgradePath, Upgrades,
};

/// Secondary resource of a combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceSpec {
    pub kind: ResourceKind,
    pub maximum: u32,
}

/// One combatant as authored in content.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "first_level"))]
    pub level: u32,
    pub max_health: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: BaseStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource: Option<ResourceSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistances: Vec<(Element, f64)>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Passives,
    /// Posture maximum. Ignored for the player and companion; hostiles
    /// without one get [`PostureConfig::default_maximum`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub posture: Option<u32>,
    pub kit: Vec<AbilityId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub upgrades: Vec<(AbilityId, UpgradePath, u8)>,
}

#[cfg(feature = "serde")]
fn first_level() -> u32 {
    1
}

impl CombatantSpec {
    pub fn new(name: impl Into<String>, max_health: u32, stats: BaseStats) -> Self {
        Self {
            name: name.into(),
            level: 1,
            max_health,
            stats,
            resource: None,
            resistances: Vec::new(),
            passives: Passives::default(),
            posture: None,
            kit: vec![AbilityId::BasicAttack],
            upgrades: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_resource(mut self, kind: ResourceKind, maximum: u32) -> Self {
        self.resource = Some(ResourceSpec { kind, maximum });
        self
    }

    pub fn with_posture(mut self, maximum: u32) -> Self {
        self.posture = Some(maximum);
        self
    }

    pub fn with_kit(mut self, kit: impl IntoIterator<Item = AbilityId>) -> Self {
        self.kit = kit.into_iter().collect();
        self
    }

    pub fn with_upgrade(mut self, ability: AbilityId, path: UpgradePath, tier: u8) -> Self {
        self.upgrades.push((ability, path, tier));
        self
    }
}

/// A full encounter as authored in content.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSpec {
    pub player: CombatantSpec,
    #[cfg_attr(feature = "serde", serde(default))]
    pub companion: Option<CombatantSpec>,
    pub hostiles: Vec<CombatantSpec>,
}

/// Builds validated battle states from specs.
pub struct EncounterBuilder<'a> {
    abilities: &'a dyn AbilityOracle,
    posture: PostureConfig,
    player: Option<CombatantSpec>,
    companion: Option<CombatantSpec>,
    hostiles: Vec<CombatantSpec>,
}

impl<'a> EncounterBuilder<'a> {
    /// Health gained per level above the first, as a fraction of base health.
    pub const HEALTH_PER_LEVEL: f64 = 0.10;
    /// Offensive stats gained per level above the first.
    pub const POWER_PER_LEVEL: f64 = 0.05;

    pub fn new(abilities: &'a dyn AbilityOracle) -> Self {
        Self {
            abilities,
            posture: PostureConfig::default(),
            player: None,
            companion: None,
            hostiles: Vec::new(),
        }
    }

    /// Starts from an authored encounter.
    pub fn from_spec(abilities: &'a dyn AbilityOracle, spec: EncounterSpec) -> Self {
        Self {
            abilities,
            posture: PostureConfig::default(),
            player: Some(spec.player),
            companion: spec.companion,
            hostiles: spec.hostiles,
        }
    }

    /// Posture settings used for hostiles authored without a pool.
    pub fn with_posture_config(mut self, posture: PostureConfig) -> Self {
        self.posture = posture;
        self
    }

    pub fn player(mut self, spec: CombatantSpec) -> Self {
        self.player = Some(spec);
        self
    }

    pub fn companion(mut self, spec: CombatantSpec) -> Self {
        self.companion = Some(spec);
        self
    }

    pub fn hostile(mut self, spec: CombatantSpec) -> Self {
        self.hostiles.push(spec);
        self
    }

    /// Assembles the encounter without validating it against the battle
    /// contract.
    ///
    /// # Errors
    ///
    /// Returns [`InitializationError::MissingPlayer`] without a player spec and
    /// [`InitializationError::KitTooLarge`] for oversized kits.
    pub fn encounter(self) -> Result<Encounter, InitializationError> {
        let posture = &self.posture;
        let player = self.player.ok_or(InitializationError::MissingPlayer)?;
        let player = combatant(CombatantId::PLAYER, Side::Player, player, posture)?;

        let mut next = CombatantId::PLAYER.0 + 1;
        let companion = match self.companion {
            Some(spec) => {
                let id = CombatantId(next);
                next += 1;
                Some(combatant(id, Side::Companion, spec, posture)?)
            }
            None => None,
        };

        let hostiles = self
            .hostiles
            .into_iter()
            .enumerate()
            .map(|(offset, spec)| {
                combatant(CombatantId(next + offset as u32), Side::Hostile, spec, posture)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Encounter {
            player,
            companion,
            hostiles,
        })
    }

    /// Assembles, checks every kit against the ability book and builds the
    /// initial battle state.
    ///
    /// # Errors
    ///
    /// Returns the first [`InitializationError`] found.
    pub fn build(self) -> Result<BattleState, InitializationError> {
        let abilities = self.abilities;
        let encounter = self.encounter()?;
        encounter.check_abilities(abilities)?;
        BattleState::new(encounter)
    }
}

fn combatant(
    id: CombatantId,
    side: Side,
    spec: CombatantSpec,
    posture_config: &PostureConfig,
) -> Result<Combatant, InitializationError> {
    let CombatantSpec {
        name,
        level,
        max_health,
        stats,
        resource,
        resistances,
        passives,
        posture,
        kit,
        upgrades,
    } = spec;

    let level = level.max(1);
    let growth = f64::from(level - 1);
    let max_health = (f64::from(max_health) * (1.0 + EncounterBuilder::HEALTH_PER_LEVEL * growth))
        .round() as u32;
    let power = 1.0 + EncounterBuilder::POWER_PER_LEVEL * growth;
    let stats = BaseStats {
        attack: stats.attack * power,
        magic: stats.magic * power,
        ..stats
    };

    let resistances = resistances
        .into_iter()
        .fold(Resistances::new(), |acc, (element, resist)| acc.with(element, resist));

    let mut table = Upgrades::new();
    for (ability, path, tier) in upgrades {
        table.set(ability, AbilityUpgrade::new(path, tier));
    }

    let mut combatant = Combatant::new(id, name, side, max_health, stats)
        .with_level(level)
        .with_resistances(resistances)
        .with_passives(passives)
        .with_upgrades(table)
        .with_kit(kit)?;
    if let Some(ResourceSpec { kind, maximum }) = resource {
        combatant = combatant.with_resource(ResourcePool::new(kind, maximum));
    }
    if side.is_hostile() {
        let maximum = posture.unwrap_or_else(|| posture_config.default_maximum(max_health));
        combatant = combatant.with_posture(maximum);
    }
    Ok(combatant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard_book;

    fn hero() -> CombatantSpec {
        CombatantSpec::new("hero", 300, BaseStats::new(30.0, 20.0, 10.0, 10.0))
            .with_resource(ResourceKind::Mana, 80)
            .with_kit([AbilityId::BasicAttack, AbilityId::Fireball])
    }

    fn goblin() -> CombatantSpec {
        CombatantSpec::new("goblin", 120, BaseStats::new(15.0, 0.0, 5.0, 5.0)).with_posture(40)
    }

    #[test]
    fn ids_follow_roster_order() {
        let book = standard_book();
        let state = EncounterBuilder::new(&book)
            .player(hero())
            .companion(CombatantSpec::new("squire", 200, BaseStats::default()))
            .hostile(goblin())
            .hostile(goblin())
            .build()
            .expect("valid encounter");

        let ids: Vec<u32> = state.combatants().iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(state.hostile_count(), 2);
        assert!(state.hostiles().all(|c| c.posture.is_some()));
    }

    #[test]
    fn hostile_ids_start_after_the_player_without_a_companion() {
        let book = standard_book();
        let state = EncounterBuilder::new(&book)
            .player(hero())
            .hostile(goblin())
            .build()
            .expect("valid encounter");
        assert_eq!(state.hostile_at(0).map(|c| c.id), Some(CombatantId(1)));
    }

    #[test]
    fn posture_is_only_given_to_hostiles() {
        let book = standard_book();
        let state = EncounterBuilder::new(&book)
            .player(hero().with_posture(50))
            .hostile(goblin())
            .build()
            .expect("valid encounter");
        assert!(state.player().expect("player").posture.is_none());
    }

    #[test]
    fn hostiles_without_authored_posture_get_a_default_pool() {
        let book = standard_book();
        let state = EncounterBuilder::new(&book)
            .player(hero())
            .hostile(CombatantSpec::new("slime", 200, BaseStats::default()))
            .hostile(CombatantSpec::new("slime", 200, BaseStats::default()).with_level(3))
            .with_posture_config(PostureConfig {
                default_ratio: 0.5,
                ..PostureConfig::default()
            })
            .build()
            .expect("valid encounter");
        let maxima: Vec<_> = state
            .hostiles()
            .map(|c| c.posture.as_ref().map(|p| p.maximum()))
            .collect();
        assert_eq!(maxima, vec![Some(100), Some(120)]);
    }

    #[test]
    fn levels_scale_health_and_power() {
        let book = standard_book();
        let state = EncounterBuilder::new(&book)
            .player(hero().with_level(3))
            .hostile(goblin())
            .build()
            .expect("valid encounter");
        let player = state.player().expect("player");
        assert_eq!(player.health.maximum(), 360);
        assert!((player.stats.attack - 33.0).abs() < 1e-9);
        assert_eq!(player.stats.armor, 10.0);
    }

    #[test]
    fn upgrades_are_clamped_to_the_top_tier() {
        let book = standard_book();
        let state = EncounterBuilder::new(&book)
            .player(hero().with_upgrade(AbilityId::Fireball, UpgradePath::Potency, 9))
            .hostile(goblin())
            .build()
            .expect("valid encounter");
        let upgrade = state
            .player()
            .and_then(|p| p.upgrades.get(AbilityId::Fireball))
            .copied()
            .expect("upgrade kept");
        assert_eq!(upgrade.tier(), combat_core::CombatConfig::MAX_UPGRADE_TIER);
    }

    #[test]
    fn missing_player_is_rejected() {
        let book = standard_book();
        let result = EncounterBuilder::new(&book).hostile(goblin()).build();
        assert_eq!(result, Err(InitializationError::MissingPlayer));
    }

    #[test]
    fn empty_hostile_side_is_rejected() {
        let book = standard_book();
        let result = EncounterBuilder::new(&book).player(hero()).build();
        assert!(matches!(result, Err(InitializationError::NoHostiles)));
    }

    #[test]
    fn unknown_abilities_are_rejected() {
        let book = combat_core::AbilityBook::new().with(crate::catalog::definition(AbilityId::BasicAttack));
        let result = EncounterBuilder::new(&book)
            .player(hero())
            .hostile(goblin())
            .build();
        assert_eq!(
            result,
            Err(InitializationError::UnknownAbility {
                combatant: CombatantId::PLAYER,
                ability: AbilityId::Fireball,
            })
        );
    }
}

use combat_core::{
    AbilityBook, AbilityDef, AbilityId, AbilityTags, BaseStats, BattleEngine, BattleState,
    CombatConfig, CombatEnv, CombatEvent, Combatant, CombatantId, DamageEffect, DamageKind,
    EffectKind, Encounter, EventLog, PlayerCommand, ResourceKind, ResourcePool, SeededRandom,
    Side, StatusApplication, StatusKind,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct Saved {
    state: BattleState,
    rng: SeededRandom,
}

fn book() -> AbilityBook {
    [
        AbilityDef::new(
            AbilityId::BasicAttack,
            DamageKind::Physical,
            1.0,
            EffectKind::Damage(DamageEffect::single()),
        )
        .with_tags(AbilityTags::BASIC),
        AbilityDef::new(
            AbilityId::Rend,
            DamageKind::Physical,
            0.7,
            EffectKind::Damage(
                DamageEffect::single()
                    .with_on_hit(StatusApplication::scaled(StatusKind::Bleed, 0.15, 3)),
            ),
        ),
        AbilityDef::new(
            AbilityId::Crush,
            DamageKind::Physical,
            2.0,
            EffectKind::Damage(DamageEffect::single()),
        )
        .with_telegraph(1)
        .with_cooldown(3),
    ]
    .into_iter()
    .collect()
}

fn state() -> BattleState {
    let kit = [AbilityId::BasicAttack, AbilityId::Rend, AbilityId::Crush];
    let player = Combatant::new(
        CombatantId::PLAYER,
        "hero",
        Side::Player,
        600,
        BaseStats::new(30.0, 10.0, 15.0, 5.0).with_crit_chance(0.25),
    )
    .with_kit(kit)
    .expect("kit fits");
    let companion = Combatant::new(
        CombatantId(1),
        "squire",
        Side::Companion,
        400,
        BaseStats::new(20.0, 10.0, 10.0, 5.0),
    )
    .with_kit(kit)
    .expect("kit fits");
    let hostiles = (2..4)
        .map(|id| {
            Combatant::new(
                CombatantId(id),
                "brute",
                Side::Hostile,
                900,
                BaseStats::new(25.0, 0.0, 10.0, 5.0),
            )
            .with_resource(ResourcePool::new(ResourceKind::Rage, 100))
            .with_posture(60)
            .with_kit(kit)
            .expect("kit fits")
        })
        .collect();
    BattleState::new(Encounter {
        player,
        companion: Some(companion),
        hostiles,
    })
    .expect("valid encounter")
}

fn play(
    book: &AbilityBook,
    config: &CombatConfig,
    state: &mut BattleState,
    rng: &mut SeededRandom,
    rounds: usize,
) -> Vec<CombatEvent> {
    let mut log = EventLog::new();
    let mut engine = BattleEngine::new(state, CombatEnv::new(book, config), rng, &mut log);
    for _ in 0..rounds {
        if engine.state().is_over() {
            break;
        }
        engine
            .submit(PlayerCommand::UseAbility {
                ability: AbilityId::Rend,
                target: None,
            })
            .expect("round resolves");
    }
    log.drain()
}

#[test]
fn saved_battles_resume_identically() {
    let book = book();
    let config = CombatConfig::default();
    let mut state = state();
    let mut rng = SeededRandom::new(0x5eed);
    play(&book, &config, &mut state, &mut rng, 3);

    let json = serde_json::to_string(&Saved {
        state: state.clone(),
        rng,
    })
    .expect("serializes");
    let saved: Saved = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(saved.state, state);
    assert_eq!(saved.rng, rng);

    let Saved {
        state: mut restored,
        rng: mut restored_rng,
    } = saved;
    let original_events = play(&book, &config, &mut state, &mut rng, 4);
    let restored_events = play(&book, &config, &mut restored, &mut restored_rng, 4);

    assert!(!original_events.is_empty());
    assert_eq!(original_events, restored_events);
    assert_eq!(state, restored);
    assert_eq!(rng.index(), restored_rng.index());
}

#[test]
fn learned_values_survive_a_round_trip() {
    let book = book();
    let config = CombatConfig::default();
    let mut state = state();
    let mut rng = SeededRandom::new(7);
    play(&book, &config, &mut state, &mut rng, 2);

    let companion = state.companion().expect("companion present");
    assert!(companion.memory.experience() > 0);

    let json = serde_json::to_string(&state).expect("serializes");
    let restored: BattleState = serde_json::from_str(&json).expect("deserializes");
    let restored_companion = restored.companion().expect("companion present");
    assert_eq!(restored_companion.memory, companion.memory);
    assert_eq!(restored.turn, state.turn);
}

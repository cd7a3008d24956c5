use combat_core::{
    AbilityBook, AbilityDef, AbilityId, AbilityTags, ActionError, BaseStats, BattleEngine,
    BattleOutcome, BattleState, CombatConfig, CombatEnv, CombatError, CombatEvent, Combatant,
    CombatantId, DamageEffect, DamageKind, EffectKind, Encounter, EventLog, FixedRandom,
    HealEffect, PlayerCommand, ResourceKind, ResourcePool, Side, SkipReason, StatusApplication,
    StatusKind, StepOutcome, TurnError, TurnPhase,
};

const COMPANION: CombatantId = CombatantId(1);
const HOSTILE: CombatantId = CombatantId(2);
const SECOND_HOSTILE: CombatantId = CombatantId(3);

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
            AbilityId::Fireball,
            DamageKind::Magic,
            2.0,
            EffectKind::Damage(DamageEffect::single()),
        )
        .with_cost(30)
        .with_cooldown(2),
        AbilityDef::new(
            AbilityId::Venom,
            DamageKind::Magic,
            0.5,
            EffectKind::Debuff(StatusApplication::flat(StatusKind::Poison, 10.0, 2)),
        ),
        AbilityDef::new(
            AbilityId::Mend,
            DamageKind::Magic,
            1.0,
            EffectKind::Heal(HealEffect::default()),
        ),
    ]
    .into_iter()
    .collect()
}

fn player(attack: f64, health: u32) -> Combatant {
    Combatant::new(
        CombatantId::PLAYER,
        "hero",
        Side::Player,
        health,
        BaseStats::new(attack, 40.0, 0.0, 0.0),
    )
    .with_resource(ResourcePool::new(ResourceKind::Mana, 40))
    .with_kit([AbilityId::BasicAttack, AbilityId::Fireball, AbilityId::Venom])
    .expect("kit fits")
}

fn hostile(id: CombatantId, attack: f64, health: u32) -> Combatant {
    Combatant::new(id, "goblin", Side::Hostile, health, BaseStats::new(attack, 0.0, 0.0, 0.0))
        .with_kit([AbilityId::BasicAttack])
        .expect("kit fits")
}

fn attack(target: CombatantId) -> PlayerCommand {
    PlayerCommand::UseAbility {
        ability: AbilityId::BasicAttack,
        target: Some(target),
    }
}

struct Fixture {
    book: AbilityBook,
    config: CombatConfig,
    state: BattleState,
    rng: FixedRandom,
    log: EventLog,
}

impl Fixture {
    fn new(encounter: Encounter) -> Self {
        Self {
            book: book(),
            config: CombatConfig::default().without_exploration(),
            state: BattleState::new(encounter).expect("valid encounter"),
            rng: FixedRandom::new(0.5),
            log: EventLog::new(),
        }
    }

    fn solo(player: Combatant, hostiles: Vec<Combatant>) -> Self {
        Self::new(Encounter {
            player,
            companion: None,
            hostiles,
        })
    }

    fn engine(&mut self) -> BattleEngine<'_> {
        let env = CombatEnv::new(&self.book, &self.config);
        BattleEngine::new(&mut self.state, env, &mut self.rng, &mut self.log)
    }
}

#[test]
fn submit_runs_player_companion_hostiles_then_bookkeeping() {
    let ally = Combatant::new(COMPANION, "squire", Side::Companion, 300, BaseStats::new(20.0, 0.0, 0.0, 0.0))
        .with_kit([AbilityId::BasicAttack])
        .expect("kit fits");
    let mut fixture = Fixture::new(Encounter {
        player: player(20.0, 500),
        companion: Some(ally),
        hostiles: vec![hostile(HOSTILE, 10.0, 400), hostile(SECOND_HOSTILE, 10.0, 400)],
    });

    let outcomes = fixture.engine().submit(attack(HOSTILE)).expect("round runs");

    let actors: Vec<_> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            StepOutcome::Acted { actor, .. } => Some(*actor),
            _ => None,
        })
        .collect();
    assert_eq!(actors, vec![CombatantId::PLAYER, COMPANION, HOSTILE, SECOND_HOSTILE]);
    assert_eq!(outcomes.last(), Some(&StepOutcome::RoundComplete { round: 1 }));
    assert_eq!(fixture.state.turn.round, 2);
    assert_eq!(fixture.state.turn.phase, TurnPhase::Player);
    assert_eq!(
        fixture.log.events().first(),
        Some(&CombatEvent::RoundStarted { round: 1 })
    );
}

#[test]
fn commands_are_rejected_while_a_round_is_in_flight() {
    let mut fixture = Fixture::solo(player(20.0, 500), vec![hostile(HOSTILE, 10.0, 400)]);
    let mut engine = fixture.engine();

    engine.begin_round(attack(HOSTILE)).expect("round opens");
    assert!(engine.state().turn.is_busy());

    let error = engine.begin_round(attack(HOSTILE)).expect_err("busy");
    assert_eq!(error, TurnError::Busy);
    assert!(error.severity().is_recoverable());

    while !engine.step().expect("steps").ends_round() {}
    assert!(!engine.state().turn.is_busy());
    assert_eq!(engine.step(), Err(TurnError::NotResolving));
}

#[test]
fn rejected_player_action_changes_nothing() {
    let mut fixture = Fixture::solo(player(20.0, 500), vec![hostile(HOSTILE, 10.0, 400)]);
    fixture
        .state
        .combatant_mut(CombatantId::PLAYER)
        .expect("player")
        .resource
        .spend(20);
    let before = fixture.state.clone();

    let error = fixture
        .engine()
        .begin_round(PlayerCommand::UseAbility {
            ability: AbilityId::Fireball,
            target: Some(HOSTILE),
        })
        .expect_err("not enough mana");

    assert!(matches!(
        error,
        TurnError::Action(ActionError::InsufficientResource {
            required: 30,
            available: 20,
            ..
        })
    ));
    assert_eq!(error.error_code(), "ACTION_INSUFFICIENT_RESOURCE");
    assert_eq!(fixture.state, before);
    assert!(fixture.log.is_empty());
}

#[test]
fn ability_outside_the_kit_is_rejected() {
    let mut fixture = Fixture::solo(player(20.0, 500), vec![hostile(HOSTILE, 10.0, 400)]);
    let error = fixture
        .engine()
        .begin_round(PlayerCommand::UseAbility {
            ability: AbilityId::Mend,
            target: None,
        })
        .expect_err("not in kit");
    assert_eq!(error.error_code(), "ACTION_NOT_IN_KIT");
}

#[test]
fn cooldown_blocks_reuse_until_it_ticks_down() {
    let mut fixture = Fixture::solo(player(20.0, 500), vec![hostile(HOSTILE, 1.0, 5_000)]);
    fixture
        .state
        .combatant_mut(CombatantId::PLAYER)
        .expect("player")
        .resource = ResourcePool::new(ResourceKind::Mana, 200);
    let fireball = PlayerCommand::UseAbility {
        ability: AbilityId::Fireball,
        target: Some(HOSTILE),
    };
    let mut engine = fixture.engine();

    engine.submit(fireball).expect("first cast");
    let error = engine.submit(fireball).expect_err("cooling down");
    assert!(matches!(error, TurnError::Action(ActionError::OnCooldown { remaining: 2, .. })));

    engine.submit(attack(HOSTILE)).expect("plain attack");
    let error = engine.submit(fireball).expect_err("still cooling down");
    assert!(matches!(error, TurnError::Action(ActionError::OnCooldown { remaining: 1, .. })));

    engine.submit(attack(HOSTILE)).expect("plain attack");
    engine.submit(fireball).expect("ready again");
}

#[test]
fn one_round_cooldown_skips_the_next_round() {
    let mut fixture = Fixture::solo(player(20.0, 500), vec![hostile(HOSTILE, 1.0, 5_000)]);
    fixture.book.insert(
        AbilityDef::new(
            AbilityId::Fireball,
            DamageKind::Magic,
            2.0,
            EffectKind::Damage(DamageEffect::single()),
        )
        .with_cooldown(1),
    );
    let fireball = PlayerCommand::UseAbility {
        ability: AbilityId::Fireball,
        target: Some(HOSTILE),
    };
    let mut engine = fixture.engine();

    engine.submit(fireball).expect("first cast");
    let error = engine.submit(fireball).expect_err("cooling down");
    assert!(matches!(error, TurnError::Action(ActionError::OnCooldown { remaining: 1, .. })));

    engine.submit(attack(HOSTILE)).expect("plain attack");
    engine.submit(fireball).expect("ready again");
}

#[test]
fn victory_ends_the_round_immediately() {
    let mut fixture = Fixture::solo(
        player(100.0, 500),
        vec![hostile(HOSTILE, 10.0, 50), hostile(SECOND_HOSTILE, 10.0, 50)],
    );
    let mut engine = fixture.engine();

    let first = engine.submit(attack(HOSTILE)).expect("round 1");
    assert!(first.contains(&StepOutcome::RoundComplete { round: 1 }));

    let second = engine.submit(attack(SECOND_HOSTILE)).expect("round 2");
    assert_eq!(
        second,
        vec![StepOutcome::BattleEnded {
            outcome: BattleOutcome::Victory,
        }]
    );
    assert_eq!(engine.state().outcome, Some(BattleOutcome::Victory));
    assert_eq!(engine.begin_round(attack(HOSTILE)), Err(TurnError::BattleOver));
    assert_eq!(engine.step(), Err(TurnError::BattleOver));
}

#[test]
fn defeat_skips_remaining_hostiles() {
    let mut fixture = Fixture::solo(
        player(1.0, 10),
        vec![hostile(HOSTILE, 50.0, 500), hostile(SECOND_HOSTILE, 50.0, 500)],
    );

    let outcomes = fixture.engine().submit(attack(HOSTILE)).expect("round runs");

    assert_eq!(
        outcomes.last(),
        Some(&StepOutcome::BattleEnded {
            outcome: BattleOutcome::Defeat,
        })
    );
    assert!(!outcomes.iter().any(|outcome| matches!(
        outcome,
        StepOutcome::Acted {
            actor: SECOND_HOSTILE,
            ..
        }
    )));
    assert_eq!(fixture.state.turn.phase, TurnPhase::Player);
}

#[test]
fn ending_the_battle_is_idempotent() {
    let mut fixture = Fixture::solo(player(20.0, 500), vec![hostile(HOSTILE, 10.0, 400)]);
    let mut engine = fixture.engine();

    engine.begin_round(attack(HOSTILE)).expect("round opens");
    assert!(engine.end_battle(BattleOutcome::Fled));
    assert!(!engine.end_battle(BattleOutcome::Defeat));
    assert_eq!(engine.state().outcome, Some(BattleOutcome::Fled));
    assert!(!engine.state().turn.is_busy());

    let ended = fixture
        .log
        .events()
        .iter()
        .filter(|event| matches!(event, CombatEvent::BattleEnded { .. }))
        .count();
    assert_eq!(ended, 1);
}

#[test]
fn failed_flee_lets_the_round_continue() {
    // 0.5 < 0.5 fails the default flee chance
    let mut fixture = Fixture::solo(player(20.0, 500), vec![hostile(HOSTILE, 10.0, 400)]);

    let outcomes = fixture.engine().submit(PlayerCommand::Flee).expect("round runs");

    assert_eq!(outcomes.first(), Some(&StepOutcome::FleeFailed));
    assert!(outcomes.iter().any(|outcome| matches!(
        outcome,
        StepOutcome::Acted { actor: HOSTILE, .. }
    )));
    assert!(fixture.log.events().contains(&CombatEvent::FleeFailed));
    assert!(fixture.state.outcome.is_none());
}

#[test]
fn successful_flee_ends_the_battle() {
    let mut fixture = Fixture::solo(player(20.0, 500), vec![hostile(HOSTILE, 10.0, 400)]);
    fixture.rng = FixedRandom::new(0.1);

    let outcomes = fixture.engine().submit(PlayerCommand::Flee).expect("round runs");

    assert_eq!(
        outcomes,
        vec![StepOutcome::BattleEnded {
            outcome: BattleOutcome::Fled,
        }]
    );
}

#[test]
fn poison_ticks_once_per_round_and_can_finish_a_hostile() {
    let mut fixture = Fixture::solo(player(1.0, 500), vec![hostile(HOSTILE, 1.0, 15)]);
    let venom = PlayerCommand::UseAbility {
        ability: AbilityId::Venom,
        target: Some(HOSTILE),
    };
    let mut engine = fixture.engine();

    engine.submit(venom).expect("round 1");
    let goblin = engine.state().combatant(HOSTILE).expect("hostile");
    assert_eq!(goblin.health.current(), 5);
    assert_eq!(goblin.statuses.remaining(StatusKind::Poison), 1);
    assert_eq!(goblin.statuses.last_tick(), Some(1));

    let outcomes = engine.submit(attack(HOSTILE)).expect("round 2");
    assert_eq!(
        outcomes.last(),
        Some(&StepOutcome::BattleEnded {
            outcome: BattleOutcome::Victory,
        })
    );
    assert!(fixture.log.events().contains(&CombatEvent::PeriodicDamage {
        target: HOSTILE,
        side: Side::Hostile,
        amount: 10,
    }));
}

#[test]
fn stunned_hostile_loses_its_turn() {
    let mut fixture = Fixture::solo(player(1.0, 500), vec![hostile(HOSTILE, 50.0, 400)]);
    fixture
        .state
        .combatant_mut(HOSTILE)
        .expect("hostile")
        .statuses
        .apply_timed(StatusKind::Stun, 1.0, 2);

    let outcomes = fixture.engine().submit(attack(HOSTILE)).expect("round runs");

    assert!(outcomes.contains(&StepOutcome::Skipped {
        actor: HOSTILE,
        reason: SkipReason::Stunned,
    }));
    assert_eq!(fixture.state.player().map(|p| p.health.current()), Some(500));
    assert!(!fixture
        .state
        .combatant(HOSTILE)
        .is_some_and(|h| h.statuses.has(StatusKind::Stun)));
}

#[test]
fn loot_drops_are_capped_per_battle() {
    let mut fixture = Fixture::solo(
        player(100.0, 500),
        vec![
            hostile(HOSTILE, 1.0, 10),
            hostile(SECOND_HOSTILE, 1.0, 10),
            hostile(CombatantId(4), 1.0, 10),
        ],
    );
    fixture.config.max_drops_per_battle = 2;
    let mut engine = fixture.engine();

    engine.submit(attack(HOSTILE)).expect("round 1");
    engine.submit(attack(SECOND_HOSTILE)).expect("round 2");
    engine.submit(attack(CombatantId(4))).expect("round 3");

    assert_eq!(fixture.state.outcome, Some(BattleOutcome::Victory));
    assert_eq!(fixture.state.turn.drops, 2);
    assert!(fixture.state.hostiles().all(|h| h.fallen));
}

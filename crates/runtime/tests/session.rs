use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use combat_content::{CombatantSpec, EncounterBuilder, standard_book};
use combat_core::{
    AbilityId, BaseStats, BattleOutcome, BattleState, CombatConfig, PlayerCommand, ResourceKind,
    StepOutcome, TurnError,
};
use combat_runtime::{
    AutoPilot, BattleSession, Beat, ChannelCommands, Event, Pacer, RuntimeError, SessionRng,
    SessionSnapshot, Topic, basic_attack,
};

fn state(hostile_health: u32) -> BattleState {
    let book = standard_book();
    EncounterBuilder::new(&book)
        .player(
            CombatantSpec::new("hero", 500, BaseStats::new(60.0, 20.0, 20.0, 20.0))
                .with_resource(ResourceKind::Rage, 100)
                .with_kit([
                    AbilityId::BasicAttack,
                    AbilityId::PowerStrike,
                    AbilityId::Cleave,
                    AbilityId::Defend,
                ]),
        )
        .companion(
            CombatantSpec::new("squire", 300, BaseStats::new(25.0, 10.0, 10.0, 10.0))
                .with_kit([AbilityId::BasicAttack, AbilityId::ShieldBash]),
        )
        .hostile(
            CombatantSpec::new("goblin", hostile_health, BaseStats::new(8.0, 0.0, 5.0, 5.0))
                .with_posture(40)
                .with_kit([AbilityId::BasicAttack, AbilityId::Rend]),
        )
        .build()
        .expect("valid encounter")
}

fn session(state: BattleState, seed: u64) -> BattleSession {
    BattleSession::new(
        Arc::new(standard_book()),
        CombatConfig::default(),
        state,
        SessionRng::seeded(seed),
    )
}

#[derive(Clone, Default)]
struct RecordingPacer {
    beats: Arc<Mutex<Vec<Beat>>>,
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, beat: Beat) {
        self.beats.lock().expect("lock").push(beat);
    }
}

#[tokio::test]
async fn autopilot_wins_a_lopsided_battle() {
    let mut session = session(state(80), 1);
    let outcome = session.run(&AutoPilot, 50).await.expect("battle runs");
    assert_eq!(outcome, Some(BattleOutcome::Victory));
    assert!(session.rounds_played() >= 1);
    assert!(matches!(
        session.play_round(basic_attack()).await,
        Err(RuntimeError::Turn(TurnError::BattleOver))
    ));
}

#[tokio::test]
async fn every_step_is_published_in_order() {
    let mut session = session(state(5_000), 2);
    let mut turns = session.subscribe(Topic::Turn);
    let mut combat = session.subscribe(Topic::Combat);

    let outcomes = session.play_round(basic_attack()).await.expect("round plays");
    assert!(matches!(outcomes.last(), Some(StepOutcome::RoundComplete { round: 1 })));

    for expected in outcomes {
        assert_eq!(turns.recv().await.ok(), Some(Event::Turn(expected)));
    }
    assert!(matches!(combat.recv().await, Ok(Event::Combat(_))));
}

#[tokio::test]
async fn pacer_is_awaited_between_actors_and_after_the_round() {
    let pacer = RecordingPacer::default();
    let mut session = session(state(5_000), 3).with_pacer(pacer.clone());

    let outcomes = session.play_round(basic_attack()).await.expect("round plays");
    let beats = pacer.beats.lock().expect("lock").clone();

    let actions = beats.iter().filter(|beat| **beat == Beat::Action).count();
    assert_eq!(actions, outcomes.len() - 1);
    assert_eq!(beats.last(), Some(&Beat::Round));
}

#[tokio::test]
async fn rejected_commands_leave_the_session_untouched() {
    let mut session = session(state(5_000), 4);
    let before = session.state().clone();

    let result = session
        .play_round(PlayerCommand::UseAbility {
            ability: AbilityId::Meteor,
            target: None,
        })
        .await;

    assert!(matches!(
        result,
        Err(RuntimeError::Turn(TurnError::Action(_)))
    ));
    assert_eq!(session.state(), &before);
    assert_eq!(session.rounds_played(), 0);
}

#[tokio::test]
async fn channel_commands_drive_rounds_until_closed() {
    let (tx, commands) = ChannelCommands::new(4);
    tx.send(basic_attack()).await.expect("send");
    tx.send(basic_attack()).await.expect("send");
    drop(tx);

    let mut session = session(state(5_000), 5);
    let result = session.run(&commands, 10).await;
    assert!(matches!(result, Err(RuntimeError::CommandSourceClosed)));
    assert_eq!(session.rounds_played(), 2);
    assert_eq!(session.state().turn.round, 3);
}

#[tokio::test]
async fn restored_snapshots_replay_identically() {
    let mut original = session(state(5_000), 6);
    original.run(&AutoPilot, 2).await.expect("runs");

    let snapshot = original.snapshot().expect("replayable");
    let bytes = snapshot.encode().expect("encodes");
    let digest = snapshot.digest().expect("digests");
    let decoded = SessionSnapshot::decode_verified(&bytes, &digest).expect("verified");
    assert_eq!(decoded, snapshot);

    let mut restored = BattleSession::restore(
        Arc::new(standard_book()),
        CombatConfig::default(),
        decoded,
    );
    original.run(&AutoPilot, 3).await.expect("runs");
    restored.run(&AutoPilot, 3).await.expect("runs");

    assert_eq!(original.state(), restored.state());
    assert_eq!(
        original.snapshot().and_then(|s| s.digest()).expect("digest"),
        restored.snapshot().and_then(|s| s.digest()).expect("digest"),
    );
}

#[tokio::test]
async fn tampered_snapshots_are_rejected() {
    let mut session = session(state(5_000), 7);
    session.play_round(basic_attack()).await.expect("round plays");
    let snapshot = session.snapshot().expect("replayable");
    let digest = snapshot.digest().expect("digests");

    let mut bytes = snapshot.encode().expect("encodes");
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;

    assert!(matches!(
        SessionSnapshot::decode_verified(&bytes, &digest),
        Err(RuntimeError::DigestMismatch { .. })
    ));
}

#[tokio::test]
async fn entropy_sessions_cannot_be_snapshotted() {
    let session = BattleSession::new(
        Arc::new(standard_book()),
        CombatConfig::default(),
        state(5_000),
        SessionRng::entropy(),
    );
    assert!(matches!(session.snapshot(), Err(RuntimeError::NotReplayable)));
}

#[tokio::test]
async fn ending_a_session_is_idempotent() {
    let mut session = session(state(5_000), 8);
    let mut turns = session.subscribe(Topic::Turn);

    assert!(session.end_battle(BattleOutcome::Fled));
    assert!(!session.end_battle(BattleOutcome::Defeat));
    assert_eq!(session.outcome(), Some(BattleOutcome::Fled));
    assert_eq!(
        turns.recv().await.ok(),
        Some(Event::Turn(StepOutcome::BattleEnded {
            outcome: BattleOutcome::Fled
        }))
    );
    assert!(turns.try_recv().is_err());
}

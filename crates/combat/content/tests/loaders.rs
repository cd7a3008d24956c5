use std::fs;

use combat_content::{
    AbilityBookLoader, ConfigLoader, ContentFactory, EncounterLoader, standard_book,
};
use combat_core::{
    AbilityId, AbilityOracle, CombatantId, Difficulty, EffectKind, Element, ResourceKind, Side,
};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn partial_config_keeps_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        &dir,
        "config.toml",
        r#"
difficulty = "Hard"
flee_chance = 0.25

[decision]
epsilon_start = 0.0
"#,
    );

    let config = ConfigLoader::load(&path).expect("config loads");
    assert_eq!(config.difficulty, Difficulty::Hard);
    assert_eq!(config.flee_chance, 0.25);
    assert_eq!(config.decision.epsilon_start, 0.0);
    assert_eq!(config.decision.epsilon_floor, 0.03);
    assert_eq!(config.formula.crit_ceiling, 0.75);
}

#[test]
fn out_of_range_flee_chance_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "config.toml", "flee_chance = 1.5\n");
    let error = ConfigLoader::load(&path).expect_err("rejected");
    assert!(error.to_string().contains("flee_chance"));
}

#[test]
fn missing_files_name_the_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("nope.toml");
    let error = ConfigLoader::load(&path).expect_err("missing");
    assert!(error.to_string().contains("nope.toml"));
}

#[test]
fn catalog_overrides_replace_single_entries() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        &dir,
        "abilities.ron",
        r#"(
    abilities: [
        (
            id: Fireball,
            name: "Greater Fireball",
            cost: 45,
            kind: Magic,
            element: Fire,
            potency: 2.5,
            effect: Damage((splash: Some(0.3))),
        ),
    ],
)"#,
    );

    let book = AbilityBookLoader::load_over(&path, standard_book()).expect("loads");
    let fireball = book.definition(AbilityId::Fireball).expect("present");
    assert_eq!(fireball.name, "Greater Fireball");
    assert_eq!(fireball.cost, 45);
    assert_eq!(fireball.element, Element::Fire);
    assert_eq!(fireball.effect.splash(), Some(0.3));
    assert!(book.definition(AbilityId::Meteor).is_some());

    let only = AbilityBookLoader::load(&path).expect("loads");
    assert_eq!(only.len(), 1);
}

#[test]
fn malformed_catalog_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "abilities.ron", "(abilities: [(id: NotAnAbility)])");
    assert!(AbilityBookLoader::load(&path).is_err());
}

#[test]
fn encounters_build_with_roster_ids() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        &dir,
        "encounters/duel.ron",
        r#"(
    player: (
        name: "hero",
        max_health: 200,
        stats: (attack: 20.0),
        resource: Some((kind: Mana, maximum: 50)),
        kit: [BasicAttack, Fireball],
    ),
    hostiles: [
        (name: "rat", max_health: 30, posture: Some(10), kit: [BasicAttack]),
        (name: "rat", max_health: 30, kit: [BasicAttack]),
    ],
)"#,
    );

    let book = standard_book();
    let state = EncounterLoader::build(&path, &book).expect("builds");
    let player = state.player().expect("player");
    assert_eq!(player.resource.kind, ResourceKind::Mana);
    assert_eq!(player.resource.current(), 50);
    assert!(state.companion().is_none());

    let hostiles: Vec<_> = state.hostiles().map(|c| (c.id, c.side)).collect();
    assert_eq!(
        hostiles,
        vec![
            (CombatantId(1), Side::Hostile),
            (CombatantId(2), Side::Hostile)
        ]
    );
    let postures: Vec<_> = state
        .hostiles()
        .map(|c| c.posture.as_ref().map(|p| p.maximum()))
        .collect();
    assert_eq!(postures, vec![Some(10), Some(8)]);
}

#[test]
fn factory_sizes_default_posture_from_its_config() {
    let dir = TempDir::new().expect("tempdir");
    write(&dir, "config.toml", "[posture]\ndefault_ratio = 0.5\n");
    write(
        &dir,
        "encounters/brute.ron",
        r#"(
    player: (name: "hero", max_health: 100, kit: [BasicAttack]),
    hostiles: [(name: "brute", max_health: 300, kit: [BasicAttack])],
)"#,
    );

    let factory = ContentFactory::new(dir.path());
    let book = standard_book();
    let state = factory.build_encounter("brute", &book).expect("builds");
    let brute = state.hostile_at(0).expect("brute");
    assert_eq!(brute.posture.as_ref().map(|p| (p.current(), p.maximum())), Some((0, 150)));
}

#[test]
fn encounters_with_unknown_abilities_fail_to_build() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        &dir,
        "encounters/bad.ron",
        r#"(
    player: (name: "hero", max_health: 100, kit: [BasicAttack, Meteor]),
    hostiles: [(name: "rat", max_health: 30, kit: [BasicAttack])],
)"#,
    );

    let book = combat_core::AbilityBook::new().with(combat_content::definition(AbilityId::BasicAttack));
    let error = EncounterLoader::build(&path, &book).expect_err("unknown ability");
    assert!(error.to_string().contains("meteor"));
}

#[test]
fn factory_lists_and_builds_encounters() {
    let dir = TempDir::new().expect("tempdir");
    write(
        &dir,
        "encounters/b_second.ron",
        r#"(player: (name: "hero", max_health: 10, kit: []), hostiles: [(name: "rat", max_health: 5, kit: [])])"#,
    );
    write(
        &dir,
        "encounters/a_first.ron",
        r#"(player: (name: "hero", max_health: 10, kit: []), hostiles: [(name: "rat", max_health: 5, kit: [])])"#,
    );
    write(&dir, "encounters/notes.txt", "not an encounter");

    let factory = ContentFactory::new(dir.path());
    assert_eq!(
        factory.encounter_names().expect("lists"),
        vec!["a_first".to_owned(), "b_second".to_owned()]
    );

    let config = factory.load_config().expect("defaults without a file");
    assert_eq!(config, combat_core::CombatConfig::default());

    let book = factory.load_abilities().expect("standard book without a file");
    let state = factory.build_encounter("a_first", &book).expect("builds");
    assert_eq!(state.combatants().len(), 2);
}

#[test]
fn bundled_content_loads() {
    let factory = ContentFactory::bundled();
    let config = factory.load_config().expect("bundled config");
    assert_eq!(config.difficulty, Difficulty::Normal);

    let book = factory.load_abilities().expect("bundled abilities");
    let cleave = book.definition(AbilityId::Cleave).expect("cleave");
    assert_eq!(cleave.potency, 1.15);
    assert!(matches!(cleave.effect, EffectKind::Damage(_)));
    let mend = book.definition(AbilityId::Mend).expect("mend");
    assert_eq!(mend.cost, 20);

    let names = factory.encounter_names().expect("bundled encounters");
    assert!(!names.is_empty());
    for name in names {
        let state = factory
            .build_encounter(&name, &book)
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        assert!(state.hostile_count() > 0);
    }
}

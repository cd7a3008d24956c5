//! Headless battle simulator.
//!
//! Runs a seeded auto-battle from content files and prints the narration and
//! a summary. Run with: `cargo run -p combat-sim -- --seed 7 --encounter goblin_ambush`

mod args;
mod report;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use combat_content::{
    AbilityBookLoader, ConfigLoader, ContentFactory, EncounterBuilder, EncounterLoader,
    standard_book,
};
use combat_core::AbilityBook;
use combat_runtime::{AutoPilot, BattleSession, Pacing, SessionRng, Topic};

use args::{Cli, OutputFormat};
use report::{Narrator, Summary};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let factory = ContentFactory::bundled();
    let abilities = match &cli.abilities {
        Some(path) => AbilityBookLoader::load_over(path, standard_book())?,
        None => factory.load_abilities()?,
    };
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load(path)?,
        None => factory.load_config()?,
    };
    if let Some(difficulty) = cli.difficulty {
        config = config.with_difficulty(difficulty.into());
    }
    if cli.greedy {
        config = config.without_exploration();
    }

    let spec = if cli.encounter.extension().is_some_and(|ext| ext == "ron") {
        EncounterLoader::load(&cli.encounter)?
    } else {
        let name = cli
            .encounter
            .to_str()
            .context("encounter name is not valid UTF-8")?;
        factory.load_encounter(name)?
    };
    let state = EncounterBuilder::from_spec(&abilities, spec)
        .with_posture_config(config.posture.clone())
        .build()
        .with_context(|| format!("invalid encounter {}", cli.encounter.display()))?;

    let rng = match cli.seed {
        Some(seed) => SessionRng::seeded(seed),
        None => SessionRng::entropy(),
    };
    tracing::info!(
        seed = ?cli.seed,
        encounter = %cli.encounter.display(),
        combatants = state.combatants().len(),
        "starting battle"
    );

    let abilities: Arc<AbilityBook> = Arc::new(abilities);
    let mut session = BattleSession::new(abilities, config, state, rng)
        .with_pacer(Pacing::from_millis(cli.pace_ms));

    let narrator = match cli.format {
        OutputFormat::Narration => Some(Narrator::spawn(
            session.subscribe(Topic::Combat),
            session.state(),
        )),
        OutputFormat::Json => None,
    };

    let outcome = session.run(&AutoPilot, cli.max_rounds).await?;
    if outcome.is_none() {
        tracing::warn!(max_rounds = cli.max_rounds, "round limit reached without a result");
    }

    let summary = Summary::collect(&session)?;
    drop(session);
    if let Some(narrator) = narrator {
        narrator.finish().await?;
    }

    match cli.format {
        OutputFormat::Narration => summary.print(),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}

/// Setup logging to stderr. `RUST_LOG` refines the default `info` level.
fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

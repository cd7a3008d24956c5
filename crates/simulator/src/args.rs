use std::path::PathBuf;

use clap::Parser;

use combat_core::Difficulty;

/// Runs a seeded auto-battle
#[derive(Parser)]
#[command(name = "combat-sim")]
#[command(about = "Headless turn-based battle simulator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Seed of the replayable random stream (OS entropy when omitted)
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Encounter file (`.ron`) or the name of a bundled encounter
    #[arg(short, long, value_name = "ENCOUNTER", default_value = "goblin_ambush")]
    pub encounter: PathBuf,

    /// Ability overrides laid over the standard book
    #[arg(short, long, value_name = "FILE")]
    pub abilities: Option<PathBuf>,

    /// Combat configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Overrides the configured difficulty
    #[arg(short, long, value_enum)]
    pub difficulty: Option<DifficultyArg>,

    /// Stop after this many rounds
    #[arg(long, value_name = "N", default_value_t = 100)]
    pub max_rounds: u32,

    /// Pause between actors in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 0)]
    pub pace_ms: u64,

    /// Disable AI exploration
    #[arg(long)]
    pub greedy: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "narration")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Event narration followed by a summary
    Narration,
    /// Summary only, as JSON
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum DifficultyArg {
    Story,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Story => Difficulty::Story,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

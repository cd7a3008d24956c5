//! Encounter loader.

use std::path::Path;

use combat_core::{AbilityOracle, BattleState, PostureConfig};

use crate::encounter::{EncounterBuilder, EncounterSpec};
use crate::loaders::{LoadResult, read_file};

/// Loader for encounter specs from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load an encounter spec.
    pub fn load(path: &Path) -> LoadResult<EncounterSpec> {
        let content = read_file(path)?;
        ron::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse encounter RON at {}: {}", path.display(), e)
        })
    }

    /// Load an encounter and build its initial battle state.
    pub fn build(path: &Path, abilities: &dyn AbilityOracle) -> LoadResult<BattleState> {
        Self::build_with(path, abilities, &PostureConfig::default())
    }

    /// Like [`EncounterLoader::build`], with the posture settings of a
    /// loaded configuration.
    pub fn build_with(
        path: &Path,
        abilities: &dyn AbilityOracle,
        posture: &PostureConfig,
    ) -> LoadResult<BattleState> {
        let spec = Self::load(path)?;
        EncounterBuilder::from_spec(abilities, spec)
            .with_posture_config(posture.clone())
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid encounter {}: {}", path.display(), e))
    }
}

//! Content factory for loading a whole data directory.

use std::path::{Path, PathBuf};

use combat_core::{AbilityBook, AbilityOracle, BattleState, CombatConfig};

use crate::catalog::standard_book;
use crate::encounter::EncounterSpec;
use crate::loaders::{AbilityBookLoader, ConfigLoader, EncounterLoader, LoadResult};

/// Content factory that loads combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── abilities.ron        (optional overrides of the standard book)
/// └── encounters/
///     ├── goblin_ambush.ron
///     └── ogre_warlord.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
    }

    /// Load combat configuration from `config.toml`, or defaults when absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Standard book with `abilities.ron` laid over it, when present.
    pub fn load_abilities(&self) -> LoadResult<AbilityBook> {
        let path = self.data_dir.join("abilities.ron");
        if !path.exists() {
            return Ok(standard_book());
        }
        AbilityBookLoader::load_over(&path, standard_book())
    }

    /// Load an encounter spec from `encounters/{name}.ron`.
    pub fn load_encounter(&self, name: &str) -> LoadResult<EncounterSpec> {
        EncounterLoader::load(&self.encounter_path(name))
    }

    /// Load and build an encounter against `abilities`, using the posture
    /// settings of this directory's config.
    pub fn build_encounter(
        &self,
        name: &str,
        abilities: &dyn AbilityOracle,
    ) -> LoadResult<BattleState> {
        let config = self.load_config()?;
        EncounterLoader::build_with(&self.encounter_path(name), abilities, &config.posture)
    }

    /// Names of every encounter under `encounters/`, sorted.
    pub fn encounter_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join("encounters");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to list {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn encounter_path(&self, name: &str) -> PathBuf {
        self.data_dir.join("encounters").join(format!("{}.ron", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(
            factory.encounter_path("den"),
            Path::new("/tmp/data/encounters/den.ron")
        );
    }
}

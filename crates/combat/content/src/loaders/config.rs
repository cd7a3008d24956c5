//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing tables and keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        let config: CombatConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        anyhow::ensure!(
            (0.0..=1.0).contains(&config.flee_chance),
            "flee_chance must be within [0, 1] (got {})",
            config.flee_chance
        );
        anyhow::ensure!(
            config.formula.variance_min <= config.formula.variance_max,
            "variance_min ({}) exceeds variance_max ({})",
            config.formula.variance_min,
            config.formula.variance_max
        );

        Ok(config)
    }
}

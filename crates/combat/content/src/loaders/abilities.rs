//! Ability book loader.

use std::path::Path;

use combat_core::{AbilityBook, AbilityDef};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<AbilityDef>,
}

/// Loader for ability books from RON files.
pub struct AbilityBookLoader;

impl AbilityBookLoader {
    /// Load a complete ability book. Later duplicates replace earlier ones.
    pub fn load(path: &Path) -> LoadResult<AbilityBook> {
        Ok(Self::load_catalog(path)?.abilities.into_iter().collect())
    }

    /// Load a catalog and lay its entries over `base`.
    ///
    /// Used to tweak a handful of abilities without restating the whole
    /// standard book.
    pub fn load_over(path: &Path, mut base: AbilityBook) -> LoadResult<AbilityBook> {
        for def in Self::load_catalog(path)?.abilities {
            base.insert(def);
        }
        Ok(base)
    }

    fn load_catalog(path: &Path) -> LoadResult<AbilityCatalog> {
        let content = read_file(path)?;
        ron::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse ability catalog RON at {}: {}", path.display(), e)
        })
    }
}
